use std::io;

use thiserror::Error;

/// Ways a trace run can fail outright.
///
/// Running past the timeout is not one of them: the child is killed and the
/// output read so far is still returned.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("{program} is not installed or not on PATH")]
    NotFound { program: String },

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed while waiting for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
}

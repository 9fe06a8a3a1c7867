mod commands;
mod terminal;

use std::env;
use std::io;
use std::process::ExitCode;

use hoppr_core::runner::ProcessTracer;
use terminal::logging;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init_logging();

    let mut stdout = io::stdout().lock();

    match commands::run(env::args_os(), &ProcessTracer, &mut stdout).await {
        Ok(code) => ExitCode::from(code),
        Err(_) => ExitCode::FAILURE,
    }
}

//! Runs the diagnostic utility as a child process with a bounded lifetime.
//!
//! The child is spawned with both output streams piped. Two background tasks
//! drain the pipes into shared buffers while the child runs, so a child that
//! writes a lot never stalls on a full pipe, and whatever it wrote before a
//! timeout is still available afterwards.
//!
//! Every exit path releases the child: a normal exit is reaped by `wait`, a
//! timeout kills and reaps it, and `kill_on_drop` covers early returns. The
//! wait after a kill is bounded as well, since a grandchild that inherited the
//! pipes can keep them open long after the direct child is gone.

use std::io;
use std::process::Stdio;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use hoppr_common::config::Config;
use hoppr_common::error::RunError;
use hoppr_common::process::{Capture, Completion, Invocation};
use hoppr_common::tracer::Tracer;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, warn};

const READ_CHUNK: usize = 4096;

/// [`Tracer`] backed by the real utility on `PATH`.
pub struct ProcessTracer;

#[async_trait]
impl Tracer for ProcessTracer {
    async fn trace(&self, cfg: &Config) -> Result<Capture, RunError> {
        run_with_timeout(&cfg.invocation(), cfg.timeout, cfg.reap_timeout).await
    }
}

/// Runs `invocation` for at most `limit`, then kills it.
///
/// After the child is gone, reaping and draining the pipes each get at most
/// `reap_limit`. A timeout is not an error; it shows up as
/// [`Completion::TimedOut`] alongside the partial output.
pub async fn run_with_timeout(
    invocation: &Invocation,
    limit: Duration,
    reap_limit: Duration,
) -> Result<Capture, RunError> {
    let mut child = spawn(invocation)?;

    let stdout = Drain::start(child.stdout.take());
    let stderr = Drain::start(child.stderr.take());

    let completion = match timeout(limit, child.wait()).await {
        Ok(Ok(status)) => {
            debug!("{} exited with {status}", invocation.program);
            Completion::Exited {
                code: status.code(),
            }
        }
        Ok(Err(source)) => {
            return Err(RunError::Wait {
                program: invocation.program.clone(),
                source,
            });
        }
        Err(_elapsed) => {
            warn!(
                "{} still running after {}s, terminating",
                invocation.program,
                limit.as_secs_f64()
            );
            Completion::TimedOut {
                reaped: terminate(&mut child, reap_limit).await,
            }
        }
    };

    let (stdout, stderr) = tokio::join!(stdout.finish(reap_limit), stderr.finish(reap_limit));

    Ok(Capture::new(&stdout, &stderr, completion))
}

fn spawn(invocation: &Invocation) -> Result<Child, RunError> {
    debug!("Spawning {invocation}");

    Command::new(&invocation.program)
        .args(&invocation.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => RunError::NotFound {
                program: invocation.program.clone(),
            },
            _ => RunError::Spawn {
                program: invocation.program.clone(),
                source,
            },
        })
}

/// Kills the child and waits for it, giving up after `reap_limit`.
async fn terminate(child: &mut Child, reap_limit: Duration) -> bool {
    match timeout(reap_limit, child.kill()).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            warn!("Failed to kill child process: {e}");
            false
        }
        Err(_elapsed) => {
            warn!(
                "Child process not reaped within {}ms of being killed",
                reap_limit.as_millis()
            );
            false
        }
    }
}

type SharedBuf = Arc<Mutex<Vec<u8>>>;

fn lock(buf: &SharedBuf) -> MutexGuard<'_, Vec<u8>> {
    buf.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Background reader copying one pipe into a shared buffer until EOF.
struct Drain {
    buf: SharedBuf,
    handle: JoinHandle<()>,
}

impl Drain {
    fn start<R>(pipe: Option<R>) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let buf: SharedBuf = Arc::new(Mutex::new(Vec::new()));
        let sink = buf.clone();

        let handle = tokio::spawn(async move {
            let Some(mut pipe) = pipe else {
                return;
            };
            let mut chunk = [0u8; READ_CHUNK];
            loop {
                match pipe.read(&mut chunk).await {
                    Ok(0) => break,
                    Ok(n) => lock(&sink).extend_from_slice(&chunk[..n]),
                    Err(e) => {
                        debug!("Stopped reading child output: {e}");
                        break;
                    }
                }
            }
        });

        Self { buf, handle }
    }

    /// Waits up to `limit` for EOF, then returns everything read so far.
    async fn finish(self, limit: Duration) -> Vec<u8> {
        let Drain { buf, mut handle } = self;

        if timeout(limit, &mut handle).await.is_err() {
            warn!(
                "Output pipe still open {}ms after the child finished, keeping partial output",
                limit.as_millis()
            );
            handle.abort();
        }

        std::mem::take(&mut *lock(&buf))
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[tokio::test]
    async fn missing_program_is_not_found() {
        let invocation = Invocation::new("hoppr-definitely-not-installed", ["-I"]);
        let result = run_with_timeout(&invocation, SECOND, SECOND).await;

        assert!(matches!(
            result,
            Err(RunError::NotFound { program }) if program == "hoppr-definitely-not-installed"
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn exit_code_is_reported() {
        let invocation = Invocation::new("sh", ["-c", "echo ' 1  gw'; exit 3"]);
        let capture = run_with_timeout(&invocation, 5 * SECOND, SECOND).await.unwrap();

        assert_eq!(capture.completion, Completion::Exited { code: Some(3) });
        assert_eq!(capture.stdout, "1  gw");
        assert!(capture.stderr.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn large_output_does_not_stall_the_child() {
        // Well past any pipe buffer size
        let script = "i=0; while [ $i -lt 20000 ]; do echo \"$i  10.0.0.1  1.0 ms\"; i=$((i+1)); done";
        let invocation = Invocation::new("sh", ["-c", script]);
        let capture = run_with_timeout(&invocation, 30 * SECOND, SECOND).await.unwrap();

        assert_eq!(capture.completion, Completion::Exited { code: Some(0) });
        assert_eq!(crate::hops::count_hops(&capture.stdout), 20000);
    }
}

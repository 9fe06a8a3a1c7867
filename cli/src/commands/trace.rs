use hoppr_common::config::Config;
use hoppr_common::process::Completion;
use hoppr_common::tracer::Tracer;
use hoppr_core::report::Report;
use tracing::{debug, warn};

use crate::terminal::spinner;

/// Runs one trace and turns its capture into a report.
pub async fn trace(cfg: &Config, tracer: &dyn Tracer) -> anyhow::Result<Report> {
    spinner::start(format!("Tracing route to {}", cfg.host));
    let result = tracer.trace(cfg).await;
    spinner::stop();

    let capture = result?;

    match capture.completion {
        Completion::TimedOut { reaped } => {
            warn!(
                "Traceroute timed out after {}s, reporting partial output{}",
                cfg.timeout.as_secs(),
                if reaped { "" } else { " (process not reaped)" }
            );
        }
        completion if completion.terminated_abnormally() => {
            warn!("Traceroute was terminated by a signal");
        }
        Completion::Exited { code } => {
            debug!("Traceroute exited with code {code:?}");
        }
    }

    let report = Report::from_capture(&cfg.host, &capture);
    if let Some(last) = report.last_hop() {
        debug!("Furthest hop reported: {last}");
    }

    Ok(report)
}

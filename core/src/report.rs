use std::fmt;

use hoppr_common::host::Host;
use hoppr_common::process::Capture;
use tracing::debug;

use crate::hops;

pub const OUTPUT_HEADER: &str = "Output:";
pub const HOST_UNKNOWN_SUMMARY: &str = "Summary - Traceroute cannot run: hostname unknown";

/// What gets shown to the user for one trace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Report {
    /// The utility ran cleanly; its output is shown followed by a hop count.
    Route { host: Host, output: String, hops: usize },
    /// Anything at all was written to stderr. Every cause (resolution
    /// failure, missing privileges, bad arguments) collapses into this.
    HostUnknown,
}

impl Report {
    pub fn from_capture(host: &Host, capture: &Capture) -> Self {
        if capture.has_errors() {
            debug!("Collapsing stderr into fallback summary: {}", capture.stderr);
            return Report::HostUnknown;
        }

        Report::Route {
            host: host.clone(),
            output: capture.stdout.clone(),
            hops: hops::count_hops(&capture.stdout),
        }
    }

    /// Index of the furthest hop the utility reported, if any.
    pub fn last_hop(&self) -> Option<u32> {
        match self {
            Report::Route { output, .. } => hops::hop_lines(output).filter_map(hops::hop_index).max(),
            Report::HostUnknown => None,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        match self {
            Report::Route { host, output, hops } => {
                let mut lines = vec![OUTPUT_HEADER.to_string()];
                lines.extend(output.lines().map(str::to_string));
                lines.push(String::new());
                lines.push(format!("Summary - {hops} hops to destination ({host})"));
                lines
            }
            Report::HostUnknown => vec![HOST_UNKNOWN_SUMMARY.to_string()],
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}

//! Everything the user reads on stdout.
//!
//! Each function writes to the sink it is given so the exact bytes can be
//! checked; `main` hands in a locked stdout.

use std::io::{self, Write};

use hoppr_common::config::Config;
use hoppr_common::error::RunError;
use hoppr_core::report::Report;

pub fn usage<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "To Use: hoppr <hostname>")?;
    writeln!(out, "Ex: hoppr google.com")
}

pub fn preamble<W: Write>(out: &mut W, cfg: &Config) -> io::Result<()> {
    writeln!(
        out,
        "Running traceroute to {} (max hops = {})...",
        cfg.host, cfg.max_hops
    )?;
    writeln!(out)
}

pub fn report<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    match report {
        Report::Route { .. } => {
            for line in report.lines() {
                writeln!(out, "{line}")?;
            }
            writeln!(out)
        }
        Report::HostUnknown => {
            writeln!(out)?;
            writeln!(out, "{report}")
        }
    }
}

pub fn failure<W: Write>(out: &mut W, err: &anyhow::Error) -> io::Result<()> {
    if let Some(RunError::NotFound { .. }) = err.downcast_ref::<RunError>() {
        writeln!(out, "Error: Traceroute not installed")
    } else {
        writeln!(out, "Error: {err}")
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

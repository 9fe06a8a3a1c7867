pub mod trace;

use std::ffi::OsString;
use std::io::{self, Write};
use std::time::Duration;

use clap::Parser;
use clap::error::ErrorKind;
use hoppr_common::config::{Config, DEFAULT_MAX_HOPS, DEFAULT_TIMEOUT};
use hoppr_common::host::Host;
use hoppr_common::tracer::Tracer;

use crate::terminal::print;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

#[derive(Parser, Debug)]
#[command(name = "hoppr")]
#[command(version, about = "Count the hops on the route to a network host.")]
pub struct CommandLine {
    /// Hostname or IP address to trace
    pub host: Host,

    /// Maximum number of hops to probe
    #[arg(short = 'm', long, default_value_t = DEFAULT_MAX_HOPS, value_parser = clap::value_parser!(u8).range(1..))]
    pub max_hops: u8,

    /// Seconds to wait for traceroute before terminating it
    #[arg(short = 't', long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,
}

/// Why argument parsing stopped before anything was traced.
#[derive(Debug)]
pub enum Halt {
    /// `--help` or `--version` was requested.
    Info(clap::Error),
    /// The host is missing, or an argument is malformed (clap's error attached).
    Usage(Option<clap::Error>),
}

impl CommandLine {
    pub fn from_args<I, T>(args: I) -> Result<Self, Halt>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args).map_err(|err| match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => Halt::Info(err),
            ErrorKind::MissingRequiredArgument => Halt::Usage(None),
            _ => Halt::Usage(Some(err)),
        })
    }

    pub fn into_config(self) -> Config {
        let mut cfg = Config::new(self.host);
        cfg.max_hops = self.max_hops;
        cfg.timeout = Duration::from_secs(self.timeout);
        cfg
    }
}

/// Parses `args`, traces the host and writes the report to `out`.
///
/// Returns the process exit status: 1 for misuse or a tool that cannot be
/// run, 0 whenever a report was printed.
pub async fn run<I, T, W>(args: I, tracer: &dyn Tracer, out: &mut W) -> io::Result<u8>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: Write,
{
    let commands = match CommandLine::from_args(args) {
        Ok(commands) => commands,
        Err(Halt::Info(info)) => {
            write!(out, "{}", info.render())?;
            return Ok(EXIT_SUCCESS);
        }
        Err(Halt::Usage(err)) => {
            if let Some(err) = err {
                let _ = err.print();
            }
            print::usage(out)?;
            return Ok(EXIT_FAILURE);
        }
    };

    let cfg = commands.into_config();
    print::preamble(out, &cfg)?;

    match trace::trace(&cfg, tracer).await {
        Ok(report) => {
            print::report(out, &report)?;
            Ok(EXIT_SUCCESS)
        }
        Err(err) => {
            print::failure(out, &err)?;
            Ok(EXIT_FAILURE)
        }
    }
}

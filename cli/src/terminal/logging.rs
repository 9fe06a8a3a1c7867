use std::io::{self, IsTerminal};

use colored::*;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent};
use tracing_subscriber::registry::LookupSpan;

use crate::terminal::spinner::SpinnerWriter;

const DEFAULT_FILTER: &str = "warn";

/// One line per event on stderr: `[*] message`.
///
/// Debug and trace lines also name the module that emitted them. Colors are
/// only written when the writer accepts ANSI escapes, which follows whether
/// stderr is a terminal rather than stdout.
pub struct HopprFormatter;

fn level_marker(level: &Level) -> (&'static str, Color) {
    match *level {
        Level::TRACE => ("[ ]", Color::BrightBlack),
        Level::DEBUG => ("[?]", Color::Blue),
        Level::INFO => ("[+]", Color::Green),
        Level::WARN => ("[*]", Color::Yellow),
        Level::ERROR => ("[-]", Color::Red),
    }
}

impl<S, N> FormatEvent<S, N> for HopprFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let (marker, color) = level_marker(meta.level());
        let ansi = writer.has_ansi_escapes();

        if ansi {
            write!(writer, "{} ", marker.color(color).bold())?;
        } else {
            write!(writer, "{marker} ")?;
        }

        if *meta.level() >= Level::DEBUG {
            if ansi {
                write!(writer, "{} ", format!("{}:", meta.target()).dimmed())?;
            } else {
                write!(writer, "{}: ", meta.target())?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Routes `tracing` events to stderr, filtered by `RUST_LOG` (default `warn`).
///
/// Stdout is reserved for the report.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(io::stderr().is_terminal())
        .event_format(HopprFormatter)
        .with_writer(|| SpinnerWriter)
        .try_init();
}

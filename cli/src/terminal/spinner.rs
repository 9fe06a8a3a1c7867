use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICK_INTERVAL: Duration = Duration::from_millis(100);

static SPINNER: Mutex<Option<ProgressBar>> = Mutex::new(None);

fn active() -> MutexGuard<'static, Option<ProgressBar>> {
    SPINNER.lock().unwrap_or_else(PoisonError::into_inner)
}

fn style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ])
}

/// Draws a spinner on stderr until [`stop`] is called.
///
/// Nothing is drawn when stderr is not a terminal.
pub fn start(msg: String) {
    let pb = ProgressBar::new_spinner();
    pb.set_style(style());
    pb.set_message(msg);
    pb.enable_steady_tick(TICK_INTERVAL);

    if let Some(previous) = active().replace(pb) {
        previous.finish_and_clear();
    }
}

pub fn stop() {
    if let Some(pb) = active().take() {
        pb.finish_and_clear();
    }
}

/// Stderr writer that hides the spinner while a line is written.
pub struct SpinnerWriter;

impl Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match active().as_ref() {
            Some(pb) => pb.suspend(|| io::stderr().write_all(buf))?,
            None => io::stderr().write_all(buf)?,
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

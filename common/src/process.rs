use std::fmt;

/// A program and its arguments, ready to be spawned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// How the child process came to an end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    /// Exited on its own. `code` is `None` when a signal terminated it.
    Exited { code: Option<i32> },
    /// Ran past the timeout and was killed. `reaped` is false when the
    /// bounded wait after the kill gave up.
    TimedOut { reaped: bool },
}

impl Completion {
    pub fn timed_out(&self) -> bool {
        matches!(self, Completion::TimedOut { .. })
    }

    pub fn terminated_abnormally(&self) -> bool {
        matches!(self, Completion::Exited { code: None })
    }
}

/// Trimmed text collected from the child's standard streams.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Capture {
    pub stdout: String,
    pub stderr: String,
    pub completion: Completion,
}

impl Capture {
    pub fn new(stdout: &[u8], stderr: &[u8], completion: Completion) -> Self {
        Self {
            stdout: String::from_utf8_lossy(stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(stderr).trim().to_string(),
            completion,
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.stderr.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_trims_both_streams() {
        let capture = Capture::new(
            b"\n 1  router.local  1.2 ms\n\n",
            b"   \n",
            Completion::Exited { code: Some(0) },
        );

        assert_eq!(capture.stdout, "1  router.local  1.2 ms");
        assert_eq!(capture.stderr, "");
        assert!(!capture.has_errors());
    }

    #[test]
    fn capture_decodes_invalid_utf8_lossily() {
        let capture = Capture::new(b"1 \xff", b"oops", Completion::TimedOut { reaped: true });

        assert_eq!(capture.stdout, "1 \u{fffd}");
        assert!(capture.has_errors());
        assert!(capture.completion.timed_out());
    }

    #[test]
    fn invocation_displays_as_command_line() {
        let invocation = Invocation::new("traceroute", ["-I", "-m", "20", "example.com"]);
        assert_eq!(invocation.to_string(), "traceroute -I -m 20 example.com");
    }
}

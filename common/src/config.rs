use std::time::Duration;

use crate::host::Host;
use crate::process::Invocation;

pub const DEFAULT_PROGRAM: &str = "traceroute";
pub const DEFAULT_MAX_HOPS: u8 = 20;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
pub const DEFAULT_REAP_TIMEOUT: Duration = Duration::from_secs(5);

/// Probe with ICMP ECHO instead of UDP datagrams.
const ICMP_FLAG: &str = "-I";
const MAX_HOPS_FLAG: &str = "-m";

#[derive(Clone, Debug)]
pub struct Config {
    pub host: Host,
    /// Hop ceiling handed to the diagnostic utility.
    pub max_hops: u8,
    /// How long the utility may run before it is killed.
    pub timeout: Duration,
    /// Upper bound for reaping the child and draining its pipes after a kill.
    ///
    /// Keeps a grandchild that inherited the pipes from hanging the program.
    pub reap_timeout: Duration,
    pub program: String,
}

impl Config {
    pub fn new(host: Host) -> Self {
        Self {
            host,
            max_hops: DEFAULT_MAX_HOPS,
            timeout: DEFAULT_TIMEOUT,
            reap_timeout: DEFAULT_REAP_TIMEOUT,
            program: DEFAULT_PROGRAM.to_string(),
        }
    }

    /// The exact command line for the diagnostic utility: `-I -m <hops> <host>`.
    pub fn invocation(&self) -> Invocation {
        Invocation::new(
            &self.program,
            [
                ICMP_FLAG.to_string(),
                MAX_HOPS_FLAG.to_string(),
                self.max_hops.to_string(),
                self.host.to_string(),
            ],
        )
    }
}

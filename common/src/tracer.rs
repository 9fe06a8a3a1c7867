use async_trait::async_trait;

use crate::config::Config;
use crate::error::RunError;
use crate::process::Capture;

/// Runs the diagnostic utility for one configured host.
#[async_trait]
pub trait Tracer: Send + Sync {
    async fn trace(&self, cfg: &Config) -> Result<Capture, RunError>;
}

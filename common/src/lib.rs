pub mod config;
pub mod error;
pub mod host;
pub mod process;
pub mod tracer;

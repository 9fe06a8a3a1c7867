pub mod hops;
pub mod report;
pub mod runner;

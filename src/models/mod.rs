//! Data models and structures for the latency tester

pub mod config;
pub mod metrics;

// Re-export main model types
pub use config::{Config, LogHeader, TestConfig};
pub use metrics::{LatencyStatistics, SampleSeries};

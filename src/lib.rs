//! Latency Tester
//!
//! Measures network round-trip latency by driving the system `ping`
//! command, records one RTT sample per reply in a log file, and renders
//! the samples as a time-series chart with summary statistics.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod logfile;
pub mod logging;
pub mod models;
pub mod output;
pub mod plot;
pub mod privilege;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{LatencyStatistics, LogHeader, SampleSeries, TestConfig};
pub use privilege::{PrivilegeCheck, SystemPrivileges};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Default configuration values
pub mod defaults {
    pub const DEFAULT_LOG_PATH: &str = "lt_default.log";
    pub const DEFAULT_MACHINE_LABEL: &str = "unspecified";
    pub const DEFAULT_PING_BIN: &str = "ping";
    pub const DEFAULT_ENABLE_COLOR: bool = true;

    /// Intervals below this many seconds need elevated privileges
    pub const MIN_UNPRIVILEGED_INTERVAL: f64 = 0.2;

    /// Smallest interval the four-decimal log header still records as non-zero
    pub const MIN_INTERVAL: f64 = 0.00005;

    /// Largest ICMP payload that fits an IPv4 datagram
    pub const MAX_PACKET_SIZE: u32 = 65_507;

    /// Fixed chart ranges and grid spacing
    pub const PLOT_Y_MAX_MS: f64 = 600.0;
    pub const PLOT_Y_STEP_MS: f64 = 50.0;
    pub const PLOT_X_STEP_SECS: f64 = 10.0;
}

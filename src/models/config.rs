//! Configuration data model and validation

use crate::types::{AppError, Result, RunMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Parameters of one latency test, validated and immutable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestConfig {
    /// Test duration (ping deadline) in seconds
    pub duration_seconds: u32,

    /// ICMP payload size in bytes
    pub packet_size_bytes: u32,

    /// Seconds between echo requests
    pub interval_seconds: f64,

    /// Host name or IP address to probe
    pub target_address: String,

    /// Where the samples are written
    pub log_path: PathBuf,

    /// Free-form label for the machine running the test
    pub machine_label: String,
}

impl TestConfig {
    /// Validate the structural invariants of the configuration
    pub fn validate(&self) -> Result<()> {
        if self.duration_seconds == 0 {
            return Err(AppError::validation("Test duration must be greater than 0"));
        }

        if self.packet_size_bytes == 0 {
            return Err(AppError::validation("Packet size must be greater than 0"));
        }

        if self.packet_size_bytes > crate::defaults::MAX_PACKET_SIZE {
            return Err(AppError::validation(format!(
                "Packet size cannot exceed {} bytes",
                crate::defaults::MAX_PACKET_SIZE
            )));
        }

        if !self.interval_seconds.is_finite() || self.interval_seconds < crate::defaults::MIN_INTERVAL {
            return Err(AppError::validation(format!(
                "Interval must be at least {} seconds",
                crate::defaults::MIN_INTERVAL
            )));
        }

        if self.target_address.trim().is_empty() {
            return Err(AppError::validation("Target address cannot be empty"));
        }

        if self.machine_label.contains(['\n', '\r']) {
            return Err(AppError::validation("Machine label cannot contain line breaks"));
        }

        Ok(())
    }

    /// The parameters persisted in the log header
    pub fn header(&self) -> LogHeader {
        LogHeader {
            duration_seconds: self.duration_seconds,
            packet_size_bytes: self.packet_size_bytes,
            interval_seconds: self.interval_seconds,
            target_address: self.target_address.clone(),
            machine_label: self.machine_label.clone(),
        }
    }
}

/// Test parameters as persisted in the first line of a log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogHeader {
    pub duration_seconds: u32,
    pub packet_size_bytes: u32,
    pub interval_seconds: f64,
    pub target_address: String,
    pub machine_label: String,
}

impl LogHeader {
    /// Whole packets sent per second, floor(1 / interval)
    pub fn packets_per_second(&self) -> u64 {
        // Absorb representation error so 1/0.2 stays 5
        (1.0 / self.interval_seconds + 1e-9).floor() as u64
    }

    /// Approximate number of replies a loss-free test yields
    pub fn expected_replies(&self) -> u64 {
        (f64::from(self.duration_seconds) / self.interval_seconds + 1e-9).floor() as u64
    }
}

/// Fully resolved application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Test-and-plot or plot-only
    pub mode: RunMode,

    /// Test parameters; always present when a test runs, optional
    /// fallback for header-less logs in plot-only mode
    pub test: Option<TestConfig>,

    /// Log file to write or read
    pub log_path: PathBuf,

    /// Machine label used when the log carries none
    pub machine_label: String,

    /// Chart output path
    pub plot_path: PathBuf,

    /// Replace an existing log instead of refusing
    pub overwrite: bool,

    /// Ping executable
    pub ping_bin: String,

    /// Enable colored terminal output
    pub enable_color: bool,

    /// Enable verbose output
    pub verbose: bool,

    /// Enable debug output
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        let log_path = PathBuf::from(crate::defaults::DEFAULT_LOG_PATH);
        Self {
            mode: RunMode::TestAndPlot,
            test: None,
            plot_path: default_plot_path(&log_path),
            log_path,
            machine_label: crate::defaults::DEFAULT_MACHINE_LABEL.to_string(),
            overwrite: false,
            ping_bin: crate::defaults::DEFAULT_PING_BIN.to_string(),
            enable_color: crate::defaults::DEFAULT_ENABLE_COLOR,
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Validate cross-field requirements
    pub fn validate(&self) -> Result<()> {
        if self.log_path.as_os_str().is_empty() {
            return Err(AppError::validation("Log file path cannot be empty"));
        }

        if self.plot_path == self.log_path {
            return Err(AppError::validation("Chart path must differ from the log file path"));
        }

        if self.ping_bin.trim().is_empty() {
            return Err(AppError::config("Ping executable cannot be empty"));
        }

        match (&self.mode, &self.test) {
            (RunMode::TestAndPlot, None) => {
                Err(AppError::validation("Test parameters are required unless --plotonly is given"))
            }
            (_, Some(test)) => test.validate(),
            (RunMode::PlotOnly, None) => Ok(()),
        }
    }
}

/// Chart path derived from a log path: same stem, `.svg` extension
pub fn default_plot_path(log_path: &Path) -> PathBuf {
    log_path.with_extension("svg")
}

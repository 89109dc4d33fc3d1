//! Structured logging for latency test runs
//!
//! Entries carry a timestamp, a level, the emitting component and free-form
//! structured fields. Every logger created for one invocation shares a
//! run id so the console and JSON output of a single test can be correlated.

use crate::error::{AppError, Result};
use crate::models::{Config, LatencyStatistics, TestConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Trace => "\x1b[37m",
            LogLevel::Debug => "\x1b[36m",
            LogLevel::Info => "\x1b[32m",
            LogLevel::Warn => "\x1b[33m",
            LogLevel::Error => "\x1b[31m",
            LogLevel::Fatal => "\x1b[35m",
        }
    }

    pub fn reset_code() -> &'static str {
        "\x1b[0m"
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    /// Human-readable console format
    Console,
    /// One JSON object per line
    Json,
}

/// One structured log record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Emitting component
    pub logger: String,
    /// Identifies every entry of one invocation
    pub run_id: String,
    /// Additional structured fields, sorted by key
    pub fields: BTreeMap<String, serde_json::Value>,
}

/// Logger with a minimum level and a fixed output format
#[derive(Debug, Clone)]
pub struct Logger {
    min_level: LogLevel,
    use_color: bool,
    format: LogFormat,
    name: String,
    run_id: String,
}

impl Logger {
    /// Create a logger with a fresh run id
    pub fn new(name: &str) -> Self {
        Self {
            min_level: LogLevel::Info,
            use_color: true,
            format: LogFormat::Console,
            name: name.to_string(),
            run_id: Uuid::new_v4().to_string(),
        }
    }

    /// Level and format follow the `--debug`/`--verbose` flags
    pub fn with_config(name: &str, config: &Config) -> Self {
        let min_level = if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        };

        Self {
            min_level,
            use_color: config.enable_color,
            format: if config.debug { LogFormat::Json } else { LogFormat::Console },
            ..Self::new(name)
        }
    }

    /// A logger for another component sharing this run id
    pub fn child(&self, name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..self.clone()
        }
    }

    pub fn set_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    pub fn set_color(&mut self, use_color: bool) {
        self.use_color = use_color;
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Create a log entry builder
    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    pub fn trace(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Trace, message)
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Error, message)
    }

    /// Check if a log level would be output
    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Render an entry, or `None` when it is below the minimum level
    pub fn render(&self, entry: &LogEntry) -> Option<String> {
        if !self.would_log(entry.level) {
            return None;
        }

        Some(match self.format {
            LogFormat::Console => self.format_console(entry),
            LogFormat::Json => self.format_json(entry),
        })
    }

    fn write_entry(&self, entry: LogEntry) {
        let Some(output) = self.render(&entry) else {
            return;
        };

        // Warnings and errors go to stderr so stdout stays clean
        if entry.level >= LogLevel::Warn {
            let _ = writeln!(io::stderr(), "{}", output);
        } else {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }

    fn format_console(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let level_str = entry.level.as_str();

        let formatted_level = if self.use_color {
            format!("{}{:>5}{}", entry.level.color_code(), level_str, LogLevel::reset_code())
        } else {
            format!("{:>5}", level_str)
        };

        let mut output = format!("{} {} [{}] {}", timestamp, formatted_level, entry.logger, entry.message);

        if !entry.fields.is_empty() {
            let fields_str: Vec<String> = entry.fields.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            output.push_str(&format!(" {{{}}}", fields_str.join(", ")));
        }

        output
    }

    fn format_json(&self, entry: &LogEntry) -> String {
        match serde_json::to_string(entry) {
            Ok(json) => json,
            Err(_) => format!(
                "{{\"error\": \"Failed to serialize log entry\", \"message\": {:?}}}",
                entry.message
            ),
        }
    }
}

/// Builder for a single log entry
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: String) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                message,
                logger: logger.name.clone(),
                run_id: logger.run_id.clone(),
                fields: BTreeMap::new(),
            },
        }
    }

    /// Add a structured field
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    /// Add a path as a string field
    pub fn path(self, key: &str, path: &Path) -> Self {
        self.field(key, path.display().to_string())
    }

    /// Add error information
    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_exit_code", error.exit_code())
    }

    /// The entry as built so far
    pub fn entry(&self) -> &LogEntry {
        &self.entry
    }

    /// Finalize and write the log entry
    pub fn log(self) {
        self.logger.write_entry(self.entry);
    }
}

/// Lifecycle events of a test run
pub struct RunLogger {
    logger: Logger,
}

impl RunLogger {
    pub fn new(logger: &Logger) -> Self {
        Self {
            logger: logger.child("RUN"),
        }
    }

    pub fn log_test_start(&self, test: &TestConfig, ping_bin: &str) {
        self.logger
            .info("Starting latency test")
            .field("target", &test.target_address)
            .field("duration_s", test.duration_seconds)
            .field("packet_size_b", test.packet_size_bytes)
            .field("interval_s", test.interval_seconds)
            .field("ping_bin", ping_bin)
            .path("log_path", &test.log_path)
            .log();
    }

    pub fn log_command(&self, program: &str, args: &[String]) {
        self.logger
            .debug(&format!("Running: {} {}", program, args.join(" ")))
            .log();
    }

    pub fn log_warning(&self, message: &str) {
        self.logger.warn(message).log();
    }

    pub fn log_unparsed_line(&self, line: &str) {
        self.logger.trace("Ignoring ping output line").field("line", line).log();
    }

    pub fn log_test_end(&self, samples: usize, exit_code: Option<i32>, interrupted: bool) {
        self.logger
            .info("Latency test finished")
            .field("samples", samples)
            .field("exit_code", exit_code)
            .field("interrupted", interrupted)
            .log();
    }

    pub fn log_statistics(&self, stats: &LatencyStatistics) {
        self.logger
            .debug("Computed latency statistics")
            .field("samples", stats.sample_count)
            .field("mean_ms", stats.mean_ms)
            .field("min_ms", stats.min_ms)
            .field("max_ms", stats.max_ms)
            .field("p95_ms", stats.p95_ms)
            .field("jitter_ms", stats.jitter_ms)
            .log();
    }

    pub fn log_chart_written(&self, path: &Path) {
        self.logger.info("Chart written").path("plot_path", path).log();
    }

    pub fn log_error(&self, error: &AppError) {
        self.logger.error(&error.to_string()).error_info(error).log();
    }
}

//! Error handling for the latency tester

use thiserror::Error;

/// Custom error types for the latency tester
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (.env, environment variables)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid or missing command line parameters
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation requires elevated privileges
    #[error("Permission error: {0}")]
    Permission(String),

    /// Log file exists when it must not, or is missing when it must exist
    #[error("File error: {0}")]
    FileState(String),

    /// Parsing errors (log contents, numeric values)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(String),

    /// The external ping command failed
    #[error("Ping command error: {0}")]
    PingCommand(String),

    /// A test or log produced no latency samples
    #[error("No samples: {0}")]
    NoSamples(String),

    /// Chart rendering errors
    #[error("Plot error: {0}")]
    Plot(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new permission error
    pub fn permission<S: Into<String>>(message: S) -> Self {
        Self::Permission(message.into())
    }

    /// Create a new file-state error
    pub fn file_state<S: Into<String>>(message: S) -> Self {
        Self::FileState(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new ping command error
    pub fn ping_command<S: Into<String>>(message: S) -> Self {
        Self::PingCommand(message.into())
    }

    /// Create a new no-samples error
    pub fn no_samples<S: Into<String>>(message: S) -> Self {
        Self::NoSamples(message.into())
    }

    /// Create a new plot error
    pub fn plot<S: Into<String>>(message: S) -> Self {
        Self::Plot(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Validation(_) => "VALIDATION",
            Self::Permission(_) => "PERMISSION",
            Self::FileState(_) => "FILE",
            Self::Parse(_) => "PARSE",
            Self::Io(_) => "IO",
            Self::PingCommand(_) => "PING",
            Self::NoSamples(_) => "SAMPLES",
            Self::Plot(_) => "PLOT",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Whether the error stems from how the tool was invoked rather than
    /// from the network or the environment
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::Validation(_) | Self::Permission(_) | Self::FileState(_)
        )
    }

    /// Get user-friendly error message with suggestions
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Config(msg) => {
                format!("Configuration problem: {}\n\nSuggestion: Check your .env file and LT_* environment variables.", msg)
            }
            Self::Validation(msg) => {
                format!("Invalid input: {}\n\nSuggestion: Provide -w, -s, -i and -t with positive values, or use --plotonly with an existing log.", msg)
            }
            Self::Permission(msg) => {
                format!("Insufficient privileges: {}\n\nSuggestion: Re-run as root/Administrator or use an interval of at least 0.2 seconds.", msg)
            }
            Self::FileState(msg) => {
                format!("Log file problem: {}\n\nSuggestion: Choose another path with -l, pass --overwrite, or check the path for --plotonly.", msg)
            }
            Self::Parse(msg) => {
                format!("Failed to parse data: {}\n\nSuggestion: Check that the log file was written by this tool.", msg)
            }
            Self::Io(msg) => {
                format!("File operation failed: {}\n\nSuggestion: Check file permissions and disk space.", msg)
            }
            Self::PingCommand(msg) => {
                format!("Ping failed: {}\n\nSuggestion: Check that the target is reachable and that `ping` is installed (or set LT_PING_BIN).", msg)
            }
            Self::NoSamples(msg) => {
                format!("No latency samples: {}\n\nSuggestion: The target may be unreachable or filtering ICMP; try a longer test.", msg)
            }
            Self::Plot(msg) => {
                format!("Chart rendering failed: {}\n\nSuggestion: Check that the chart output directory is writable.", msg)
            }
            Self::Internal(msg) => {
                format!("Internal error: {}\n\nThis is likely a bug. Please report this issue with the error details.", msg)
            }
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Validation(_) | Self::Permission(_) | Self::FileState(_) => 2,
            Self::PingCommand(_) => 3,
            Self::NoSamples(_) => 4,
            Self::Parse(_) | Self::Io(_) => 5,
            Self::Plot(_) => 6,
            Self::Internal(_) => 99,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Validation(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::Permission(_) | Self::FileState(_) => {
                    format!("[{}] {}", category.magenta().bold(), message.magenta())
                }
                Self::PingCommand(_) | Self::NoSamples(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Io(_) | Self::Plot(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

// Standard library error conversions
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!("Environment file error: {}", error))
    }
}

impl From<std::str::ParseBoolError> for AppError {
    fn from(error: std::str::ParseBoolError) -> Self {
        Self::parse(format!("Boolean parse error: {}", error))
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Error context trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error, keeping its category
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let context = f();
            match e.into() {
                AppError::Config(msg) => AppError::Config(format!("{}: {}", context, msg)),
                AppError::Validation(msg) => AppError::Validation(format!("{}: {}", context, msg)),
                AppError::Permission(msg) => AppError::Permission(format!("{}: {}", context, msg)),
                AppError::FileState(msg) => AppError::FileState(format!("{}: {}", context, msg)),
                AppError::Parse(msg) => AppError::Parse(format!("{}: {}", context, msg)),
                AppError::Io(msg) => AppError::Io(format!("{}: {}", context, msg)),
                AppError::PingCommand(msg) => AppError::PingCommand(format!("{}: {}", context, msg)),
                AppError::NoSamples(msg) => AppError::NoSamples(format!("{}: {}", context, msg)),
                AppError::Plot(msg) => AppError::Plot(format!("{}: {}", context, msg)),
                AppError::Internal(msg) => AppError::Internal(format!("{}: {}", context, msg)),
            }
        })
    }
}

/// Error reporter for user feedback on stderr
pub struct ErrorReporter {
    pub use_color: bool,
    pub verbose: bool,
}

impl ErrorReporter {
    /// Create a new error reporter
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    /// Render the report that `report_error` prints
    pub fn render(&self, error: &AppError) -> String {
        let mut out = error.format_for_console(self.use_color);

        if self.verbose {
            out.push_str("\n\n");
            out.push_str(&error.user_friendly_message());
        }

        if error.is_usage_error() {
            out.push_str("\n\nRun with --help for usage.");
        }

        out
    }

    /// Report an error to the user
    pub fn report_error(&self, error: &AppError) {
        eprintln!("{}", self.render(error));
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

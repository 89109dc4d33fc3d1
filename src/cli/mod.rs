//! Command-line interface definition

use clap::Parser;
use std::path::PathBuf;

const AFTER_HELP: &str = "\
Examples:
  lt -w 60 -s 64 -i 1 -t 10.0.0.1 -m laptop -l wifi.log
  lt -w 30 -s 1400 -i 0.1 -t example.com          (interval < 0.2s needs root)
  lt --plotonly -l wifi.log                        (replay a recorded log)

Environment:
  LT_LOGFILE, LT_MACHINE, LT_PING_BIN, LT_ENABLE_COLOR (also read from .env)";

/// Ping latency tester - records per-reply RTT samples and plots them
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "lt")]
#[command(version, about, long_about = None, after_help = AFTER_HELP)]
#[command(allow_negative_numbers = true)]
pub struct Cli {
    /// Test duration in seconds (ping deadline)
    #[arg(short = 'w', long = "deadline", value_name = "SECONDS")]
    pub deadline: Option<i64>,

    /// ICMP payload size in bytes
    #[arg(short = 's', long = "packetsize", value_name = "BYTES")]
    pub packet_size: Option<i64>,

    /// Seconds between probes (below 0.2 requires root/Administrator)
    #[arg(short = 'i', long = "interval", value_name = "SECONDS")]
    pub interval: Option<f64>,

    /// Target host name or IP address
    #[arg(short = 't', long = "targetip", value_name = "HOST")]
    pub target: Option<String>,

    /// Log file for the latency samples [default: lt_default.log]
    #[arg(
        short = 'o',
        long = "ofile",
        visible_short_alias = 'l',
        visible_alias = "logfile",
        value_name = "PATH"
    )]
    pub log_file: Option<PathBuf>,

    /// Machine label shown in the chart title [default: unspecified]
    #[arg(short = 'm', long = "machine", value_name = "LABEL")]
    pub machine: Option<String>,

    /// Skip the test and only plot an existing log
    #[arg(long = "plotonly")]
    pub plot_only: bool,

    /// Replace the log file if it already exists
    #[arg(long)]
    pub overwrite: bool,

    /// Chart output path [default: log path with .svg extension]
    #[arg(short = 'p', long = "plot-file", value_name = "PATH")]
    pub plot_file: Option<PathBuf>,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if self.plot_only && self.overwrite {
            return Err("--overwrite has no effect together with --plotonly".to_string());
        }

        Ok(())
    }

    /// Whether any of the test parameters was given on the command line
    pub fn has_test_parameters(&self) -> bool {
        self.deadline.is_some()
            || self.packet_size.is_some()
            || self.interval.is_some()
            || self.target.is_some()
    }

    /// Colour preference from the flags alone; `None` means "not forced"
    pub fn color_override(&self) -> Option<bool> {
        if self.color {
            Some(true)
        } else if self.no_color {
            Some(false)
        } else {
            None
        }
    }
}

/// Check if the terminal supports color output
pub fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing_short_flags() {
        let cli = Cli::parse_from([
            "lt", "-w", "10", "-s", "64", "-i", "0.5", "-t", "10.0.0.1", "-o", "a.log", "-m", "host1",
        ]);
        assert_eq!(cli.deadline, Some(10));
        assert_eq!(cli.packet_size, Some(64));
        assert_eq!(cli.interval, Some(0.5));
        assert_eq!(cli.target.as_deref(), Some("10.0.0.1"));
        assert_eq!(cli.log_file, Some(PathBuf::from("a.log")));
        assert_eq!(cli.machine.as_deref(), Some("host1"));
        assert!(!cli.plot_only);
    }

    #[test]
    fn test_cli_parsing_long_flags() {
        let cli = Cli::parse_from([
            "lt",
            "--deadline", "20",
            "--packetsize", "300",
            "--interval", "1",
            "--targetip", "example.com",
            "--logfile", "b.log",
            "--machine", "rpi",
            "--overwrite",
            "--plot-file", "b.svg",
        ]);
        assert_eq!(cli.deadline, Some(20));
        assert_eq!(cli.packet_size, Some(300));
        assert_eq!(cli.interval, Some(1.0));
        assert_eq!(cli.log_file, Some(PathBuf::from("b.log")));
        assert_eq!(cli.plot_file, Some(PathBuf::from("b.svg")));
        assert!(cli.overwrite);
    }

    #[test]
    fn test_log_file_aliases() {
        let short_l = Cli::parse_from(["lt", "-l", "x.log"]);
        let long_o = Cli::parse_from(["lt", "--ofile", "x.log"]);
        assert_eq!(short_l.log_file, long_o.log_file);
    }

    #[test]
    fn test_negative_numbers_reach_validation() {
        let cli = Cli::parse_from(["lt", "-s", "-5", "-w", "-1"]);
        assert_eq!(cli.packet_size, Some(-5));
        assert_eq!(cli.deadline, Some(-1));
    }

    #[test]
    fn test_unset_parameters_are_none() {
        let cli = Cli::parse_from(["lt", "--plotonly"]);
        assert!(cli.plot_only);
        assert!(!cli.has_test_parameters());
        assert_eq!(cli.deadline, None);
    }

    #[test]
    fn test_malformed_values_are_rejected() {
        assert!(Cli::try_parse_from(["lt", "-w", "ten"]).is_err());
        assert!(Cli::try_parse_from(["lt", "-s", "1.5"]).is_err());
        assert!(Cli::try_parse_from(["lt", "--bogus"]).is_err());
    }

    #[test]
    fn test_validate_conflicts() {
        let cli = Cli::parse_from(["lt", "--color", "--no-color"]);
        assert!(cli.validate().is_err());

        let cli = Cli::parse_from(["lt", "--plotonly", "--overwrite"]);
        assert!(cli.validate().is_err());

        let cli = Cli::parse_from(["lt", "--no-color"]);
        assert!(cli.validate().is_ok());
        assert_eq!(cli.color_override(), Some(false));
    }

    #[test]
    fn test_color_support_detection() {
        std::env::set_var("NO_COLOR", "1");
        assert!(!supports_color());
        std::env::remove_var("NO_COLOR");
    }
}

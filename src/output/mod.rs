//! Console output formatting
//!
//! Everything `lt` prints besides diagnostic log entries goes through an
//! [`OutputFormatter`]: the banner before a test, warnings, and the summary
//! shown once the chart is written.

mod colored;
mod formatter;

pub use self::colored::{performance_color, ColorScheme, ColoredFormatter};
pub use self::formatter::{FormattingOptions, OutputFormatter, PlainFormatter};

use crate::{
    error::Result,
    models::{LatencyStatistics, LogHeader, TestConfig},
};
use std::path::PathBuf;

/// What the plotter produced, for the console summary
#[derive(Debug, Clone)]
pub struct ChartSummary {
    pub header: LogHeader,
    pub stats: LatencyStatistics,
    pub log_path: PathBuf,
    pub plot_path: PathBuf,
}

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool) -> Box<dyn OutputFormatter> {
        if enable_color {
            Box::new(ColoredFormatter::new(FormattingOptions { enable_color }))
        } else {
            Box::new(PlainFormatter::new())
        }
    }
}

/// Prints formatted output: results to stdout, warnings to stderr
pub struct OutputCoordinator {
    formatter: Box<dyn OutputFormatter>,
}

impl OutputCoordinator {
    pub fn new(formatter: Box<dyn OutputFormatter>) -> Self {
        Self { formatter }
    }

    pub fn display_banner(&self, test: &TestConfig) -> Result<()> {
        println!("{}", self.formatter.format_test_banner(test)?);
        Ok(())
    }

    pub fn display_warning(&self, warning: &str) -> Result<()> {
        eprintln!("{}", self.formatter.format_warning(warning)?);
        Ok(())
    }

    pub fn display_summary(&self, summary: &ChartSummary) -> Result<()> {
        println!("{}", self.formatter.format_header("Latency Test Results")?);
        println!("{}", self.formatter.format_summary(summary)?);
        println!(
            "{}",
            self.formatter
                .format_success(&format!("chart written to {}", summary.plot_path.display()))?
        );
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{models::SampleSeries, stats::analyze};

    pub(crate) fn sample_summary() -> ChartSummary {
        ChartSummary {
            header: LogHeader {
                duration_seconds: 3,
                packet_size_bytes: 64,
                interval_seconds: 1.0,
                target_address: "10.0.0.1".to_string(),
                machine_label: "host1".to_string(),
            },
            stats: analyze(&SampleSeries::new(vec![10.0, 20.0, 30.0])).unwrap(),
            log_path: PathBuf::from("run.log"),
            plot_path: PathBuf::from("run.svg"),
        }
    }

    #[test]
    fn test_factory_picks_formatter() {
        let summary = sample_summary();

        let plain = OutputFormatterFactory::create_formatter(false);
        assert!(plain.format_warning("x").unwrap().starts_with("WARNING"));
        assert!(plain.format_summary(&summary).unwrap().contains("Machine: host1"));

        let colored = OutputFormatterFactory::create_formatter(true);
        assert!(!colored.format_warning("x").unwrap().starts_with("WARNING"));
        assert!(colored.format_summary(&summary).unwrap().contains("Machine: host1"));
    }
}

//! Output formatter trait and the plain-text implementation

use super::ChartSummary;
use crate::{
    error::{AppError, Result},
    models::TestConfig,
    plot::title_lines,
};
use std::fmt::Write as _;

/// Formats everything `lt` prints to the console
pub trait OutputFormatter {
    /// Boxed section header
    fn format_header(&self, title: &str) -> Result<String>;

    /// Announcement printed before ping starts
    fn format_test_banner(&self, test: &TestConfig) -> Result<String>;

    /// Title block, statistics and output paths after plotting
    fn format_summary(&self, summary: &ChartSummary) -> Result<String>;

    fn format_warning(&self, warning: &str) -> Result<String>;

    fn format_success(&self, message: &str) -> Result<String>;
}

/// Formatting options
#[derive(Debug, Clone, Default)]
pub struct FormattingOptions {
    pub enable_color: bool,
}

pub(crate) fn fmt_error(e: std::fmt::Error) -> AppError {
    AppError::internal(format!("Failed to format output: {}", e))
}

/// Statistic rows as (label, value) pairs
pub(crate) fn statistic_rows(summary: &ChartSummary) -> Vec<(&'static str, String)> {
    let stats = &summary.stats;
    vec![
        ("Samples", stats.sample_count.to_string()),
        ("Min", format!("{:.2} ms", stats.min_ms)),
        ("Median", format!("{:.2} ms", stats.median_ms)),
        ("Mean", format!("{:.2} ms", stats.mean_ms)),
        ("P95", format!("{:.2} ms", stats.p95_ms)),
        ("Max", format!("{:.2} ms", stats.max_ms)),
        ("Std-dev", format!("{:.2} ms", stats.std_dev_ms)),
        ("Jitter", format!("{:.2} ms", stats.jitter_ms)),
    ]
}

/// Plain text formatter without ANSI escapes
#[derive(Debug, Default)]
pub struct PlainFormatter;

impl PlainFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "=".repeat(title.len() + 4);

        writeln!(output, "{}", border).map_err(fmt_error)?;
        writeln!(output, "  {}  ", title).map_err(fmt_error)?;
        write!(output, "{}", border).map_err(fmt_error)?;

        Ok(output)
    }

    fn format_test_banner(&self, test: &TestConfig) -> Result<String> {
        Ok(format!(
            "Pinging {} for {}s ({}B every {}s), logging to {}",
            test.target_address,
            test.duration_seconds,
            test.packet_size_bytes,
            test.interval_seconds,
            test.log_path.display()
        ))
    }

    fn format_summary(&self, summary: &ChartSummary) -> Result<String> {
        let mut output = String::new();

        for line in title_lines(&summary.header, &summary.stats) {
            writeln!(output, "{}", line).map_err(fmt_error)?;
        }

        writeln!(output).map_err(fmt_error)?;
        for (label, value) in statistic_rows(summary) {
            writeln!(output, "  {:<8} {:>12}", label, value).map_err(fmt_error)?;
        }
        writeln!(output, "  {:<8} {:>12}", "Rating", summary.stats.performance_level().description())
            .map_err(fmt_error)?;

        writeln!(output).map_err(fmt_error)?;
        writeln!(output, "Log:   {}", summary.log_path.display()).map_err(fmt_error)?;
        write!(output, "Chart: {}", summary.plot_path.display()).map_err(fmt_error)?;

        Ok(output)
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("WARNING: {}", warning))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("SUCCESS: {}", message))
    }
}

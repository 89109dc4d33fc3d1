//! Colored formatter using ANSI colors for terminals that support them

use super::formatter::{fmt_error, statistic_rows, FormattingOptions, OutputFormatter};
use super::ChartSummary;
use crate::{error::Result, models::TestConfig, plot::title_lines, types::PerformanceLevel};
use colored::*;
use std::fmt::Write as _;

/// Color for an RTT classification
pub fn performance_color(level: PerformanceLevel) -> Color {
    match level {
        PerformanceLevel::Excellent => Color::Green,
        PerformanceLevel::Good => Color::Cyan,
        PerformanceLevel::Fair => Color::Yellow,
        PerformanceLevel::Poor => Color::Red,
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub info: Color,
    pub muted: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            info: Color::Cyan,
            muted: Color::BrightBlack,
        }
    }
}

pub struct ColoredFormatter {
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self {
            options,
            color_scheme: ColorScheme::default(),
        }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "═".repeat(title.chars().count() + 4);

        writeln!(output, "{}", self.colorize(&border, self.color_scheme.header)).map_err(fmt_error)?;
        writeln!(output, "  {}  ", self.colorize(title, self.color_scheme.header).bold()).map_err(fmt_error)?;
        write!(output, "{}", self.colorize(&border, self.color_scheme.header)).map_err(fmt_error)?;

        Ok(output)
    }

    fn format_test_banner(&self, test: &TestConfig) -> Result<String> {
        Ok(format!(
            "{} {} for {}s ({}B every {}s), logging to {}",
            self.colorize("Pinging", self.color_scheme.info).bold(),
            self.colorize(&test.target_address, self.color_scheme.info),
            test.duration_seconds,
            test.packet_size_bytes,
            test.interval_seconds,
            self.colorize(&test.log_path.display().to_string(), self.color_scheme.muted)
        ))
    }

    fn format_summary(&self, summary: &ChartSummary) -> Result<String> {
        let mut output = String::new();
        let level = summary.stats.performance_level();
        let lines = title_lines(&summary.header, &summary.stats);

        for (index, line) in lines.iter().enumerate() {
            // The mean line carries the rating color
            let styled = if index + 1 == lines.len() {
                self.colorize(line, performance_color(level)).bold()
            } else {
                self.colorize(line, self.color_scheme.header)
            };
            writeln!(output, "{}", styled).map_err(fmt_error)?;
        }

        writeln!(output).map_err(fmt_error)?;
        for (label, value) in statistic_rows(summary) {
            writeln!(
                output,
                "  {} {:>12}",
                self.colorize(&format!("{:<8}", label), self.color_scheme.muted),
                value
            )
            .map_err(fmt_error)?;
        }
        writeln!(
            output,
            "  {} {}",
            self.colorize(&format!("{:<8}", "Rating"), self.color_scheme.muted),
            self.colorize(&format!("{:>12}", level.description()), performance_color(level))
        )
        .map_err(fmt_error)?;

        writeln!(output).map_err(fmt_error)?;
        writeln!(output, "Log:   {}", summary.log_path.display()).map_err(fmt_error)?;
        write!(
            output,
            "Chart: {}",
            self.colorize(&summary.plot_path.display().to_string(), self.color_scheme.success)
        )
        .map_err(fmt_error)?;

        Ok(output)
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("{} {}", self.colorize("⚠", self.color_scheme.warning).bold(), warning))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("{} {}", self.colorize("✓", self.color_scheme.success).bold(), message))
    }
}

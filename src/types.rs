//! Type definitions and aliases

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// What an invocation is going to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunMode {
    /// Probe the target, record the log, then plot it
    TestAndPlot,
    /// Only plot an existing log
    PlotOnly,
}

impl RunMode {
    pub fn from_flag(plot_only: bool) -> Self {
        if plot_only {
            Self::PlotOnly
        } else {
            Self::TestAndPlot
        }
    }

    pub fn runs_test(&self) -> bool {
        matches!(self, Self::TestAndPlot)
    }
}

/// RTT classification used to colour console summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceLevel {
    /// < 50 ms
    Excellent,
    /// 50-100 ms
    Good,
    /// 100-300 ms
    Fair,
    /// >= 300 ms
    Poor,
}

impl PerformanceLevel {
    /// Classify an RTT in milliseconds
    pub fn from_rtt_ms(rtt_ms: f64) -> Self {
        if rtt_ms < 50.0 {
            Self::Excellent
        } else if rtt_ms < 100.0 {
            Self::Good
        } else if rtt_ms < 300.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_mode_from_flag() {
        assert_eq!(RunMode::from_flag(true), RunMode::PlotOnly);
        assert!(RunMode::from_flag(false).runs_test());
        assert!(!RunMode::PlotOnly.runs_test());
    }

    #[test]
    fn test_performance_level_boundaries() {
        assert_eq!(PerformanceLevel::from_rtt_ms(0.4), PerformanceLevel::Excellent);
        assert_eq!(PerformanceLevel::from_rtt_ms(50.0), PerformanceLevel::Good);
        assert_eq!(PerformanceLevel::from_rtt_ms(150.0), PerformanceLevel::Fair);
        assert_eq!(PerformanceLevel::from_rtt_ms(300.0), PerformanceLevel::Poor);
    }
}

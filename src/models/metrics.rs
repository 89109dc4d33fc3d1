//! Latency sample and statistics data models

use crate::types::PerformanceLevel;
use serde::{Deserialize, Serialize};

/// RTT samples in milliseconds, in the order the replies arrived
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleSeries {
    samples: Vec<f64>,
}

impl SampleSeries {
    pub fn new(samples: Vec<f64>) -> Self {
        Self { samples }
    }

    pub fn push(&mut self, rtt_ms: f64) {
        self.samples.push(rtt_ms);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }

    /// Arithmetic mean, `None` when there are no samples
    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            None
        } else {
            Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
        }
    }

    /// Approximate elapsed time of each sample: the samples are spread
    /// evenly over `[0, duration]`, first at 0 and last at `duration`.
    pub fn elapsed_axis(&self, duration_seconds: f64) -> Vec<f64> {
        let n = self.samples.len();
        match n {
            0 => Vec::new(),
            1 => vec![0.0],
            _ => {
                let step = duration_seconds / (n - 1) as f64;
                (0..n).map(|i| i as f64 * step).collect()
            }
        }
    }

    /// `(elapsed seconds, rtt ms)` pairs for plotting
    pub fn points(&self, duration_seconds: f64) -> Vec<(f64, f64)> {
        self.elapsed_axis(duration_seconds)
            .into_iter()
            .zip(self.samples.iter().copied())
            .collect()
    }
}

impl From<Vec<f64>> for SampleSeries {
    fn from(samples: Vec<f64>) -> Self {
        Self::new(samples)
    }
}

/// Summary statistics of a sample series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyStatistics {
    /// Number of samples
    pub sample_count: usize,

    /// Average RTT (milliseconds)
    pub mean_ms: f64,

    /// Minimum RTT (milliseconds)
    pub min_ms: f64,

    /// Maximum RTT (milliseconds)
    pub max_ms: f64,

    /// Population standard deviation (milliseconds)
    pub std_dev_ms: f64,

    /// Median RTT (milliseconds)
    pub median_ms: f64,

    /// 95th percentile RTT (milliseconds)
    pub p95_ms: f64,

    /// Mean absolute difference between consecutive samples (milliseconds)
    pub jitter_ms: f64,
}

impl LatencyStatistics {
    /// Mean formatted the way the chart title shows it
    pub fn format_mean(&self) -> String {
        format!("{:.2}", self.mean_ms)
    }

    pub fn performance_level(&self) -> PerformanceLevel {
        PerformanceLevel::from_rtt_ms(self.mean_ms)
    }
}

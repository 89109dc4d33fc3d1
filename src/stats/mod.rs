//! Statistical analysis of recorded RTT samples

use crate::{
    error::{AppError, Result},
    models::{LatencyStatistics, LogHeader, SampleSeries},
};

/// Compute summary statistics; an empty series is an error, not a zero mean
pub fn analyze(series: &SampleSeries) -> Result<LatencyStatistics> {
    let samples = series.as_slice();
    let mean = series
        .mean()
        .ok_or_else(|| AppError::no_samples("no samples to plot"))?;

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    Ok(LatencyStatistics {
        sample_count: samples.len(),
        mean_ms: mean,
        min_ms: sorted[0],
        max_ms: sorted[sorted.len() - 1],
        std_dev_ms: standard_deviation(samples, mean),
        median_ms: percentile(&sorted, 50.0),
        p95_ms: percentile(&sorted, 95.0),
        jitter_ms: jitter(samples),
    })
}

/// Linear-interpolated percentile of already sorted values
pub fn percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let rank = (percentile / 100.0).clamp(0.0, 1.0) * (sorted_values.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;

    if lower == upper {
        sorted_values[lower]
    } else {
        let weight = rank - lower as f64;
        sorted_values[lower] * (1.0 - weight) + sorted_values[upper] * weight
    }
}

/// Population standard deviation
pub fn standard_deviation(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let variance = values.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Mean absolute difference between consecutive samples
pub fn jitter(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let total: f64 = values.windows(2).map(|w| (w[1] - w[0]).abs()).sum();
    total / (values.len() - 1) as f64
}

/// How the sample count compares with what the header promises
#[derive(Debug, Clone, PartialEq)]
pub enum Consistency {
    /// Within one reply of the expectation
    Consistent,
    /// Fewer replies than expected; percentage of missing replies
    MissingReplies { expected: u64, received: u64, loss_percent: f64 },
    /// More replies than the declared test can produce
    ExcessReplies { expected: u64, received: u64 },
}

impl Consistency {
    /// Warning text, `None` when consistent
    pub fn warning(&self) -> Option<String> {
        match self {
            Self::Consistent => None,
            Self::MissingReplies { expected, received, loss_percent } => Some(format!(
                "received {} of ~{} expected replies ({:.1}% missing)",
                received, expected, loss_percent
            )),
            Self::ExcessReplies { expected, received } => Some(format!(
                "log holds {} samples but the header allows only ~{}; header and samples may not belong together",
                received, expected
            )),
        }
    }
}

/// Compare a header's expected reply count with the samples actually logged
pub fn check_consistency(header: &LogHeader, received: usize) -> Consistency {
    let expected = header.expected_replies();
    let received = received as u64;

    // ping -w sends one extra probe at t=0
    if received > expected + 1 {
        Consistency::ExcessReplies { expected, received }
    } else if received + 1 < expected {
        let loss_percent = (expected - received) as f64 / expected as f64 * 100.0;
        Consistency::MissingReplies { expected, received, loss_percent }
    } else {
        Consistency::Consistent
    }
}

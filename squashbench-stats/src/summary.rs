//! CPU-time Spread
//!
//! Dispersion of per-round CPU times within one unit. Not part of the report
//! document; used to spot noisy units.

use serde::{Deserialize, Serialize};

/// Spread of per-round CPU times
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CpuTimeSpread {
    /// Arithmetic mean (seconds)
    pub mean: f64,
    /// Median (seconds)
    pub median: f64,
    /// Sample standard deviation (seconds)
    pub std_dev: f64,
    /// Fastest round (seconds)
    pub min: f64,
    /// Slowest round (seconds)
    pub max: f64,
    /// Number of rounds
    pub rounds: usize,
}

/// Compute the spread of `samples` (seconds).
pub fn compute_spread(samples: &[f64]) -> CpuTimeSpread {
    if samples.is_empty() {
        return CpuTimeSpread::default();
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };

    let std_dev = if n < 2 {
        0.0
    } else {
        let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        variance.sqrt()
    };

    CpuTimeSpread {
        mean,
        median,
        std_dev,
        min: sorted[0],
        max: sorted[n - 1],
        rounds: n,
    }
}

impl CpuTimeSpread {
    /// Coefficient of variation (relative stddev, percent)
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            (self.std_dev / self.mean) * 100.0
        }
    }

    /// Check if the rounds agree within `cv_threshold` percent
    pub fn is_stable(&self, cv_threshold: f64) -> bool {
        self.coefficient_of_variation() < cv_threshold
    }
}

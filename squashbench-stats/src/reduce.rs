//! Round Reduction
//!
//! One unit is run for a fixed number of rounds. Every round must produce the
//! same compressed size; the CPU time is averaged.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of one successful round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    /// Compressed size in bytes
    pub compressed_size: u64,
    /// CPU time of the compression call in seconds
    pub cpu_time: f64,
}

/// Reduction of all rounds of one (sample, algorithm, level) unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitResult {
    /// Compressed size, identical across rounds
    pub compressed_size: u64,
    /// Arithmetic mean of per-round CPU time in seconds
    pub mean_cpu_time: f64,
}

/// Reduction failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReductionError {
    /// A round produced a different compressed size than the first round.
    #[error("compressed size changed in round {round}: expected {expected} bytes, got {got}")]
    NonDeterministicSize {
        /// First round's size
        expected: u64,
        /// Offending size
        got: u64,
        /// 1-based index of the offending round
        round: usize,
    },

    /// No rounds were recorded.
    #[error("no rounds to reduce")]
    Empty,
}

/// Incremental reducer; checks each round as it arrives so a run can stop at
/// the first inconsistent round.
#[derive(Debug, Clone, Default)]
pub struct RoundReducer {
    expected_size: Option<u64>,
    times: Vec<f64>,
}

impl RoundReducer {
    /// Create an empty reducer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one round.
    pub fn push(&mut self, trial: TrialResult) -> Result<(), ReductionError> {
        match self.expected_size {
            Some(expected) if expected != trial.compressed_size => {
                return Err(ReductionError::NonDeterministicSize {
                    expected,
                    got: trial.compressed_size,
                    round: self.times.len() + 1,
                });
            }
            Some(_) => {}
            None => self.expected_size = Some(trial.compressed_size),
        }
        self.times.push(trial.cpu_time);
        Ok(())
    }

    /// Number of rounds recorded so far.
    pub fn rounds(&self) -> usize {
        self.times.len()
    }

    /// Per-round CPU times recorded so far.
    pub fn cpu_times(&self) -> &[f64] {
        &self.times
    }

    /// Produce the unit result.
    pub fn finish(&self) -> Result<UnitResult, ReductionError> {
        let compressed_size = self.expected_size.ok_or(ReductionError::Empty)?;
        let mean_cpu_time = self.times.iter().sum::<f64>() / self.times.len() as f64;
        Ok(UnitResult {
            compressed_size,
            mean_cpu_time,
        })
    }
}

/// Reduce a complete set of rounds.
pub fn reduce_rounds(trials: &[TrialResult]) -> Result<UnitResult, ReductionError> {
    let mut reducer = RoundReducer::new();
    for trial in trials {
        reducer.push(*trial)?;
    }
    reducer.finish()
}

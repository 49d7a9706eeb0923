#![warn(missing_docs)]
//! Squashbench Statistics
//!
//! Reduces raw round measurements into per-unit results:
//! - Round reduction with the compressed-size determinism tripwire
//! - Multi-instance averaging across captures of one sample category
//! - CPU-time spread (min/max/stddev/CV) for diagnostics

mod average;
mod reduce;
mod summary;

pub use average::{AveragedLevel, average_instances, mean_raw_size};
pub use reduce::{ReductionError, RoundReducer, TrialResult, UnitResult, reduce_rounds};
pub use summary::{CpuTimeSpread, compute_spread};

/// Default number of rounds per (sample, algorithm, level) unit
pub const DEFAULT_ROUNDS: usize = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(DEFAULT_ROUNDS, 5);
    }
}

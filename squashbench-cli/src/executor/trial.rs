//! Trial Runner
//!
//! Runs one (sample, algorithm, level) unit for a fixed number of rounds.
//! Each round compresses, decompresses and verifies the round trip; only the
//! compression call is timed.

use crate::corpus::Sample;
use crate::error::BenchError;
use squashbench_codec::{Codec, Level};
use squashbench_stats::{RoundReducer, TrialResult, UnitResult, compute_spread};

/// Coefficient of variation (percent) above which a unit's CPU times are
/// reported as noisy.
const NOISY_UNIT_CV: f64 = 10.0;

/// Runs units for a fixed round count
#[derive(Debug, Clone, Copy)]
pub struct TrialRunner {
    rounds: usize,
}

impl TrialRunner {
    /// Runner performing `rounds` rounds per unit.
    pub fn new(rounds: usize) -> Self {
        Self { rounds }
    }

    /// Rounds per unit.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Run every round of one unit.
    ///
    /// Fails at the first tool error, round-trip mismatch or size change; no
    /// partial result is returned.
    pub fn run_unit(
        &self,
        codec: &dyn Codec,
        sample: &Sample,
        level: Level,
    ) -> Result<UnitResult, BenchError> {
        let algorithm = codec.name();
        let mut reducer = RoundReducer::new();

        for round in 1..=self.rounds {
            let compressed = codec
                .compress(&sample.payload, level)
                .map_err(|e| BenchError::from_codec(e, algorithm, level, &sample.name))?;
            let restored = codec
                .decompress(&compressed.output)
                .map_err(|e| BenchError::from_codec(e, algorithm, level, &sample.name))?;

            if restored.output != sample.payload {
                return Err(BenchError::RoundTrip {
                    algorithm: algorithm.to_string(),
                    level,
                    sample: sample.name.clone(),
                });
            }

            let trial = TrialResult {
                compressed_size: compressed.output.len() as u64,
                cpu_time: compressed.cpu_time.as_secs_f64(),
            };
            tracing::debug!(
                algorithm,
                level,
                sample = %sample.name,
                round,
                size = trial.compressed_size,
                cpu_time = trial.cpu_time,
                "round complete"
            );
            reducer
                .push(trial)
                .map_err(|e| BenchError::from_reduction(e, algorithm, level, &sample.name))?;
        }

        let spread = compute_spread(reducer.cpu_times());
        tracing::debug!(
            algorithm,
            level,
            sample = %sample.name,
            mean = spread.mean,
            min = spread.min,
            max = spread.max,
            cv = spread.coefficient_of_variation(),
            "unit complete"
        );
        if !spread.is_stable(NOISY_UNIT_CV) {
            tracing::debug!(
                algorithm,
                level,
                sample = %sample.name,
                cv = spread.coefficient_of_variation(),
                "CPU time varies across rounds"
            );
        }

        reducer
            .finish()
            .map_err(|e| BenchError::from_reduction(e, algorithm, level, &sample.name))
    }
}

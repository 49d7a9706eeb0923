//! Benchmark Errors
//!
//! Every fatal condition of a sweep. Unit-level variants name the algorithm,
//! level and sample that failed.

use crate::corpus::CorpusError;
use squashbench_codec::{CodecError, Level};
use squashbench_report::ReportError;
use squashbench_stats::ReductionError;
use std::time::Duration;
use thiserror::Error;

/// Fatal sweep error
#[derive(Debug, Error)]
pub enum BenchError {
    /// A codec tool failed to start, exited non-zero or broke its pipes
    #[error("{algorithm} level {level} failed on sample {sample}: {source}")]
    ToolInvocation {
        /// Algorithm key of the failing unit
        algorithm: String,
        /// Level of the failing unit
        level: Level,
        /// Sample the unit was run on
        sample: String,
        /// Underlying tool failure
        #[source]
        source: CodecError,
    },

    /// A codec tool exceeded its deadline
    #[error("{algorithm} level {level} timed out on sample {sample} after {after:?}")]
    Timeout {
        /// Algorithm key of the failing unit
        algorithm: String,
        /// Level of the failing unit
        level: Level,
        /// Sample the unit was run on
        sample: String,
        /// Deadline that was exceeded
        after: Duration,
    },

    /// Decompressed output differs from the original sample
    #[error("{algorithm} level {level} round trip mismatch on sample {sample}")]
    RoundTrip {
        /// Algorithm key of the failing unit
        algorithm: String,
        /// Level of the failing unit
        level: Level,
        /// Sample the unit was run on
        sample: String,
    },

    /// Compressed size changed between rounds
    #[error(
        "{algorithm} level {level} is non-deterministic on sample {sample}: \
         round {round} produced {got} bytes, expected {expected}"
    )]
    NonDeterministicSize {
        /// Algorithm key of the failing unit
        algorithm: String,
        /// Level of the failing unit
        level: Level,
        /// Sample the unit was run on
        sample: String,
        /// Size produced by the first round
        expected: u64,
        /// Size produced by the diverging round
        got: u64,
        /// 1-based round that diverged
        round: usize,
    },

    /// Rejected run settings
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Sample corpus could not be loaded
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    /// Report could not be persisted
    #[error(transparent)]
    Report(#[from] ReportError),
}

impl BenchError {
    /// Attach unit context to a codec failure.
    pub(crate) fn from_codec(err: CodecError, algorithm: &str, level: Level, sample: &str) -> Self {
        match err {
            CodecError::Timeout { after, .. } => BenchError::Timeout {
                algorithm: algorithm.to_string(),
                level,
                sample: sample.to_string(),
                after,
            },
            source => BenchError::ToolInvocation {
                algorithm: algorithm.to_string(),
                level,
                sample: sample.to_string(),
                source,
            },
        }
    }

    /// Attach unit context to a round reduction failure.
    pub(crate) fn from_reduction(
        err: ReductionError,
        algorithm: &str,
        level: Level,
        sample: &str,
    ) -> Self {
        match err {
            ReductionError::NonDeterministicSize {
                expected,
                got,
                round,
            } => BenchError::NonDeterministicSize {
                algorithm: algorithm.to_string(),
                level,
                sample: sample.to_string(),
                expected,
                got,
                round,
            },
            ReductionError::Empty => {
                BenchError::InvalidConfig("rounds must be at least 1".to_string())
            }
        }
    }
}

#![warn(missing_docs)]
//! # Squashbench
//!
//! Compression benchmarking harness driving external codec tools.
//!
//! Squashbench measures how well and how fast a set of command-line compressors
//! handle a corpus of sensor samples:
//! - **Codec Adapters**: zlib, bzip2, lzma, zstd, lzo, brotli over stdin/stdout, LZMH through files
//! - **Per-process CPU Time**: user + system time of the exact child that compressed
//! - **Round-trip Verification**: every round decompresses and compares against the input
//! - **Determinism Tripwire**: compressed size must not change between rounds
//! - **Multi-instance Averaging**: several captures per category, averaged per level
//! - **Fail Fast**: the first failing unit aborts the run and no report is written
//!
//! ## Quick Start
//!
//! ```ignore
//! use squashbench::prelude::*;
//!
//! let corpus = Corpus::from_payloads([("temperature", std::fs::read("data/new/temperature.bin")?)]);
//! let codecs = vec![build_codec(Algorithm::Zstd, &CodecOptions::default())];
//! let executor = Executor::new(ExecutionConfig::default())?;
//! let mut sink = JsonFileSink::new("results/results.json");
//! let outcome = run_sweep(&executor, &corpus, &codecs, &mut sink, None)?;
//! ```

// Re-export codec types
pub use squashbench_codec::{
    Algorithm, Codec, CodecError, CodecOptions, DEFAULT_TIMEOUT, FileCodec, Invocation, Level,
    PipeCodec, ProcessRunner, TimingSource, build_codec,
};

// Re-export orchestration
pub use squashbench_cli::{
    BenchError, Corpus, CorpusError, DirectorySource, ExecutionConfig, Executor,
    MonotonicityWarning, Sample, SampleCategory, SampleSource, SquashConfig, SweepOutcome,
    TrialRunner, check_monotonicity, run_sweep,
};

// Re-export report types
pub use squashbench_report::{
    JsonFileSink, LevelStatistics, MemorySink, Report, ReportError, ReportSink, StatisticsTable,
};

// Re-export stats
pub use squashbench_stats::{DEFAULT_ROUNDS, TrialResult, UnitResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Algorithm, BenchError, Codec, CodecOptions, Corpus, ExecutionConfig, Executor,
        JsonFileSink, ReportSink, build_codec, run_sweep,
    };
}

/// Run the Squashbench CLI harness.
///
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     squashbench::run()
/// }
/// ```
pub use squashbench_cli::run;

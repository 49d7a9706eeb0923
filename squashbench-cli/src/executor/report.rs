//! Report Building
//!
//! Turns a finished Statistics Table into the report document and hands it to
//! the sink.
//!
//! ## Pipeline
//!
//! ```text
//!   Executor::execute ──► StatisticsTable
//!                               │
//!                               ▼
//!                    check_monotonicity (warnings only)
//!                               │
//!                               ▼
//!                 Report { times, sizes, meta? }
//!                               │
//!                               ▼
//!                     ReportSink::persist (once)
//! ```
//!
//! A failed sweep never reaches the sink, so a previous report on disk is left
//! untouched.

use super::execution::Executor;
use super::verification::{MonotonicityWarning, check_monotonicity};
use crate::corpus::Corpus;
use crate::error::BenchError;
use squashbench_codec::Codec;
use squashbench_report::{Report, ReportMeta, ReportSink, StatisticsTable};

/// Result of a successful sweep
#[derive(Debug, Clone)]
pub struct SweepOutcome {
    /// The persisted report
    pub report: Report,
    /// Non-fatal level-ordering anomalies
    pub warnings: Vec<MonotonicityWarning>,
}

/// Build a Report from a finished table
pub fn build_report(table: StatisticsTable, meta: Option<ReportMeta>) -> Report {
    Report::new(table, meta)
}

/// Execute the sweep, then persist the report exactly once.
pub fn run_sweep(
    executor: &Executor,
    corpus: &Corpus,
    codecs: &[Box<dyn Codec>],
    sink: &mut dyn ReportSink,
    meta: Option<ReportMeta>,
) -> Result<SweepOutcome, BenchError> {
    let table = executor.execute(corpus, codecs)?;
    let warnings = check_monotonicity(&table, executor.config().monotonicity_tolerance);
    let report = build_report(table, meta);

    sink.persist(&report)?;
    tracing::debug!(warnings = warnings.len(), "report persisted");

    Ok(SweepOutcome { report, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ExecutionConfig;
    use squashbench_codec::{CodecError, Invocation, Level};
    use squashbench_report::MemorySink;
    use std::time::Duration;

    /// Output size grows with level so every non-lowest level violates ordering.
    struct Inflating;

    impl Codec for Inflating {
        fn name(&self) -> &str {
            "inflating"
        }
        fn levels(&self) -> Vec<Level> {
            vec![1, 2]
        }
        fn compress(&self, payload: &[u8], level: Level) -> Result<Invocation, CodecError> {
            let mut output = vec![0u8; level as usize * 50];
            output.extend_from_slice(payload);
            Ok(Invocation {
                output,
                cpu_time: Duration::from_micros(10),
            })
        }
        fn decompress(&self, compressed: &[u8]) -> Result<Invocation, CodecError> {
            let header = compressed.iter().take_while(|&&b| b == 0).count();
            Ok(Invocation {
                output: compressed[header..].to_vec(),
                cpu_time: Duration::ZERO,
            })
        }
    }

    struct Broken;

    impl Codec for Broken {
        fn name(&self) -> &str {
            "broken"
        }
        fn levels(&self) -> Vec<Level> {
            vec![1]
        }
        fn compress(&self, payload: &[u8], _level: Level) -> Result<Invocation, CodecError> {
            Ok(Invocation {
                output: payload.to_vec(),
                cpu_time: Duration::ZERO,
            })
        }
        fn decompress(&self, _compressed: &[u8]) -> Result<Invocation, CodecError> {
            Ok(Invocation {
                output: b"garbage".to_vec(),
                cpu_time: Duration::ZERO,
            })
        }
    }

    #[test]
    fn test_sweep_persists_once_and_reports_warnings() {
        let corpus = Corpus::from_payloads([("battery", vec![7u8; 100])]);
        let codecs: Vec<Box<dyn Codec>> = vec![Box::new(Inflating)];
        let executor = Executor::new(ExecutionConfig::default()).unwrap();
        let mut sink = MemorySink::default();

        let outcome = run_sweep(&executor, &corpus, &codecs, &mut sink, None).unwrap();

        assert_eq!(sink.documents.len(), 1);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].level, 2);
        assert_eq!(outcome.report.table.get("battery", "inflating", 1).unwrap().size, 150.0);
    }

    #[test]
    fn test_failed_sweep_skips_sink() {
        let corpus = Corpus::from_payloads([("battery", vec![7u8; 100])]);
        let codecs: Vec<Box<dyn Codec>> = vec![Box::new(Broken)];
        let executor = Executor::new(ExecutionConfig::default()).unwrap();
        let mut sink = MemorySink::default();

        let err = run_sweep(&executor, &corpus, &codecs, &mut sink, None).unwrap_err();

        assert!(matches!(err, BenchError::RoundTrip { .. }));
        assert!(sink.documents.is_empty());
    }
}

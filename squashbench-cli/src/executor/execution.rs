//! Sweep Execution
//!
//! The orchestrator: drives every (algorithm, category, instance, level) unit
//! serially and fills the Statistics Table.
//!
//! ## Data Flow
//!
//! ```text
//! Corpus + codecs (run order)
//!        │
//!        ▼
//!   ExecutionConfig
//!        │
//!        ▼
//! ┌──────────────────┐
//! │    Executor      │  algorithm → category → instance → level
//! │   (TrialRunner)  │  rounds: compress → decompress → verify
//! └────────┬─────────┘
//!          │
//!          ▼
//!  StatisticsTable (raw sizes + averaged levels)
//! ```
//!
//! The first failing unit aborts the sweep; nothing partial is returned.

use super::statistics::aggregate_instances;
use super::trial::TrialRunner;
use crate::corpus::Corpus;
use crate::error::BenchError;
use indicatif::{ProgressBar, ProgressStyle};
use squashbench_codec::{Codec, Level};
use squashbench_report::StatisticsTable;
use squashbench_stats::{UnitResult, mean_raw_size};
use std::collections::BTreeMap;
use std::time::Instant;

/// Configuration for sweep execution
#[derive(Debug, Clone)]
pub struct ExecutionConfig {
    /// Rounds per (sample, algorithm, level) unit
    pub rounds: usize,
    /// Relative size increase tolerated before a monotonicity warning
    pub monotonicity_tolerance: f64,
    /// Draw a progress bar on stderr
    pub show_progress: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            rounds: squashbench_stats::DEFAULT_ROUNDS,
            monotonicity_tolerance: 0.01,
            show_progress: false,
        }
    }
}

/// Serial sweep executor
#[derive(Debug, Clone)]
pub struct Executor {
    config: ExecutionConfig,
    trials: TrialRunner,
}

impl Executor {
    /// Validate `config` and build an executor.
    pub fn new(config: ExecutionConfig) -> Result<Self, BenchError> {
        if config.rounds == 0 {
            return Err(BenchError::InvalidConfig(
                "rounds must be at least 1".to_string(),
            ));
        }
        if !config.monotonicity_tolerance.is_finite() || config.monotonicity_tolerance < 0.0 {
            return Err(BenchError::InvalidConfig(format!(
                "monotonicity tolerance must be a non-negative number, got {}",
                config.monotonicity_tolerance
            )));
        }
        Ok(Self {
            trials: TrialRunner::new(config.rounds),
            config,
        })
    }

    /// Execution settings.
    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// Run every codec over every sample of `corpus`.
    pub fn execute(
        &self,
        corpus: &Corpus,
        codecs: &[Box<dyn Codec>],
    ) -> Result<StatisticsTable, BenchError> {
        let start = Instant::now();
        let mut table = StatisticsTable::new();

        for category in corpus.categories() {
            table.set_raw(
                &category.name,
                mean_raw_size(&category.raw_sizes()),
                category.samples.len(),
            );
        }

        let total_units: usize = codecs
            .iter()
            .map(|c| c.levels().len() * corpus.sample_count())
            .sum();
        let pb = self.progress_bar(total_units as u64);

        for codec in codecs {
            let codec = codec.as_ref();
            let levels = codec.levels();
            tracing::info!(algorithm = codec.name(), levels = levels.len(), "running algorithm");

            for category in corpus.categories() {
                let mut instances: Vec<BTreeMap<Level, UnitResult>> =
                    Vec::with_capacity(category.samples.len());

                for sample in &category.samples {
                    let mut units = BTreeMap::new();
                    for &level in &levels {
                        pb.set_message(format!("{} -{} {}", codec.name(), level, sample.name));
                        let unit = self.trials.run_unit(codec, sample, level).inspect_err(|_| {
                            pb.abandon_with_message("Failed");
                        })?;
                        units.insert(level, unit);
                        pb.inc(1);
                    }
                    instances.push(units);
                }

                table.insert_levels(&category.name, codec.name(), aggregate_instances(&instances));
            }
        }

        pb.finish_with_message("Complete");
        tracing::info!(
            units = total_units,
            rounds = self.config.rounds,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "sweep complete"
        );
        Ok(table)
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    }
}

//! Sweep Executor
//!
//! Runs the benchmark sweep and turns its results into a report.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Corpus + Codecs
//!       │
//!       ▼
//! ┌─────────────┐
//! │    trial    │  Rounds of one unit, round-trip verified
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │  execution  │  Serial sweep, progress bar
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ statistics  │  Average instances into table entries
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │verification │  Level monotonicity warnings
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   report    │  Build Report, persist once
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human-readable output
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`trial`] - Per-unit round loop
//! - [`execution`] - Orchestrator filling the Statistics Table
//! - [`statistics`] - Multi-instance aggregation
//! - [`verification`] - Monotonicity checks
//! - [`report`] - Report building and persistence
//! - [`formatting`] - Human-readable output formatting
//! - [`metadata`] - System metadata collection

mod execution;
mod formatting;
mod metadata;
mod report;
mod statistics;
mod trial;
mod verification;

// Re-export public API
pub use execution::{ExecutionConfig, Executor};
pub use formatting::format_human_output;
pub use metadata::build_report_meta;
pub use report::{SweepOutcome, build_report, run_sweep};
pub use statistics::aggregate_instances;
pub use trial::TrialRunner;
pub use verification::{MonotonicityWarning, check_monotonicity};

#![warn(missing_docs)]
//! Squashbench Report - Result Tables and Output
//!
//! Holds the Statistics Table built during a sweep and renders it:
//! - JSON (`{ "times": ..., "sizes": ... }`, the persisted report)
//! - CSV (one row per category/algorithm/level)
//!
//! Persistence goes through a [`ReportSink`].

mod csv;
mod json;
mod report;

pub use csv::generate_csv_report;
pub use json::{JsonFileSink, MemorySink, ReportError, ReportSink, generate_json_report};
pub use report::{
    AlgorithmStatistics, CategoryStatistics, LevelStatistics, Report, ReportMeta, StatisticsTable,
    SystemInfo,
};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON report document
    Json,
    /// CSV for spreadsheets
    Csv,
    /// Human-readable terminal output
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

//! JSON Output and Report Sinks

use crate::report::Report;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure persisting a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The report could not be encoded as JSON
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The report file or its parent directories could not be written
    #[error("failed to write report to {}: {source}", .path.display())]
    Write {
        /// Destination file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Generate a prettified JSON report.
pub fn generate_json_report(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Destination that persists the final report.
///
/// Called at most once per run, after every unit has succeeded.
pub trait ReportSink {
    /// Persist `report`.
    fn persist(&mut self, report: &Report) -> Result<(), ReportError>;
}

/// Writes the JSON document to a file, creating parent directories.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    /// Sink writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for JsonFileSink {
    fn persist(&mut self, report: &Report) -> Result<(), ReportError> {
        let json = generate_json_report(report)?;
        let write_err = |source| ReportError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_err)?;
            }
        }
        std::fs::write(&self.path, json).map_err(write_err)?;
        Ok(())
    }
}

/// Keeps the serialized documents in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    /// Every document persisted so far
    pub documents: Vec<String>,
}

impl ReportSink for MemorySink {
    fn persist(&mut self, report: &Report) -> Result<(), ReportError> {
        self.documents.push(generate_json_report(report)?);
        Ok(())
    }
}

//! Codec invocation errors.

use std::time::Duration;
use thiserror::Error;

/// Failure while driving an external codec tool.
///
/// None of these are retried.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The tool could not be started, exited abnormally, or produced unusable output.
    #[error("tool invocation failed: {tool}: {reason}")]
    ToolInvocation {
        /// Program that was invoked
        tool: String,
        /// What went wrong
        reason: String,
    },

    /// The tool did not exit before its deadline and was killed.
    #[error("tool timed out: {tool} did not finish within {after:?}")]
    Timeout {
        /// Program that was invoked
        tool: String,
        /// Deadline that expired
        after: Duration,
    },

    /// A level outside the codec's domain was requested.
    #[error("{codec} does not support level {level}")]
    UnsupportedLevel {
        /// Codec name
        codec: String,
        /// Requested level
        level: u32,
    },

    /// Local I/O around the invocation failed (temporary files, pipes).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    pub(crate) fn invocation(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        CodecError::ToolInvocation {
            tool: tool.into(),
            reason: reason.into(),
        }
    }
}

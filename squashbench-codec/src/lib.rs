#![warn(missing_docs)]
//! Squashbench Codec - External Codec Adapters
//!
//! This crate wraps command-line compressors behind one contract:
//! - [`Codec`] trait: level domain, compress, decompress
//! - [`PipeCodec`]: tools exchanging data over stdin/stdout
//! - [`FileCodec`]: tools that only read and write named files
//! - [`ProcessRunner`]: spawn, feed, drain, bounded wait, per-child CPU accounting
//!
//! Every call returns an [`Invocation`] whose `cpu_time` is the user + system time
//! of the exact process that produced the output.

mod algorithm;
mod error;
mod file;
mod pipe;
mod process;

pub use algorithm::{Algorithm, Level};
pub use error::CodecError;
pub use file::{FileCodec, TimingSource, parse_reported_time};
pub use pipe::PipeCodec;
pub use process::{Invocation, ProcessOutput, ProcessRunner};

use std::path::PathBuf;
use std::time::Duration;

/// Default deadline for one tool invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Uniform invoke contract over one compression algorithm.
pub trait Codec {
    /// Name used as the algorithm key in reports.
    fn name(&self) -> &str;

    /// Levels to benchmark, in ascending order.
    fn levels(&self) -> Vec<Level>;

    /// Compress `payload` at `level`.
    fn compress(&self, payload: &[u8], level: Level) -> Result<Invocation, CodecError>;

    /// Invert [`Codec::compress`].
    fn decompress(&self, compressed: &[u8]) -> Result<Invocation, CodecError>;
}

/// Per-algorithm construction options.
#[derive(Debug, Clone)]
pub struct CodecOptions {
    /// Deadline for each tool invocation
    pub timeout: Duration,
    /// Program override; `None` uses [`Algorithm::default_binary`]
    pub binary: Option<PathBuf>,
    /// Timing source for file-based codecs
    pub timing: TimingSource,
    /// Parent of the per-call temporary directories of file-based codecs;
    /// `None` uses the system temp directory
    pub scratch_dir: Option<PathBuf>,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            binary: None,
            timing: TimingSource::default(),
            scratch_dir: None,
        }
    }
}

/// Build the adapter for `algorithm`.
pub fn build_codec(algorithm: Algorithm, options: &CodecOptions) -> Box<dyn Codec> {
    let binary = options
        .binary
        .clone()
        .unwrap_or_else(|| PathBuf::from(algorithm.default_binary()));
    let runner = ProcessRunner::new(options.timeout);

    if algorithm.is_file_based() {
        Box::new(
            FileCodec::new(algorithm.name(), binary, runner, options.timing)
                .with_scratch_dir(options.scratch_dir.clone()),
        )
    } else {
        Box::new(PipeCodec::new(algorithm, binary, runner))
    }
}

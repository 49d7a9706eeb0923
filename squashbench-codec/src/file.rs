//! File-based adapter for codecs that cannot stream through pipes.
//!
//! The DataCompressor CLI takes `(input_path, output_path, encode|decode, codec)`.
//! Each call gets its own temporary directory, removed when the call returns on
//! any path. It is created under the system temp directory unless a scratch
//! directory is configured.

use crate::algorithm::Level;
use crate::error::CodecError;
use crate::process::{Invocation, ProcessRunner};
use crate::Codec;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::PathBuf;
use std::time::Duration;

const INPUT_FILE: &str = "input.bin";
const OUTPUT_FILE: &str = "output.bin";

/// Where the compression CPU time of a file-based codec comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimingSource {
    /// Resource usage of the reaped encoder process (default)
    #[default]
    ProcessAccounting,
    /// Timing printed by the encoder itself (microseconds, sixth stdout line)
    Reported,
}

/// Adapter for the DataCompressor CLI.
#[derive(Debug, Clone)]
pub struct FileCodec {
    codec: String,
    binary: PathBuf,
    runner: ProcessRunner,
    timing: TimingSource,
    scratch_dir: Option<PathBuf>,
}

impl FileCodec {
    /// Create an adapter invoking `binary` with codec name `codec`.
    pub fn new(
        codec: impl Into<String>,
        binary: impl Into<PathBuf>,
        runner: ProcessRunner,
        timing: TimingSource,
    ) -> Self {
        Self {
            codec: codec.into(),
            binary: binary.into(),
            runner,
            timing,
            scratch_dir: None,
        }
    }

    /// Create per-call temporary directories under `dir` instead of the
    /// system temp directory.
    pub fn with_scratch_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.scratch_dir = dir;
        self
    }

    fn invoke(&self, input: &[u8], mode: &str) -> Result<(Invocation, String), CodecError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("squashbench-");
        let dir = match &self.scratch_dir {
            Some(base) => builder.tempdir_in(base)?,
            None => builder.tempdir()?,
        };
        let input_path = dir.path().join(INPUT_FILE);
        let output_path = dir.path().join(OUTPUT_FILE);
        std::fs::write(&input_path, input)?;

        let output = self.runner.run(
            self.binary.as_os_str(),
            [
                input_path.as_os_str(),
                output_path.as_os_str(),
                OsStr::new(mode),
                OsStr::new(&self.codec),
            ],
            None,
        )?;

        let produced = std::fs::read(&output_path).map_err(|e| {
            CodecError::invocation(
                self.binary.to_string_lossy(),
                format!("{} produced no readable output file: {}", mode, e),
            )
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        Ok((
            Invocation {
                output: produced,
                cpu_time: output.cpu_time,
            },
            stdout,
        ))
    }
}

impl Codec for FileCodec {
    fn name(&self) -> &str {
        &self.codec
    }

    fn levels(&self) -> Vec<Level> {
        vec![0]
    }

    fn compress(&self, payload: &[u8], level: Level) -> Result<Invocation, CodecError> {
        if level != 0 {
            return Err(CodecError::UnsupportedLevel {
                codec: self.codec.clone(),
                level,
            });
        }

        let (mut invocation, stdout) = self.invoke(payload, "encode")?;
        if self.timing == TimingSource::Reported {
            invocation.cpu_time = parse_reported_time(&stdout).ok_or_else(|| {
                CodecError::invocation(
                    self.binary.to_string_lossy(),
                    "encoder output does not contain a timing report",
                )
            })?;
        }
        Ok(invocation)
    }

    fn decompress(&self, compressed: &[u8]) -> Result<Invocation, CodecError> {
        self.invoke(compressed, "decode").map(|(invocation, _)| invocation)
    }
}

/// Extract the encoder's self-reported time: 5th space-separated field of
/// the 6th stdout line, in microseconds.
pub fn parse_reported_time(stdout: &str) -> Option<Duration> {
    let field = stdout.lines().nth(5)?.split(' ').nth(4)?;
    let micros: f64 = field.trim().parse().ok()?;
    if !micros.is_finite() || micros < 0.0 {
        return None;
    }
    Some(Duration::from_nanos((micros * 1_000.0).round() as u64))
}

//! Pipe-based adapters: payload in on stdin, result out on stdout.

use crate::algorithm::{Algorithm, Level};
use crate::error::CodecError;
use crate::process::{Invocation, ProcessRunner};
use crate::Codec;
use std::path::PathBuf;

/// Adapter for a command-line codec that streams through stdin/stdout.
#[derive(Debug, Clone)]
pub struct PipeCodec {
    algorithm: Algorithm,
    binary: PathBuf,
    runner: ProcessRunner,
}

impl PipeCodec {
    /// Create an adapter for `algorithm` invoking `binary`.
    pub fn new(algorithm: Algorithm, binary: impl Into<PathBuf>, runner: ProcessRunner) -> Self {
        Self {
            algorithm,
            binary: binary.into(),
            runner,
        }
    }
}

impl Codec for PipeCodec {
    fn name(&self) -> &str {
        self.algorithm.name()
    }

    fn levels(&self) -> Vec<Level> {
        self.algorithm.levels().collect()
    }

    fn compress(&self, payload: &[u8], level: Level) -> Result<Invocation, CodecError> {
        if !self.algorithm.levels().contains(&level) {
            return Err(CodecError::UnsupportedLevel {
                codec: self.name().to_string(),
                level,
            });
        }

        let output = self.runner.run(
            self.binary.as_os_str(),
            self.algorithm.compress_args(level),
            Some(payload),
        )?;

        Ok(Invocation {
            output: output.stdout,
            cpu_time: output.cpu_time,
        })
    }

    fn decompress(&self, compressed: &[u8]) -> Result<Invocation, CodecError> {
        let output = self.runner.run(
            self.binary.as_os_str(),
            self.algorithm.decompress_args(),
            Some(compressed),
        )?;

        Ok(Invocation {
            output: output.stdout,
            cpu_time: output.cpu_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn codec(algorithm: Algorithm) -> PipeCodec {
        PipeCodec::new(
            algorithm,
            algorithm.default_binary(),
            ProcessRunner::new(Duration::from_secs(30)),
        )
    }

    #[test]
    fn test_rejects_level_outside_domain() {
        let err = codec(Algorithm::Zlib).compress(b"abc", 0).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedLevel { level: 0, .. }));
    }

    #[test]
    fn test_missing_tool_is_invocation_error() {
        let codec = PipeCodec::new(
            Algorithm::Zstd,
            "/nonexistent/zstd",
            ProcessRunner::new(Duration::from_secs(5)),
        );
        let err = codec.compress(b"abc", 3).unwrap_err();
        assert!(matches!(err, CodecError::ToolInvocation { .. }));
    }

    #[test]
    #[ignore] // Requires zstd on PATH
    fn test_zstd_roundtrip() {
        let codec = codec(Algorithm::Zstd);
        let payload = b"squashbench squashbench squashbench squashbench".repeat(64);
        let compressed = codec.compress(&payload, 3).unwrap();
        assert!(compressed.output.len() < payload.len());
        let restored = codec.decompress(&compressed.output).unwrap();
        assert_eq!(restored.output, payload);
    }

    #[test]
    #[ignore] // Requires bzip2 on PATH
    fn test_bzip2_size_is_deterministic() {
        let codec = codec(Algorithm::Bzip2);
        let payload: Vec<u8> = (0..20_000u32).map(|i| (i % 251) as u8).collect();
        let first = codec.compress(&payload, 9).unwrap().output.len();
        let second = codec.compress(&payload, 9).unwrap().output.len();
        assert_eq!(first, second);
    }
}

//! Supported Algorithms
//!
//! The closed set of codecs the harness knows how to drive, their level
//! domains and the command lines used to invoke them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Quality/effort setting of one algorithm.
pub type Level = u32;

/// Compression algorithm under test.
///
/// Declaration order is the run order of a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Raw zlib streams via `zlib-flate`
    Zlib,
    /// `bzip2`
    Bzip2,
    /// Legacy `.lzma` container via `xz --format=lzma`
    Lzma,
    /// Zstandard via `zstd`
    Zstd,
    /// LZO via `lzop`
    Lzo,
    /// `brotli`
    Brotli,
    /// LZMH through the DataCompressor CLI (file based, single level)
    Lzmh,
}

impl Algorithm {
    /// Every algorithm, in run order.
    pub const ALL: [Algorithm; 7] = [
        Algorithm::Zlib,
        Algorithm::Bzip2,
        Algorithm::Lzma,
        Algorithm::Zstd,
        Algorithm::Lzo,
        Algorithm::Brotli,
        Algorithm::Lzmh,
    ];

    /// Lowercase name used in reports and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Zlib => "zlib",
            Algorithm::Bzip2 => "bzip2",
            Algorithm::Lzma => "lzma",
            Algorithm::Zstd => "zstd",
            Algorithm::Lzo => "lzo",
            Algorithm::Brotli => "brotli",
            Algorithm::Lzmh => "lzmh",
        }
    }

    /// Levels benchmarked for this algorithm, in ascending order.
    pub fn levels(self) -> RangeInclusive<Level> {
        match self {
            Algorithm::Zlib | Algorithm::Bzip2 | Algorithm::Lzo => 1..=9,
            Algorithm::Lzma => 0..=9,
            Algorithm::Zstd => 1..=19,
            Algorithm::Brotli => 0..=11,
            Algorithm::Lzmh => 0..=0,
        }
    }

    /// Program invoked when no override is configured.
    pub fn default_binary(self) -> &'static str {
        match self {
            Algorithm::Zlib => "zlib-flate",
            Algorithm::Bzip2 => "bzip2",
            Algorithm::Lzma => "xz",
            Algorithm::Zstd => "zstd",
            Algorithm::Lzo => "lzop",
            Algorithm::Brotli => "brotli",
            Algorithm::Lzmh => "./data-compressor/DataCompressor/build/gcc/DCCLI",
        }
    }

    /// Whether the tool exchanges data through files instead of stdin/stdout.
    pub fn is_file_based(self) -> bool {
        matches!(self, Algorithm::Lzmh)
    }

    /// Arguments compressing stdin to stdout at `level` (pipe-based tools only).
    pub(crate) fn compress_args(self, level: Level) -> Vec<String> {
        match self {
            Algorithm::Zlib => vec![format!("-compress={}", level)],
            Algorithm::Bzip2 => vec![
                "--compress".into(),
                "--stdout".into(),
                format!("-{}", level),
            ],
            Algorithm::Lzma => vec![
                "--format=lzma".into(),
                "--stdout".into(),
                format!("-{}", level),
            ],
            Algorithm::Zstd => vec!["--stdout".into(), "--force".into(), format!("-{}", level)],
            Algorithm::Lzo => vec!["-c".into(), format!("-{}", level)],
            Algorithm::Brotli => vec![
                "--stdout".into(),
                "--force".into(),
                format!("--quality={}", level),
            ],
            Algorithm::Lzmh => Vec::new(),
        }
    }

    /// Arguments decompressing stdin to stdout (pipe-based tools only).
    pub(crate) fn decompress_args(self) -> Vec<String> {
        let args: &[&str] = match self {
            Algorithm::Zlib => &["-uncompress"],
            Algorithm::Bzip2 => &["--stdout", "--decompress"],
            Algorithm::Lzma => &["--stdout", "--decompress"],
            Algorithm::Zstd => &["--stdout", "--force", "--decompress"],
            Algorithm::Lzo => &["-c", "-d"],
            Algorithm::Brotli => &["--stdout", "--force", "--decompress"],
            Algorithm::Lzmh => &[],
        };
        args.iter().map(|a| a.to_string()).collect()
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name() == wanted)
            .ok_or_else(|| format!("Unknown algorithm: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_domains() {
        let counts: Vec<usize> = Algorithm::ALL.iter().map(|a| a.levels().count()).collect();
        assert_eq!(counts, vec![9, 9, 10, 19, 9, 12, 1]);
        assert_eq!(Algorithm::Lzma.levels().next(), Some(0));
        assert_eq!(Algorithm::Zstd.levels().last(), Some(19));
        assert_eq!(Algorithm::Lzmh.levels().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_run_order_matches_ord() {
        let mut sorted = Algorithm::ALL;
        sorted.sort();
        assert_eq!(sorted, Algorithm::ALL);
    }

    #[test]
    fn test_parse_roundtrips_names() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.name().parse::<Algorithm>().unwrap(), algorithm);
        }
        assert_eq!(" ZSTD ".parse::<Algorithm>().unwrap(), Algorithm::Zstd);
        assert!("snappy".parse::<Algorithm>().is_err());
    }

    #[test]
    fn test_compress_args_carry_level() {
        assert_eq!(Algorithm::Zlib.compress_args(7), vec!["-compress=7"]);
        assert_eq!(
            Algorithm::Brotli.compress_args(11),
            vec!["--stdout", "--force", "--quality=11"]
        );
        assert_eq!(
            Algorithm::Lzma.compress_args(0),
            vec!["--format=lzma", "--stdout", "-0"]
        );
        assert_eq!(Algorithm::Lzo.decompress_args(), vec!["-c", "-d"]);
    }

    #[test]
    fn test_only_lzmh_is_file_based() {
        let file_based: Vec<_> = Algorithm::ALL
            .into_iter()
            .filter(|a| a.is_file_based())
            .collect();
        assert_eq!(file_based, vec![Algorithm::Lzmh]);
    }
}

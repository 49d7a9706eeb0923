//! Configuration loading from squash.toml
//!
//! Squashbench configuration can be specified in a `squash.toml` file in the project root.
//! The configuration is automatically discovered by walking up from the current directory.

use serde::{Deserialize, Serialize};
use squashbench_codec::{Algorithm, TimingSource};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Squashbench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SquashConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Sample corpus configuration
    #[serde(default)]
    pub corpus: CorpusConfig,
    /// Codec binary overrides
    #[serde(default)]
    pub tools: ToolsConfig,
    /// LZMH-specific settings
    #[serde(default)]
    pub lzmh: LzmhConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Runner configuration for the sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Rounds per (sample, algorithm, level) unit
    #[serde(default = "default_rounds")]
    pub rounds: usize,
    /// Deadline for one codec invocation (e.g., "60s", "5m")
    #[serde(default = "default_timeout")]
    pub timeout: String,
    /// Relative size increase over the lowest level tolerated before a
    /// monotonicity warning (0.01 = 1%)
    #[serde(default = "default_tolerance")]
    pub monotonicity_tolerance: f64,
    /// Algorithms to run (all when unset)
    #[serde(default)]
    pub algorithms: Option<Vec<String>>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            rounds: default_rounds(),
            timeout: default_timeout(),
            monotonicity_tolerance: default_tolerance(),
            algorithms: None,
        }
    }
}

fn default_rounds() -> usize {
    squashbench_stats::DEFAULT_ROUNDS
}
fn default_timeout() -> String {
    "60s".to_string()
}
fn default_tolerance() -> f64 {
    0.01
}

/// Sample corpus configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Directory holding the sample files
    #[serde(default = "default_directory")]
    pub directory: String,
    /// Sample categories, in report order
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    /// Exact number of numbered instances per category (count up to the first gap when unset)
    #[serde(default)]
    pub instances: Option<usize>,
    /// Sample file extension
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            categories: default_categories(),
            instances: None,
            extension: default_extension(),
        }
    }
}

fn default_directory() -> String {
    "data/new".to_string()
}
fn default_categories() -> Vec<String> {
    [
        "battery",
        "detectedImages",
        "image",
        "humidity",
        "position",
        "temperature",
        "tempSensor",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_extension() -> String {
    "bin".to_string()
}

/// Codec binary overrides (program name or path per algorithm)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// `zlib` tool
    #[serde(default)]
    pub zlib: Option<PathBuf>,
    /// `bzip2` tool
    #[serde(default)]
    pub bzip2: Option<PathBuf>,
    /// `lzma` tool
    #[serde(default)]
    pub lzma: Option<PathBuf>,
    /// `zstd` tool
    #[serde(default)]
    pub zstd: Option<PathBuf>,
    /// `lzo` tool
    #[serde(default)]
    pub lzo: Option<PathBuf>,
    /// `brotli` tool
    #[serde(default)]
    pub brotli: Option<PathBuf>,
    /// `lzmh` tool
    #[serde(default)]
    pub lzmh: Option<PathBuf>,
}

impl ToolsConfig {
    /// Configured override for `algorithm`, if any.
    pub fn binary_for(&self, algorithm: Algorithm) -> Option<&Path> {
        let binary = match algorithm {
            Algorithm::Zlib => &self.zlib,
            Algorithm::Bzip2 => &self.bzip2,
            Algorithm::Lzma => &self.lzma,
            Algorithm::Zstd => &self.zstd,
            Algorithm::Lzo => &self.lzo,
            Algorithm::Brotli => &self.brotli,
            Algorithm::Lzmh => &self.lzmh,
        };
        binary.as_deref()
    }
}

/// LZMH configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LzmhConfig {
    /// Use the encoder's self-reported time instead of process accounting
    #[serde(default)]
    pub use_reported_time: bool,
    /// Directory for the encoder's temporary files (system temp dir if unset)
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
}

impl LzmhConfig {
    /// Timing source implied by this configuration.
    pub fn timing_source(&self) -> TimingSource {
        if self.use_reported_time {
            TimingSource::Reported
        } else {
            TimingSource::ProcessAccounting
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Path of the JSON report document
    #[serde(default = "default_output_path")]
    pub path: String,
    /// Terminal output format: "human", "json", "csv"
    #[serde(default = "default_format")]
    pub format: String,
    /// Add a metadata block (timestamp, host, git commit) to the report
    #[serde(default)]
    pub metadata: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            format: default_format(),
            metadata: false,
        }
    }
}

fn default_output_path() -> String {
    "results/results.json".to_string()
}
fn default_format() -> String {
    "human".to_string()
}

impl SquashConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join("squash.toml");
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => Some(config),
                    Err(e) => {
                        tracing::warn!(path = %config_path.display(), error = %e, "ignoring unreadable config");
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# Squashbench Configuration

[runner]
# Rounds per (sample, algorithm, level); compressed size must not change between rounds
rounds = 5
# Deadline for a single codec invocation
timeout = "60s"
# Warn when a higher level is this much larger than the lowest level (0.01 = 1%)
monotonicity_tolerance = 0.01
# Subset of algorithms, run in fixed order (uncomment to enable)
# algorithms = ["zlib", "zstd"]

[corpus]
directory = "data/new"
categories = ["battery", "detectedImages", "image", "humidity", "position", "temperature", "tempSensor"]
# Exact number of <category><i>.bin files per category (uncomment to enable)
# instances = 10
extension = "bin"

[tools]
# Binary overrides (uncomment to enable)
# zstd = "/opt/zstd/bin/zstd"
# lzmh = "./data-compressor/DataCompressor/build/gcc/DCCLI"

[lzmh]
# Use the encoder's own timing report instead of process accounting
use_reported_time = false
# Directory for temporary input/output files (defaults to the system temp dir)
# scratch_dir = "/tmp/squashbench"

[output]
# JSON report document
path = "results/results.json"
# Terminal output: human, json, csv
format = "human"
# Include timestamp, host and git metadata in the report
metadata = false
"#
        .to_string()
    }

    /// Parse duration string (e.g., "3s", "500ms", "2m")
    pub fn parse_duration(s: &str) -> anyhow::Result<Duration> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow::anyhow!("Empty duration string"));
        }

        // Find where the number ends and unit begins
        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid duration number: {}", num_part))?;
        if !value.is_finite() || value < 0.0 {
            return Err(anyhow::anyhow!("Invalid duration: {}", s));
        }

        let multiplier: f64 = match unit_part.to_lowercase().as_str() {
            "ms" => 1e-3,
            "s" | "" => 1.0,
            "m" | "min" => 60.0,
            "h" => 3600.0,
            _ => return Err(anyhow::anyhow!("Unknown duration unit: {}", unit_part)),
        };

        Ok(Duration::from_millis((value * multiplier * 1000.0).round() as u64))
    }
}

//! Sample Corpus
//!
//! Named byte payloads grouped by category. A category holds one or more
//! instances (independent captures of the same kind of data) whose results are
//! averaged in the report.
//!
//! On disk a category is either a set of numbered files
//! (`temperature0.bin`, `temperature1.bin`, ...) or a single `temperature.bin`.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure loading the corpus
#[derive(Debug, Error)]
pub enum CorpusError {
    /// Neither numbered nor single-file samples exist for a category
    #[error("no samples for category '{category}' in {}", .directory.display())]
    MissingCategory {
        /// Category name
        category: String,
        /// Directory that was searched
        directory: PathBuf,
    },

    /// A configured instance count could not be satisfied
    #[error("missing sample instance {}", .path.display())]
    MissingInstance {
        /// Expected file
        path: PathBuf,
    },

    /// A sample file exists but could not be read
    #[error("failed to read sample {}: {source}", .path.display())]
    Read {
        /// Sample file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// One benchmark input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// Identifier used in logs and errors (e.g. `temperature3`)
    pub name: String,
    /// Raw bytes; never modified by a run
    pub payload: Vec<u8>,
}

impl Sample {
    /// Create a sample.
    pub fn new(name: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    /// Uncompressed size in bytes.
    pub fn raw_size(&self) -> usize {
        self.payload.len()
    }
}

/// Instances of one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleCategory {
    /// Category name, the report key
    pub name: String,
    /// At least one instance
    pub samples: Vec<Sample>,
}

impl SampleCategory {
    /// Raw sizes of every instance.
    pub fn raw_sizes(&self) -> Vec<usize> {
        self.samples.iter().map(Sample::raw_size).collect()
    }
}

/// The loaded corpus, categories in report order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    categories: Vec<SampleCategory>,
}

impl Corpus {
    /// Corpus from already loaded categories.
    pub fn new(categories: Vec<SampleCategory>) -> Self {
        Self { categories }
    }

    /// Corpus with one single-instance category per `(name, payload)` pair.
    pub fn from_payloads<I, S>(payloads: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<u8>)>,
        S: Into<String>,
    {
        let categories = payloads
            .into_iter()
            .map(|(name, payload)| {
                let name = name.into();
                SampleCategory {
                    samples: vec![Sample::new(name.clone(), payload)],
                    name,
                }
            })
            .collect();
        Self { categories }
    }

    /// Load `names` from `source`, in order.
    pub fn load<S: SampleSource + ?Sized>(
        source: &S,
        names: &[String],
    ) -> Result<Self, CorpusError> {
        let categories = names
            .iter()
            .map(|name| {
                let samples = source.load_category(name)?;
                tracing::debug!(category = %name, instances = samples.len(), "loaded category");
                Ok(SampleCategory {
                    name: name.clone(),
                    samples,
                })
            })
            .collect::<Result<Vec<_>, CorpusError>>()?;
        Ok(Self { categories })
    }

    /// Categories in report order.
    pub fn categories(&self) -> &[SampleCategory] {
        &self.categories
    }

    /// Total number of samples across categories.
    pub fn sample_count(&self) -> usize {
        self.categories.iter().map(|c| c.samples.len()).sum()
    }
}

/// Provider of category instances
pub trait SampleSource {
    /// Load every instance of `category`; returns at least one sample.
    fn load_category(&self, category: &str) -> Result<Vec<Sample>, CorpusError>;
}

/// Loads samples from a directory of `<category><i>.<ext>` or `<category>.<ext>` files
#[derive(Debug, Clone)]
pub struct DirectorySource {
    directory: PathBuf,
    extension: String,
    instances: Option<usize>,
}

impl DirectorySource {
    /// Source reading `*.{extension}` files from `directory`.
    pub fn new(directory: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            extension: extension.into(),
            instances: None,
        }
    }

    /// Require exactly `count` numbered instances per category.
    pub fn with_instances(mut self, count: Option<usize>) -> Self {
        self.instances = count;
        self
    }

    /// Sample directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn numbered_path(&self, category: &str, index: usize) -> PathBuf {
        self.directory
            .join(format!("{}{}.{}", category, index, self.extension))
    }

    fn single_path(&self, category: &str) -> PathBuf {
        self.directory
            .join(format!("{}.{}", category, self.extension))
    }
}

fn read_sample(path: &Path, name: String) -> Result<Sample, CorpusError> {
    let payload = std::fs::read(path).map_err(|source| CorpusError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Sample::new(name, payload))
}

impl SampleSource for DirectorySource {
    fn load_category(&self, category: &str) -> Result<Vec<Sample>, CorpusError> {
        if let Some(count) = self.instances.filter(|&n| n > 0) {
            return (0..count)
                .map(|i| {
                    let path = self.numbered_path(category, i);
                    if !path.is_file() {
                        return Err(CorpusError::MissingInstance { path });
                    }
                    read_sample(&path, format!("{}{}", category, i))
                })
                .collect();
        }

        let mut samples = Vec::new();
        loop {
            let path = self.numbered_path(category, samples.len());
            if !path.is_file() {
                break;
            }
            let name = format!("{}{}", category, samples.len());
            samples.push(read_sample(&path, name)?);
        }
        if !samples.is_empty() {
            return Ok(samples);
        }

        let single = self.single_path(category);
        if single.is_file() {
            return Ok(vec![read_sample(&single, category.to_string())?]);
        }

        Err(CorpusError::MissingCategory {
            category: category.to_string(),
            directory: self.directory.clone(),
        })
    }
}

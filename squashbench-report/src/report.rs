//! Report Data Structures
//!
//! The in-memory [`StatisticsTable`] accumulates per-category results during a
//! sweep; [`Report`] is the document written once at the end.
//!
//! Serialized shape:
//!
//! ```text
//! {
//!   "times": { <category>: { <algorithm>: { <level>: seconds } } },
//!   "sizes": { <category>: { "raw": bytes, <algorithm>: { <level>: bytes } } },
//!   "meta":  { ... }            // only when metadata is enabled
//! }
//! ```
//!
//! Categories and algorithms keep insertion order (the run order), levels are
//! ascending.

use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use squashbench_codec::Level;
use std::collections::BTreeMap;

/// Averaged result of one algorithm at one level on one category
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LevelStatistics {
    /// Mean compressed size in bytes
    pub size: f64,
    /// Mean CPU time of compression in seconds
    pub cpu_time: f64,
}

/// Results of one algorithm on one category
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlgorithmStatistics {
    /// Algorithm key
    pub name: String,
    /// Per-level results, ascending
    pub levels: BTreeMap<Level, LevelStatistics>,
}

/// Results for one sample category
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryStatistics {
    /// Category name
    pub name: String,
    /// Mean uncompressed size across instances
    pub raw_size: f64,
    /// Number of instances averaged
    pub instances: usize,
    /// Algorithms in run order
    pub algorithms: Vec<AlgorithmStatistics>,
}

impl CategoryStatistics {
    /// Look up an algorithm by name.
    pub fn algorithm(&self, name: &str) -> Option<&AlgorithmStatistics> {
        self.algorithms.iter().find(|a| a.name == name)
    }
}

/// Statistics Table: category → algorithm → level → statistics, plus raw size.
///
/// Written only by the orchestrator during a sweep.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatisticsTable {
    categories: Vec<CategoryStatistics>,
}

impl StatisticsTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the raw size of a category (creating it if needed).
    pub fn set_raw(&mut self, category: &str, raw_size: f64, instances: usize) {
        let entry = self.category_mut(category);
        entry.raw_size = raw_size;
        entry.instances = instances;
    }

    /// Store the averaged levels of `algorithm` on `category`, replacing any
    /// previous entry for that pair.
    pub fn insert_levels(
        &mut self,
        category: &str,
        algorithm: &str,
        levels: BTreeMap<Level, LevelStatistics>,
    ) {
        let entry = self.category_mut(category);
        match entry.algorithms.iter_mut().find(|a| a.name == algorithm) {
            Some(existing) => existing.levels = levels,
            None => entry.algorithms.push(AlgorithmStatistics {
                name: algorithm.to_string(),
                levels,
            }),
        }
    }

    /// Look up one cell.
    pub fn get(&self, category: &str, algorithm: &str, level: Level) -> Option<&LevelStatistics> {
        self.category(category)?
            .algorithm(algorithm)?
            .levels
            .get(&level)
    }

    /// Look up a category.
    pub fn category(&self, name: &str) -> Option<&CategoryStatistics> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Categories in insertion order.
    pub fn categories(&self) -> &[CategoryStatistics] {
        &self.categories
    }

    /// Whether no category has been recorded.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Iterate every (category, algorithm, level, statistics) cell.
    pub fn cells(&self) -> impl Iterator<Item = (&CategoryStatistics, &str, Level, &LevelStatistics)> {
        self.categories.iter().flat_map(|category| {
            category.algorithms.iter().flat_map(move |algorithm| {
                algorithm
                    .levels
                    .iter()
                    .map(move |(&level, stats)| (category, algorithm.name.as_str(), level, stats))
            })
        })
    }

    fn category_mut(&mut self, name: &str) -> &mut CategoryStatistics {
        let index = match self.categories.iter().position(|c| c.name == name) {
            Some(index) => index,
            None => {
                self.categories.push(CategoryStatistics {
                    name: name.to_string(),
                    ..Default::default()
                });
                self.categories.len() - 1
            }
        };
        &mut self.categories[index]
    }
}

/// Complete benchmark report
#[derive(Debug, Clone)]
pub struct Report {
    /// Measured sizes and times
    pub table: StatisticsTable,
    /// Run metadata, serialized only when present
    pub meta: Option<ReportMeta>,
}

impl Report {
    /// Assemble a report from a finished table.
    pub fn new(table: StatisticsTable, meta: Option<ReportMeta>) -> Self {
        Self { table, meta }
    }
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Squashbench version
    pub version: String,
    /// When the report was built
    pub timestamp: DateTime<Utc>,
    /// Rounds per unit
    pub rounds: usize,
    /// Per-invocation deadline in milliseconds
    pub timeout_ms: u64,
    /// Program run for each algorithm
    #[serde(default)]
    pub tools: BTreeMap<String, String>,
    /// Git commit of the working directory, if any
    pub git_commit: Option<String>,
    /// Host the run executed on
    pub system: SystemInfo,
}

/// System information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Operating system
    pub os: String,
    /// CPU architecture
    pub arch: String,
    /// CPU model name
    pub cpu: String,
    /// Logical CPU count
    pub cpu_cores: u32,
    /// Total memory in GiB
    pub memory_gb: f64,
}

#[derive(Clone, Copy)]
enum Metric {
    Size,
    CpuTime,
}

impl Metric {
    fn value(self, stats: &LevelStatistics) -> f64 {
        match self {
            Metric::Size => stats.size,
            Metric::CpuTime => stats.cpu_time,
        }
    }
}

struct TableView<'a> {
    table: &'a StatisticsTable,
    metric: Metric,
}

struct CategoryView<'a> {
    category: &'a CategoryStatistics,
    metric: Metric,
}

struct LevelView<'a> {
    levels: &'a BTreeMap<Level, LevelStatistics>,
    metric: Metric,
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.meta.is_some() { 3 } else { 2 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry(
            "times",
            &TableView {
                table: &self.table,
                metric: Metric::CpuTime,
            },
        )?;
        map.serialize_entry(
            "sizes",
            &TableView {
                table: &self.table,
                metric: Metric::Size,
            },
        )?;
        if let Some(meta) = &self.meta {
            map.serialize_entry("meta", meta)?;
        }
        map.end()
    }
}

impl Serialize for TableView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.table.categories.iter().map(|category| {
            (
                category.name.as_str(),
                CategoryView {
                    category,
                    metric: self.metric,
                },
            )
        }))
    }
}

impl Serialize for CategoryView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        // Raw size only makes sense in the size table
        if matches!(self.metric, Metric::Size) {
            map.serialize_entry("raw", &self.category.raw_size)?;
        }
        for algorithm in &self.category.algorithms {
            map.serialize_entry(
                &algorithm.name,
                &LevelView {
                    levels: &algorithm.levels,
                    metric: self.metric,
                },
            )?;
        }
        map.end()
    }
}

impl Serialize for LevelView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.levels
                .iter()
                .map(|(level, stats)| (level, self.metric.value(stats))),
        )
    }
}

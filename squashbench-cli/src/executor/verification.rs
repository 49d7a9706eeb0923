//! Monotonicity Checks
//!
//! Higher levels are expected to compress at least as well as the lowest
//! level. A violation beyond the tolerance is reported as a warning; it never
//! fails the run.

use squashbench_codec::Level;
use squashbench_report::StatisticsTable;

/// A level that compressed noticeably worse than the lowest level
#[derive(Debug, Clone, PartialEq)]
pub struct MonotonicityWarning {
    /// Sample category
    pub category: String,
    /// Algorithm key
    pub algorithm: String,
    /// Level that regressed
    pub level: Level,
    /// Mean compressed size at `level`
    pub size: f64,
    /// Lowest level of the algorithm
    pub baseline_level: Level,
    /// Mean compressed size at the baseline level
    pub baseline_size: f64,
}

impl MonotonicityWarning {
    /// Size increase over the baseline, in percent.
    pub fn excess_percent(&self) -> f64 {
        if self.baseline_size == 0.0 {
            0.0
        } else {
            (self.size / self.baseline_size - 1.0) * 100.0
        }
    }
}

impl std::fmt::Display for MonotonicityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}: level {} is {:.1}% larger than level {} ({:.0} vs {:.0} bytes)",
            self.category,
            self.algorithm,
            self.level,
            self.excess_percent(),
            self.baseline_level,
            self.size,
            self.baseline_size
        )
    }
}

/// Find levels whose mean size exceeds the lowest level's by more than
/// `tolerance` (relative, 0.01 = 1%). Each warning is also logged.
pub fn check_monotonicity(table: &StatisticsTable, tolerance: f64) -> Vec<MonotonicityWarning> {
    let mut warnings = Vec::new();

    for category in table.categories() {
        for algorithm in &category.algorithms {
            let mut levels = algorithm.levels.iter();
            let Some((&baseline_level, baseline)) = levels.next() else {
                continue;
            };
            let limit = baseline.size * (1.0 + tolerance);

            for (&level, stats) in levels {
                if stats.size > limit {
                    let warning = MonotonicityWarning {
                        category: category.name.clone(),
                        algorithm: algorithm.name.clone(),
                        level,
                        size: stats.size,
                        baseline_level,
                        baseline_size: baseline.size,
                    };
                    tracing::warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use squashbench_report::LevelStatistics;
    use std::collections::BTreeMap;

    fn sizes(entries: &[(Level, f64)]) -> BTreeMap<Level, LevelStatistics> {
        entries
            .iter()
            .map(|&(level, size)| {
                (
                    level,
                    LevelStatistics {
                        size,
                        cpu_time: 0.0,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_shrinking_sizes_pass() {
        let mut table = StatisticsTable::new();
        table.insert_levels("image", "zstd", sizes(&[(1, 100.0), (2, 90.0), (3, 80.0)]));
        assert!(check_monotonicity(&table, 0.01).is_empty());
    }

    #[test]
    fn test_small_growth_is_tolerated() {
        let mut table = StatisticsTable::new();
        table.insert_levels("image", "lzo", sizes(&[(1, 1000.0), (9, 1005.0)]));
        assert!(check_monotonicity(&table, 0.01).is_empty());
    }

    #[test]
    fn test_growth_beyond_tolerance_warns() {
        let mut table = StatisticsTable::new();
        table.insert_levels("position", "brotli", sizes(&[(0, 100.0), (1, 90.0), (2, 120.0)]));

        let warnings = check_monotonicity(&table, 0.01);

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, 2);
        assert_eq!(warnings[0].baseline_level, 0);
        assert!((warnings[0].excess_percent() - 20.0).abs() < 1e-9);
        assert!(warnings[0].to_string().contains("position/brotli"));
    }

    #[test]
    fn test_single_level_has_no_baseline_to_violate() {
        let mut table = StatisticsTable::new();
        table.insert_levels("battery", "lzmh", sizes(&[(0, 42.0)]));
        assert!(check_monotonicity(&table, 0.0).is_empty());
    }
}

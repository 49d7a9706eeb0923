//! Statistics Aggregation
//!
//! Folds the per-instance unit results of one (category, algorithm) pair into
//! table entries: mean compressed size and mean CPU time per level.

use squashbench_codec::Level;
use squashbench_report::LevelStatistics;
use squashbench_stats::{UnitResult, average_instances};
use std::collections::BTreeMap;

/// Average per-instance results into per-level table entries.
pub fn aggregate_instances(
    instances: &[BTreeMap<Level, UnitResult>],
) -> BTreeMap<Level, LevelStatistics> {
    average_instances(instances)
        .into_iter()
        .map(|(level, averaged)| {
            (
                level,
                LevelStatistics {
                    size: averaged.size,
                    cpu_time: averaged.cpu_time,
                },
            )
        })
        .collect()
}

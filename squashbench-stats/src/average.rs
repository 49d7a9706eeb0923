//! Multi-instance Averaging
//!
//! A sample category may have several captures. Each capture is benchmarked as
//! its own unit; the category's entry is the per-level mean across captures.

use crate::reduce::UnitResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-level mean across the instances of one category.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AveragedLevel {
    /// Mean compressed size in bytes
    pub size: f64,
    /// Mean of the instances' mean CPU time in seconds
    pub cpu_time: f64,
}

/// Average per-level unit results across instances.
///
/// The divisor is the number of instances, so a level missing from some
/// instance contributes zero for it.
pub fn average_instances(instances: &[BTreeMap<u32, UnitResult>]) -> BTreeMap<u32, AveragedLevel> {
    let mut sums: BTreeMap<u32, AveragedLevel> = BTreeMap::new();
    for instance in instances {
        for (&level, unit) in instance {
            let entry = sums.entry(level).or_default();
            entry.size += unit.compressed_size as f64;
            entry.cpu_time += unit.mean_cpu_time;
        }
    }

    let count = instances.len() as f64;
    for entry in sums.values_mut() {
        entry.size /= count;
        entry.cpu_time /= count;
    }
    sums
}

/// Mean uncompressed size of a category's instances; 0 when there are none.
pub fn mean_raw_size(sizes: &[usize]) -> f64 {
    if sizes.is_empty() {
        return 0.0;
    }
    sizes.iter().map(|&s| s as f64).sum::<f64>() / sizes.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(compressed_size: u64, mean_cpu_time: f64) -> UnitResult {
        UnitResult {
            compressed_size,
            mean_cpu_time,
        }
    }

    #[test]
    fn test_raw_size_mean() {
        assert!((mean_raw_size(&[1000, 2000]) - 1500.0).abs() < f64::EPSILON);
        assert_eq!(mean_raw_size(&[]), 0.0);
    }

    #[test]
    fn test_per_level_mean() {
        let a = BTreeMap::from([(1, unit(100, 0.2)), (2, unit(80, 0.4))]);
        let b = BTreeMap::from([(1, unit(300, 0.4)), (2, unit(120, 0.6))]);
        let averaged = average_instances(&[a, b]);

        assert_eq!(averaged.len(), 2);
        assert!((averaged[&1].size - 200.0).abs() < 1e-9);
        assert!((averaged[&1].cpu_time - 0.3).abs() < 1e-9);
        assert!((averaged[&2].size - 100.0).abs() < 1e-9);
        assert!((averaged[&2].cpu_time - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_single_instance_is_identity() {
        let a = BTreeMap::from([(5, unit(77, 1.25))]);
        let averaged = average_instances(std::slice::from_ref(&a));
        assert_eq!(
            averaged[&5],
            AveragedLevel {
                size: 77.0,
                cpu_time: 1.25
            }
        );
    }

    #[test]
    fn test_no_instances() {
        assert!(average_instances(&[]).is_empty());
    }
}

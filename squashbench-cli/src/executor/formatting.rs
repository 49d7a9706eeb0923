//! Output Formatting
//!
//! Human-readable output formatting for sweep reports.
//!
//! Generates terminal-friendly output with:
//! - One section per sample category with its raw size
//! - Per algorithm and level: mean compressed size, ratio and CPU time
//! - A trailing list of monotonicity warnings

use super::verification::MonotonicityWarning;
use squashbench_report::Report;

/// Format a report for human-readable terminal display
pub fn format_human_output(report: &Report, warnings: &[MonotonicityWarning]) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("Squashbench Results\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    if report.table.is_empty() {
        output.push_str("No results.\n");
        return output;
    }

    for category in report.table.categories() {
        let instances = if category.instances == 1 {
            String::new()
        } else {
            format!(", {} instances", category.instances)
        };
        output.push_str(&format!(
            "Category: {} (raw {:.0} bytes{})\n",
            category.name, category.raw_size, instances
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "  {:<10} {:>5}  {:>14}  {:>8}  {:>12}\n",
            "Algorithm", "Level", "Size (bytes)", "Ratio", "CPU (ms)"
        ));

        for algorithm in &category.algorithms {
            for (level, stats) in &algorithm.levels {
                let ratio = if stats.size > 0.0 {
                    format!("{:.3}", category.raw_size / stats.size)
                } else {
                    "-".to_string()
                };
                output.push_str(&format!(
                    "  {:<10} {:>5}  {:>14.1}  {:>8}  {:>12.3}\n",
                    algorithm.name,
                    level,
                    stats.size,
                    ratio,
                    stats.cpu_time * 1e3
                ));
            }
        }
        output.push('\n');
    }

    if !warnings.is_empty() {
        output.push_str(&format!("Monotonicity warnings ({})\n", warnings.len()));
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for warning in warnings {
            output.push_str(&format!("  ⚠ {}\n", warning));
        }
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use squashbench_report::{LevelStatistics, StatisticsTable};
    use std::collections::BTreeMap;

    fn sample_report() -> Report {
        let mut table = StatisticsTable::new();
        table.set_raw("temperature", 1000.0, 1);
        table.insert_levels(
            "temperature",
            "zstd",
            BTreeMap::from([
                (
                    1,
                    LevelStatistics {
                        size: 250.0,
                        cpu_time: 0.0015,
                    },
                ),
                (
                    19,
                    LevelStatistics {
                        size: 200.0,
                        cpu_time: 0.012,
                    },
                ),
            ]),
        );
        Report::new(table, None)
    }

    #[test]
    fn test_rows_show_ratio_and_millis() {
        let text = format_human_output(&sample_report(), &[]);

        assert!(text.contains("Category: temperature (raw 1000 bytes)"));
        assert!(text.contains("4.000"));
        assert!(text.contains("5.000"));
        assert!(text.contains("12.000"));
        assert!(!text.contains("Monotonicity"));
    }

    #[test]
    fn test_empty_table() {
        let text = format_human_output(&Report::new(StatisticsTable::new(), None), &[]);
        assert!(text.contains("No results."));
        assert!(!text.contains("Category:"));
    }

    #[test]
    fn test_warnings_are_listed() {
        let warning = MonotonicityWarning {
            category: "temperature".to_string(),
            algorithm: "zstd".to_string(),
            level: 19,
            size: 300.0,
            baseline_level: 1,
            baseline_size: 250.0,
        };
        let text = format_human_output(&sample_report(), &[warning]);

        assert!(text.contains("Monotonicity warnings (1)"));
        assert!(text.contains("temperature/zstd: level 19"));
    }
}

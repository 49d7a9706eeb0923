//! CSV Output
//!
//! One row per (category, algorithm, level) with size, ratio and CPU time.

use crate::report::StatisticsTable;

/// Generate a CSV document from the statistics table.
pub fn generate_csv_report(table: &StatisticsTable) -> String {
    let mut output =
        String::from("category,algorithm,level,raw_size,compressed_size,ratio,cpu_time_s\n");

    for (category, algorithm, level, stats) in table.cells() {
        let ratio = if stats.size > 0.0 {
            category.raw_size / stats.size
        } else {
            0.0
        };
        output.push_str(&format!(
            "{},{},{},{:.2},{:.2},{:.4},{:.6}\n",
            escape_csv(&category.name),
            escape_csv(algorithm),
            level,
            category.raw_size,
            stats.size,
            ratio,
            stats.cpu_time
        ));
    }

    output
}

fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::LevelStatistics;
    use std::collections::BTreeMap;

    #[test]
    fn test_rows_and_ratio() {
        let mut table = StatisticsTable::new();
        table.set_raw("battery", 1000.0, 1);
        table.insert_levels(
            "battery",
            "zstd",
            BTreeMap::from([(3, LevelStatistics { size: 250.0, cpu_time: 0.0125 })]),
        );

        let csv = generate_csv_report(&table);
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "battery,zstd,3,1000.00,250.00,4.0000,0.012500");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}

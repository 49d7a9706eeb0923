//! Sweep Planner
//!
//! Builds the execution plan by filtering categories and algorithms.
//!
//! Filtering options:
//! - Regex pattern matching on category name
//! - Algorithm subset selection
//!
//! Ordering: categories keep their configured order, algorithms always run in
//! the fixed [`Algorithm::ALL`] order regardless of how they were selected.

use squashbench_codec::Algorithm;

/// Execution plan for one sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    /// Sample categories, in report order
    pub categories: Vec<String>,
    /// Algorithms, in run order
    pub algorithms: Vec<Algorithm>,
}

impl ExecutionPlan {
    /// Whether the plan selects nothing to run.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() || self.algorithms.is_empty()
    }
}

/// Build execution plan from configured categories
pub fn build_plan(
    categories: &[String],
    filter: Option<&regex::Regex>,
    algorithms: Option<&[Algorithm]>,
) -> ExecutionPlan {
    let categories = categories
        .iter()
        .filter(|c| filter.is_none_or(|re| re.is_match(c)))
        .cloned()
        .collect();

    let algorithms = Algorithm::ALL
        .into_iter()
        .filter(|a| algorithms.is_none_or(|selected| selected.contains(a)))
        .collect();

    ExecutionPlan {
        categories,
        algorithms,
    }
}

/// Parse algorithm names, rejecting unknown ones.
pub fn parse_algorithms<S: AsRef<str>>(names: &[S]) -> Result<Vec<Algorithm>, String> {
    names.iter().map(|n| n.as_ref().parse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn categories() -> Vec<String> {
        ["temperature", "battery", "tempSensor", "image"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_no_filter() {
        let plan = build_plan(&categories(), None, None);

        assert_eq!(plan.categories, categories());
        assert_eq!(plan.algorithms, Algorithm::ALL.to_vec());
    }

    #[test]
    fn test_category_filter() {
        let re = Regex::new("^temp").unwrap();
        let plan = build_plan(&categories(), Some(&re), None);

        assert_eq!(plan.categories, vec!["temperature", "tempSensor"]);
    }

    #[test]
    fn test_algorithm_selection_keeps_run_order() {
        let selected = [Algorithm::Lzmh, Algorithm::Zlib, Algorithm::Brotli];
        let plan = build_plan(&categories(), None, Some(&selected));

        assert_eq!(
            plan.algorithms,
            vec![Algorithm::Zlib, Algorithm::Brotli, Algorithm::Lzmh]
        );
    }

    #[test]
    fn test_empty_plan() {
        let re = Regex::new("nothing-matches").unwrap();
        assert!(build_plan(&categories(), Some(&re), None).is_empty());
        assert!(build_plan(&categories(), None, Some(&[])).is_empty());
    }

    #[test]
    fn test_parse_algorithms() {
        assert_eq!(
            parse_algorithms(&["zstd", "lzo"]).unwrap(),
            vec![Algorithm::Zstd, Algorithm::Lzo]
        );
        assert!(parse_algorithms(&["zstd", "snappy"]).is_err());
    }
}

//! Qualitative complexity signals and maintainability concerns.
//!
//! Pure derivation over the collected metrics and coverage; no I/O. Each
//! rule is evaluated independently and appends to the output, so a
//! repository can trip several signals at once.

use super::metrics::RepoMetrics;

/// Tunable thresholds for signal detection.
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    /// Files with more lines than this are flagged as large.
    pub large_file_lines: usize,
    /// Class counts above this suggest the codebase wants modularization.
    pub class_count: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            large_file_lines: 300,
            class_count: 50,
        }
    }
}

/// Derive `(signals, concerns)` from metrics, coverage, and test presence.
pub fn analyze(
    tests_present: bool,
    coverage_percent: u32,
    metrics: &RepoMetrics,
    thresholds: Thresholds,
) -> (Vec<String>, Vec<String>) {
    let mut signals = Vec::new();
    let mut concerns = Vec::new();

    // Large files among the top-N, combined into one signal.
    let large_files: Vec<String> = metrics
        .largest_files
        .iter()
        .filter(|f| f.line_count > thresholds.large_file_lines)
        .map(|f| format!("{} ({} LOC)", file_name(&f.relative_path), f.line_count))
        .collect();
    if !large_files.is_empty() {
        signals.push(format!(
            "Large file{} (>{} LOC): {}",
            plural(large_files.len()),
            thresholds.large_file_lines,
            large_files.join(", ")
        ));
    }

    if coverage_percent < 50 {
        concerns.push(format!(
            "Low test coverage ({coverage_percent}%) - Below 50% threshold"
        ));
    } else if coverage_percent < 80 {
        concerns.push(format!(
            "Moderate test coverage ({coverage_percent}%) - Below optimal 80% threshold"
        ));
    }

    if !tests_present {
        signals.push("No test coverage detected".to_string());
        concerns.push("No test suite present - Critical for maintainability".to_string());
    } else {
        // Size threshold reapplied as a proxy for test association; named
        // heuristic, not a verified claim.
        let untested: Vec<String> = metrics
            .largest_files
            .iter()
            .filter(|f| f.line_count > thresholds.large_file_lines)
            .map(|f| file_name(&f.relative_path).to_string())
            .collect();
        if !untested.is_empty() {
            signals.push(format!(
                "Large untested file{}: {}",
                plural(untested.len()),
                untested.join(", ")
            ));
        }
    }

    if metrics.total_classes > thresholds.class_count {
        concerns.push(format!(
            "Large codebase ({} classes) - Consider modularization",
            metrics.total_classes
        ));
    }

    (signals, concerns)
}

fn plural(count: usize) -> &'static str {
    if count > 1 {
        "s"
    } else {
        ""
    }
}

fn file_name(relative_path: &str) -> &str {
    relative_path
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(relative_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::metrics::FileMetric;

    fn metrics_with_files(files: &[(&str, usize)], classes: usize) -> RepoMetrics {
        RepoMetrics {
            total_files: files.len(),
            total_classes: classes,
            total_test_classes: 0,
            approx_lines_of_code: 0,
            top_level_packages: Vec::new(),
            largest_files: files
                .iter()
                .map(|(path, lines)| FileMetric {
                    relative_path: path.to_string(),
                    line_count: *lines,
                })
                .collect(),
        }
    }

    #[test]
    fn test_large_files_combined_into_one_signal() {
        let metrics = metrics_with_files(
            &[("src/main/java/a/Big.java", 450), ("src/main/java/a/Huge.java", 900)],
            2,
        );
        let (signals, _) = analyze(true, 90, &metrics, Thresholds::default());
        assert_eq!(signals.len(), 2); // large files + large untested files
        assert_eq!(
            signals[0],
            "Large files (>300 LOC): Big.java (450 LOC), Huge.java (900 LOC)"
        );
        assert_eq!(signals[1], "Large untested files: Big.java, Huge.java");
    }

    #[test]
    fn test_singular_signal_text() {
        let metrics = metrics_with_files(&[("Big.java", 301)], 1);
        let (signals, _) = analyze(true, 90, &metrics, Thresholds::default());
        assert_eq!(signals[0], "Large file (>300 LOC): Big.java (301 LOC)");
    }

    #[test]
    fn test_coverage_concern_bands() {
        let metrics = metrics_with_files(&[], 1);
        let thresholds = Thresholds::default();

        let (_, concerns) = analyze(true, 49, &metrics, thresholds);
        assert!(concerns[0].starts_with("Low test coverage (49%)"));

        let (_, concerns) = analyze(true, 50, &metrics, thresholds);
        assert!(concerns[0].starts_with("Moderate test coverage (50%)"));

        let (_, concerns) = analyze(true, 80, &metrics, thresholds);
        assert!(concerns.is_empty());
    }

    #[test]
    fn test_no_tests_signal_and_concern() {
        let metrics = metrics_with_files(&[("Big.java", 500)], 1);
        let (signals, concerns) = analyze(false, 90, &metrics, Thresholds::default());
        assert!(signals.contains(&"No test coverage detected".to_string()));
        assert!(concerns
            .contains(&"No test suite present - Critical for maintainability".to_string()));
        // "Untested large file" is only emitted when tests exist.
        assert!(!signals.iter().any(|s| s.starts_with("Large untested")));
    }

    #[test]
    fn test_class_count_concern() {
        let metrics = metrics_with_files(&[], 51);
        let (_, concerns) = analyze(true, 90, &metrics, Thresholds::default());
        assert!(concerns
            .contains(&"Large codebase (51 classes) - Consider modularization".to_string()));

        let metrics = metrics_with_files(&[], 50);
        let (_, concerns) = analyze(true, 90, &metrics, Thresholds::default());
        assert!(concerns.is_empty());
    }

    #[test]
    fn test_quiet_repository_emits_nothing() {
        let metrics = metrics_with_files(&[("Small.java", 40)], 5);
        let (signals, concerns) = analyze(true, 95, &metrics, Thresholds::default());
        assert!(signals.is_empty());
        assert!(concerns.is_empty());
    }

    #[test]
    fn test_custom_thresholds() {
        let metrics = metrics_with_files(&[("App.java", 120)], 11);
        let thresholds = Thresholds {
            large_file_lines: 100,
            class_count: 10,
        };
        let (signals, concerns) = analyze(true, 90, &metrics, thresholds);
        assert_eq!(signals[0], "Large file (>100 LOC): App.java (120 LOC)");
        assert!(concerns
            .contains(&"Large codebase (11 classes) - Consider modularization".to_string()));
    }
}

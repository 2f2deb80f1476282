//! Test-coverage estimation.
//!
//! Two modes: a crude class-ratio heuristic, and an exact parse of a
//! JaCoCo-style CSV report when one is available. The exact parser returns
//! `None` for "unavailable", which is distinct from zero coverage; callers
//! fall back to the heuristic in that case.

use std::fs;
use std::path::Path;

/// Conventional location of the JaCoCo CSV report.
pub const JACOCO_REPORT_PATH: &str = "target/site/jacoco/jacoco.csv";

/// Severity banding for a coverage percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageBand {
    Green,
    Yellow,
    Red,
}

impl CoverageBand {
    /// Band for a percentage: `>=80` green, `[50,80)` yellow, `<50` red.
    pub fn of(percent: u32) -> Self {
        if percent >= 80 {
            CoverageBand::Green
        } else if percent >= 50 {
            CoverageBand::Yellow
        } else {
            CoverageBand::Red
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CoverageBand::Green => "success",
            CoverageBand::Yellow => "warning",
            CoverageBand::Red => "danger",
        }
    }
}

/// Heuristic coverage from class counts: `min(100, tests * 100 / classes)`,
/// zero when there are no classes. Deliberately crude; it may both under-
/// and over-estimate.
pub fn approximate(total_classes: usize, total_test_classes: usize) -> u32 {
    if total_classes == 0 {
        return 0;
    }
    let estimate = (total_test_classes * 100 / total_classes) as u32;
    estimate.min(100)
}

/// Parse the JaCoCo CSV report and aggregate instruction coverage.
///
/// Row format places instructions-missed and instructions-covered at
/// columns 4 and 5. Malformed rows are skipped individually. Returns `None`
/// when the report is missing or contains no usable instruction counts.
pub fn parse_jacoco_report(repo_root: &Path) -> Option<u32> {
    let content = fs::read_to_string(repo_root.join(JACOCO_REPORT_PATH)).ok()?;

    let mut missed: u64 = 0;
    let mut covered: u64 = 0;

    for line in content.lines().skip(1) {
        let line = line.trim();
        if line.is_empty() || line.starts_with("GROUP") {
            continue;
        }
        let parts: Vec<&str> = line.split(',').collect();
        if parts.len() < 6 {
            continue;
        }
        let (Ok(m), Ok(c)) = (parts[4].trim().parse::<u64>(), parts[5].trim().parse::<u64>())
        else {
            continue;
        };
        missed += m;
        covered += c;
    }

    let total = missed + covered;
    if total == 0 {
        return None;
    }
    let percent = (covered * 100 / total) as u32;
    Some(percent.min(100))
}

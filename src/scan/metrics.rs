//! Aggregate source metrics: file counts, approximate LOC, largest files.

use serde::Serialize;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Bound on the "largest files" list.
pub const MAX_LARGEST_FILES: usize = 5;

const SOURCE_EXTENSIONS: &[&str] = &["java", "kt", "scala", "groovy"];

/// Line count for a single source file, kept only for the top-N list.
#[derive(Debug, Clone, Serialize)]
pub struct FileMetric {
    pub relative_path: String,
    pub line_count: usize,
}

/// Aggregated repository metrics. Metadata only, no source text.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RepoMetrics {
    pub total_files: usize,
    pub total_classes: usize,
    pub total_test_classes: usize,
    pub approx_lines_of_code: u64,
    pub top_level_packages: Vec<String>,
    pub largest_files: Vec<FileMetric>,
}

/// Walk the repository and collect source metrics.
///
/// Best-effort: unreadable files count zero lines and a failed walk yields
/// whatever was accumulated up to that point.
pub fn collect(repo_root: &Path) -> RepoMetrics {
    let mut metrics = RepoMetrics::default();
    let mut file_metrics: Vec<FileMetric> = Vec::new();
    let mut packages: std::collections::BTreeSet<String> = std::collections::BTreeSet::new();

    for entry in WalkDir::new(repo_root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() || !is_source_file(entry.path()) {
            continue;
        }
        let rel = relative_path(repo_root, entry.path());
        // Build outputs are excluded by name substring, matching the
        // tolerant path-based convention used across the detectors.
        if rel.contains("target") || rel.contains("build") {
            continue;
        }

        metrics.total_files += 1;
        if is_test_file(&rel, entry.path()) {
            metrics.total_test_classes += 1;
        } else {
            metrics.total_classes += 1;
        }

        let lines = count_lines(entry.path());
        metrics.approx_lines_of_code += lines as u64;
        file_metrics.push(FileMetric {
            relative_path: rel.clone(),
            line_count: lines,
        });

        if let Some(pkg) = top_level_package(&rel) {
            packages.insert(pkg);
        }
    }

    // Stable sort keeps enumeration order for ties, so results are
    // deterministic across runs on identical input.
    file_metrics.sort_by(|a, b| b.line_count.cmp(&a.line_count));
    file_metrics.truncate(MAX_LARGEST_FILES);
    metrics.largest_files = file_metrics;
    metrics.top_level_packages = packages.into_iter().collect();

    metrics
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SOURCE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// A file counts as a test class if it lives under the conventional test
/// source tree or its name contains "Test". Production files whose name
/// happens to contain "Test" are misclassified by design of the heuristic.
fn is_test_file(rel_path: &str, path: &Path) -> bool {
    if rel_path.contains("src/test/") || rel_path.contains("src\\test\\") {
        return true;
    }
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.contains("Test"))
        .unwrap_or(false)
}

fn count_lines(path: &Path) -> usize {
    fs::read_to_string(path)
        .map(|content| content.lines().count())
        .unwrap_or(0)
}

fn relative_path(repo_root: &Path, path: &Path) -> String {
    path.strip_prefix(repo_root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

/// Derive the top-level package from the path segment immediately following
/// the conventional `src/main/java/` (or `src/main/kotlin/`) boundary.
/// Files outside such a boundary contribute no package.
fn top_level_package(rel_path: &str) -> Option<String> {
    for boundary in ["src/main/java/", "src/main/kotlin/"] {
        if let Some(idx) = rel_path.find(boundary) {
            let remainder = &rel_path[idx + boundary.len()..];
            if let Some(sep) = remainder.find('/') {
                return Some(remainder[..sep].to_string());
            }
        }
    }
    None
}

//! Rule-driven detection of external-system integrations.
//!
//! Two evidence sources, applied in a fixed order: declared build-manifest
//! artifacts first, then case-insensitive text heuristics over interesting
//! files. Detections are deduplicated by `(name, category)` with first match
//! wins, so manifest evidence is preferred when a rule matches both ways --
//! the dependency list in the manifest is considered authoritative.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::types::DetectedDependency;
use crate::rules::{DependencyCategory, DependencyRule, RULES_ASSET_NAME};

/// Tolerant artifact-id scan; deliberately not an XML parse so malformed or
/// partially-templated manifests still yield partial results.
static ARTIFACT_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("<artifactId>(.*?)</artifactId>").expect("static regex"));

/// File kinds worth grepping for integration heuristics.
const INTERESTING_EXTENSIONS: &[&str] = &["java", "kt", "xml", "yml", "yaml", "properties", "json"];

/// A rule with its heuristics pre-compiled. Invalid patterns are dropped
/// individually; the rest of the rule stays usable.
struct CompiledRule<'a> {
    rule: &'a DependencyRule,
    patterns: Vec<Regex>,
}

/// Apply the rule set against a repository tree.
///
/// Best-effort throughout: unreadable files and invalid heuristics are
/// skipped, and an empty rule set yields an empty result.
pub fn scan(repo_root: &Path, rules: &[DependencyRule]) -> Vec<DetectedDependency> {
    let artifacts = extract_manifest_artifacts(repo_root);
    let mut seen: HashSet<(String, DependencyCategory)> = HashSet::new();
    let mut results: Vec<DetectedDependency> = Vec::new();

    // 1. Library-based detection against the declared artifact set.
    for rule in rules {
        for artifact in &rule.maven_artifacts {
            if artifacts.contains(artifact.as_str()) {
                push_detection(
                    &mut results,
                    &mut seen,
                    rule,
                    format!("Library: {artifact}"),
                );
            }
        }
    }

    // 2. Heuristic-based detection over file content.
    let compiled: Vec<CompiledRule<'_>> = rules
        .iter()
        .map(|rule| CompiledRule {
            rule,
            patterns: rule
                .heuristics
                .iter()
                .filter_map(|p| {
                    RegexBuilder::new(p)
                        .case_insensitive(true)
                        .build()
                        .ok()
                })
                .collect(),
        })
        .collect();

    for file in interesting_files(repo_root) {
        let Ok(content) = fs::read_to_string(&file) else {
            continue;
        };
        let rel = relative_path(repo_root, &file);
        for c in &compiled {
            let key = (c.rule.name.clone(), c.rule.category);
            if seen.contains(&key) {
                continue;
            }
            for re in &c.patterns {
                if let Some(m) = re.find(&content) {
                    push_detection(
                        &mut results,
                        &mut seen,
                        c.rule,
                        format!("Found in {}: {}", rel, m.as_str().trim()),
                    );
                    break;
                }
            }
        }
    }

    results
}

fn push_detection(
    results: &mut Vec<DetectedDependency>,
    seen: &mut HashSet<(String, DependencyCategory)>,
    rule: &DependencyRule,
    evidence: String,
) {
    if let Some(dep) = DetectedDependency::new(&rule.name, rule.category, evidence) {
        if seen.insert(dep.key()) {
            results.push(dep);
        }
    }
}

/// Extract every declared `<artifactId>` from the root build manifest.
fn extract_manifest_artifacts(repo_root: &Path) -> HashSet<String> {
    let mut artifacts = HashSet::new();
    let pom = repo_root.join("pom.xml");
    if let Ok(content) = fs::read_to_string(&pom) {
        for cap in ARTIFACT_ID_RE.captures_iter(&content) {
            artifacts.insert(cap[1].trim().to_string());
        }
    }
    artifacts
}

/// Walk all regular files with an interesting extension, skipping the rule
/// asset itself to avoid self-matching.
fn interesting_files(repo_root: &Path) -> Vec<PathBuf> {
    WalkDir::new(repo_root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_string_lossy();
            if name == RULES_ASSET_NAME {
                return false;
            }
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| {
                    let ext = ext.to_ascii_lowercase();
                    INTERESTING_EXTENSIONS.contains(&ext.as_str())
                })
                .unwrap_or(false)
        })
        .map(|e| e.into_path())
        .collect()
}

fn relative_path(repo_root: &Path, path: &Path) -> String {
    path.strip_prefix(repo_root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

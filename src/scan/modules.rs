//! Module and package decomposition.
//!
//! Parses the `<modules>` block from the root build manifest with a
//! tolerant, non-schema-validating pattern; projects without one collapse
//! into a single synthetic module named after the repository root.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use super::types::ProjectModule;

static MODULES_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"<modules>\s*(.*?)\s*</modules>")
        .dot_matches_new_line(true)
        .case_insensitive(true)
        .build()
        .expect("static regex")
});

static MODULE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<module>\s*([^<]+)\s*</module>").expect("static regex"));

/// Custom source-directory override in a build manifest. Shared with the
/// language detector.
pub(crate) static SOURCE_DIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<sourceDirectory>\s*([^<]+)\s*</sourceDirectory>").expect("static regex")
});

const CONVENTIONAL_SOURCE_DIRS: &[&str] = &["src/main/java", "src/main/kotlin"];

/// Discover the project's module decomposition.
pub fn analyze(repo_root: &Path) -> Vec<ProjectModule> {
    let declared = extract_declared_modules(repo_root);

    if !declared.is_empty() {
        return declared
            .into_iter()
            .map(|name| {
                let mut module = ProjectModule::new(name.clone(), name.clone());
                module.top_level_packages = extract_top_level_packages(&repo_root.join(&name));
                module
            })
            .collect();
    }

    // Single-module project: the root is the module.
    let name = repo_root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| ".".to_string());
    let mut module = ProjectModule::new(name, ".");
    module.top_level_packages = extract_top_level_packages(repo_root);
    vec![module]
}

/// Order-preserving list of `<module>` entries from the root manifest.
fn extract_declared_modules(repo_root: &Path) -> Vec<String> {
    let Ok(content) = fs::read_to_string(repo_root.join("pom.xml")) else {
        return Vec::new();
    };
    let Some(block) = MODULES_BLOCK_RE.captures(&content) else {
        return Vec::new();
    };
    MODULE_RE
        .captures_iter(&block[1])
        .map(|cap| cap[1].trim().to_string())
        .collect()
}

/// Top-level package names for a module, merged from the conventional
/// source directories, the aggregator fallback (immediate child modules'
/// own source directories), and any custom `<sourceDirectory>` override.
/// A module with no source directory at all yields an empty list.
fn extract_top_level_packages(module_path: &Path) -> Vec<String> {
    let mut packages: BTreeSet<String> = BTreeSet::new();

    for source_dir in CONVENTIONAL_SOURCE_DIRS {
        collect_subdir_names(&module_path.join(source_dir), &mut packages);
    }

    // Aggregator modules carry no direct sources; union the packages of
    // their immediate children instead.
    if packages.is_empty() {
        if let Ok(entries) = fs::read_dir(module_path) {
            for entry in entries.filter_map(|e| e.ok()) {
                let name = entry.file_name().to_string_lossy().into_owned();
                if name.starts_with('.') || !entry.path().is_dir() {
                    continue;
                }
                for source_dir in CONVENTIONAL_SOURCE_DIRS {
                    collect_subdir_names(&entry.path().join(source_dir), &mut packages);
                }
            }
        }
    }

    if let Ok(pom) = fs::read_to_string(module_path.join("pom.xml")) {
        if let Some(cap) = SOURCE_DIR_RE.captures(&pom) {
            collect_subdir_names(&module_path.join(cap[1].trim()), &mut packages);
        }
    }

    packages.into_iter().collect()
}

fn collect_subdir_names(dir: &Path, out: &mut BTreeSet<String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.filter_map(|e| e.ok()) {
        if entry.path().is_dir() {
            out.insert(entry.file_name().to_string_lossy().into_owned());
        }
    }
}

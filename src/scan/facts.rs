//! Independent detectors for build tool, language, packaging, tests, CI,
//! framework usage, and database usage.
//!
//! Every detector is best-effort: missing files mean "feature absent" and
//! I/O failures degrade to the default value for that one fact.

use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

use super::modules::SOURCE_DIR_RE;
use super::types::{BuildTool, Language, Packaging};
use once_cell::sync::Lazy;
use regex::Regex;

/// Markers indicating application-framework usage in build files.
const FRAMEWORK_IDENTIFIERS: &[&str] = &["spring-boot", "spring-context", "org.springframework"];

/// Markers indicating persistence/ORM/data-access usage in build files.
const DATABASE_IDENTIFIERS: &[&str] = &["jdbc", "hibernate", "jpa", "spring-data"];

/// Cap on entries visited by the whole-tree language fallback, so huge
/// repositories stay cheap to classify.
const LANGUAGE_SCAN_CAP: usize = 1000;

static PACKAGING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<packaging>\s*([^<]+)\s*</packaging>").expect("static regex"));

/// Maven wins over Gradle when both manifests exist at the root.
pub fn detect_build_tool(repo_root: &Path) -> Option<BuildTool> {
    if repo_root.join("pom.xml").exists() {
        Some(BuildTool::Maven)
    } else if repo_root.join("build.gradle").exists()
        || repo_root.join("build.gradle.kts").exists()
    {
        Some(BuildTool::Gradle)
    } else {
        None
    }
}

/// Tests are present only if the conventional test tree exists and holds at
/// least one source file; an empty directory does not count.
pub fn detect_tests(repo_root: &Path) -> bool {
    let test_dir = repo_root.join("src/test");
    if !test_dir.is_dir() {
        return false;
    }
    WalkDir::new(&test_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .any(|e| e.file_type().is_file() && has_extension(e.path(), &["java", "kt"]))
}

pub fn detect_ci(repo_root: &Path) -> bool {
    repo_root.join(".github/workflows").exists() || repo_root.join(".gitlab-ci.yml").exists()
}

/// Multi-stage language detection; each stage returns immediately on a
/// positive result, so earlier stages are never overridden.
pub fn detect_language(repo_root: &Path, build_tool: Option<BuildTool>) -> Language {
    // Conventional source locations first.
    if repo_root.join("src/main/java").exists() {
        return Language::Java;
    }
    if repo_root.join("src/main/kotlin").exists() {
        return Language::Kotlin;
    }

    // Maven projects may relocate sources via <sourceDirectory>.
    if build_tool == Some(BuildTool::Maven) {
        if let Ok(pom) = fs::read_to_string(repo_root.join("pom.xml")) {
            if let Some(cap) = SOURCE_DIR_RE.captures(&pom) {
                let custom = repo_root.join(cap[1].trim());
                if custom.exists() {
                    if dir_has_extension(&custom, "java") {
                        return Language::Java;
                    }
                    if dir_has_extension(&custom, "kt") {
                        return Language::Kotlin;
                    }
                }
            }
            // A manifest that talks about Java is treated as Java even when
            // no source files were found.
            if pom.contains("java") {
                return Language::Java;
            }
        }
    }

    // Bounded whole-tree fallback, Java taking precedence.
    let mut saw_kotlin = false;
    for entry in WalkDir::new(repo_root)
        .into_iter()
        .filter_map(|e| e.ok())
        .take(LANGUAGE_SCAN_CAP)
    {
        if !entry.file_type().is_file() {
            continue;
        }
        if has_extension(entry.path(), &["java"]) {
            return Language::Java;
        }
        if has_extension(entry.path(), &["kt"]) {
            saw_kotlin = true;
        }
    }
    if saw_kotlin {
        Language::Kotlin
    } else {
        Language::Unknown
    }
}

/// Concatenate the repository's build files for substring heuristics.
pub fn read_build_files(repo_root: &Path, build_tool: BuildTool) -> io::Result<String> {
    match build_tool {
        BuildTool::Maven => fs::read_to_string(repo_root.join("pom.xml")),
        BuildTool::Gradle => {
            let mut content = String::new();
            for name in ["build.gradle", "build.gradle.kts"] {
                let path = repo_root.join(name);
                if path.exists() {
                    content.push_str(&fs::read_to_string(path)?);
                }
            }
            Ok(content)
        }
    }
}

/// Packaging from the `<packaging>` element when declared, else a substring
/// fallback, else the JAR convention.
pub fn detect_packaging(build_files: &str) -> Packaging {
    if let Some(cap) = PACKAGING_RE.captures(build_files) {
        let declared = cap[1].trim();
        if declared.eq_ignore_ascii_case("war") {
            return Packaging::War;
        }
        if declared.eq_ignore_ascii_case("ear") || declared.eq_ignore_ascii_case("jar") {
            return Packaging::Jar;
        }
        // Unrecognized declarations (e.g. "pom") fall through to the
        // substring heuristic below.
    }
    if build_files.contains("war") && build_files.contains("webapp") {
        Packaging::War
    } else {
        Packaging::Jar
    }
}

pub fn detect_framework(build_files: &str) -> bool {
    FRAMEWORK_IDENTIFIERS.iter().any(|id| build_files.contains(id))
}

pub fn detect_database(build_files: &str) -> bool {
    DATABASE_IDENTIFIERS.iter().any(|id| build_files.contains(id))
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| extensions.contains(&ext))
        .unwrap_or(false)
}

fn dir_has_extension(dir: &Path, extension: &str) -> bool {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .any(|e| e.file_type().is_file() && has_extension(e.path(), &[extension]))
}

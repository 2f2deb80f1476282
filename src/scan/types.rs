//! Core types for scan results.

use serde::Serialize;

use super::metrics::RepoMetrics;
use crate::rules::DependencyCategory;

/// Build tool detected at the repository root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BuildTool {
    Maven,
    Gradle,
}

impl std::fmt::Display for BuildTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildTool::Maven => write!(f, "Maven"),
            BuildTool::Gradle => write!(f, "Gradle"),
        }
    }
}

/// Primary source language of the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Language {
    Java,
    Kotlin,
    #[default]
    Unknown,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::Java => write!(f, "Java"),
            Language::Kotlin => write!(f, "Kotlin"),
            Language::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Packaging type declared or inferred from the build manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Packaging {
    #[serde(rename = "JAR")]
    Jar,
    #[serde(rename = "WAR")]
    War,
    #[default]
    Unknown,
}

impl std::fmt::Display for Packaging {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Packaging::Jar => write!(f, "JAR"),
            Packaging::War => write!(f, "WAR"),
            Packaging::Unknown => write!(f, "Unknown"),
        }
    }
}

/// An external system detected by the rule engine, with the evidence that
/// triggered the detection.
#[derive(Debug, Clone, Serialize)]
pub struct DetectedDependency {
    pub name: String,
    pub category: DependencyCategory,
    pub evidence: String,
}

impl DetectedDependency {
    /// Construct a detection. Returns `None` for blank evidence; a detection
    /// without evidence is meaningless and must never be emitted.
    pub fn new(name: &str, category: DependencyCategory, evidence: String) -> Option<Self> {
        if evidence.trim().is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            category,
            evidence,
        })
    }

    /// Deduplication key: at most one detection per `(name, category)` pair.
    pub fn key(&self) -> (String, DependencyCategory) {
        (self.name.clone(), self.category)
    }
}

/// A module or package group within the project.
///
/// One per build-manifest-declared module, or a single synthetic module
/// (named after the repository root) for single-module projects.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectModule {
    pub name: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Alphabetically deduplicated by the extractor.
    pub top_level_packages: Vec<String>,
}

impl ProjectModule {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            description: None,
            top_level_packages: Vec::new(),
        }
    }
}

/// The aggregate fact record for one repository scan.
///
/// Assembled once by [`super::Scanner`] from the individual detectors and
/// read-only afterwards; this is the sole interface to the reporting layer.
#[derive(Debug, Clone, Serialize)]
pub struct RepoFacts {
    pub repo_path: String,
    pub build_tool: Option<BuildTool>,
    pub language: Language,
    pub packaging: Packaging,
    pub tests_present: bool,
    pub ci_present: bool,
    pub uses_framework: bool,
    pub has_database: bool,
    pub dependencies: Vec<DetectedDependency>,
    pub modules: Vec<ProjectModule>,
    /// Approximate or exact test coverage, 0-100.
    pub coverage_percent: u32,
    /// True when the percentage came from a parsed coverage report rather
    /// than the class-ratio heuristic.
    pub coverage_exact: bool,
    pub metrics: RepoMetrics,
    pub complexity_signals: Vec<String>,
    pub maintainability_concerns: Vec<String>,
}

impl RepoFacts {
    /// True if any detected dependency belongs to the given category.
    pub fn has_category(&self, category: DependencyCategory) -> bool {
        self.dependencies.iter().any(|d| d.category == category)
    }
}

//! Scan orchestration: runs every detector and assembles the fact record.

use std::path::Path;

use super::complexity::{self, Thresholds};
use super::coverage;
use super::dependencies;
use super::facts;
use super::metrics;
use super::modules;
use super::types::{Packaging, RepoFacts};
use crate::rules::DependencyRule;

/// How the coverage percentage should be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoverageMode {
    /// Class-ratio heuristic only.
    #[default]
    Heuristic,
    /// Parse the coverage report; fall back to the heuristic when the
    /// report is unavailable.
    Exact,
}

/// Runs a complete scan over one repository.
///
/// The scan is single-threaded and synchronous; each detector is a pure
/// best-effort function, and no detector failure aborts the overall run.
pub struct Scanner {
    rules: Vec<DependencyRule>,
    coverage_mode: CoverageMode,
    thresholds: Thresholds,
}

impl Scanner {
    pub fn new(rules: Vec<DependencyRule>) -> Self {
        Self {
            rules,
            coverage_mode: CoverageMode::default(),
            thresholds: Thresholds::default(),
        }
    }

    /// Select heuristic vs. exact coverage.
    pub fn coverage_mode(mut self, mode: CoverageMode) -> Self {
        self.coverage_mode = mode;
        self
    }

    /// Override the complexity thresholds.
    pub fn thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Scan a repository root and assemble the immutable fact record.
    pub fn scan(&self, repo_root: &Path) -> RepoFacts {
        let dependencies = dependencies::scan(repo_root, &self.rules);

        let build_tool = facts::detect_build_tool(repo_root);
        let tests_present = facts::detect_tests(repo_root);
        let ci_present = facts::detect_ci(repo_root);

        // Packaging and framework/database markers only apply when a build
        // tool was found; a failed manifest read degrades those three facts
        // and nothing else.
        let (packaging, uses_framework, has_database) = match build_tool {
            Some(tool) => match facts::read_build_files(repo_root, tool) {
                Ok(content) => (
                    facts::detect_packaging(&content),
                    facts::detect_framework(&content),
                    facts::detect_database(&content),
                ),
                Err(_) => (Packaging::Unknown, false, false),
            },
            None => (Packaging::Unknown, false, false),
        };

        let language = facts::detect_language(repo_root, build_tool);
        let modules = modules::analyze(repo_root);
        let metrics = metrics::collect(repo_root);

        let heuristic = || coverage::approximate(metrics.total_classes, metrics.total_test_classes);
        let (coverage_percent, coverage_exact) = match self.coverage_mode {
            CoverageMode::Exact => match coverage::parse_jacoco_report(repo_root) {
                Some(percent) => (percent, true),
                None => (heuristic(), false),
            },
            CoverageMode::Heuristic => (heuristic(), false),
        };

        let (complexity_signals, maintainability_concerns) = complexity::analyze(
            tests_present,
            coverage_percent,
            &metrics,
            self.thresholds,
        );

        let repo_path = repo_root
            .canonicalize()
            .unwrap_or_else(|_| repo_root.to_path_buf())
            .display()
            .to_string();

        RepoFacts {
            repo_path,
            build_tool,
            language,
            packaging,
            tests_present,
            ci_present,
            uses_framework,
            has_database,
            dependencies,
            modules,
            coverage_percent,
            coverage_exact,
            metrics,
            complexity_signals,
            maintainability_concerns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::types::{BuildTool, Language};
    use std::path::Path;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_scan_empty_directory_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let facts = Scanner::new(Vec::new()).scan(temp.path());

        assert_eq!(facts.build_tool, None);
        assert_eq!(facts.language, Language::Unknown);
        assert_eq!(facts.packaging, Packaging::Unknown);
        assert!(!facts.tests_present);
        assert!(!facts.ci_present);
        assert!(facts.dependencies.is_empty());
        assert_eq!(facts.modules.len(), 1);
        assert_eq!(facts.coverage_percent, 0);
        assert!(!facts.coverage_exact);
    }

    #[test]
    fn test_scan_maven_project() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "pom.xml",
            "<project><packaging>jar</packaging>\
             <artifactId>spring-boot-starter-data-jpa</artifactId></project>",
        );
        write(temp.path(), "src/main/java/com/acme/App.java", "class App {}\n");
        write(
            temp.path(),
            "src/test/java/com/acme/AppTest.java",
            "class AppTest {}\n",
        );

        let facts = Scanner::new(Vec::new()).scan(temp.path());
        assert_eq!(facts.build_tool, Some(BuildTool::Maven));
        assert_eq!(facts.language, Language::Java);
        assert_eq!(facts.packaging, Packaging::Jar);
        assert!(facts.tests_present);
        assert!(facts.uses_framework);
        assert!(facts.has_database);
        assert_eq!(facts.metrics.total_classes, 1);
        assert_eq!(facts.metrics.total_test_classes, 1);
        assert_eq!(facts.coverage_percent, 100);
    }

    #[test]
    fn test_exact_mode_falls_back_to_heuristic_when_unavailable() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "src/main/java/com/acme/App.java", "class App {}\n");
        write(
            temp.path(),
            "src/test/java/com/acme/AppTest.java",
            "class AppTest {}\n",
        );

        let facts = Scanner::new(Vec::new())
            .coverage_mode(CoverageMode::Exact)
            .scan(temp.path());
        assert!(!facts.coverage_exact);
        assert_eq!(facts.coverage_percent, 100);
    }

    #[test]
    fn test_exact_mode_uses_report_when_present() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "src/main/java/com/acme/App.java", "class App {}\n");
        write(
            temp.path(),
            "src/test/java/com/acme/AppTest.java",
            "class AppTest {}\n",
        );
        write(
            temp.path(),
            crate::scan::coverage::JACOCO_REPORT_PATH,
            "GROUP,PACKAGE,CLASS,SOURCEFILE,IM,IC\napp,com.acme,App,App.java,60,40,0,0,0,0\n",
        );

        let facts = Scanner::new(Vec::new())
            .coverage_mode(CoverageMode::Exact)
            .scan(temp.path());
        assert!(facts.coverage_exact);
        assert_eq!(facts.coverage_percent, 40);
    }
}

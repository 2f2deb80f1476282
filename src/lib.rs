//! Repoprobe - repository fact sheet generator.
//!
//! Repoprobe inspects a source repository on disk and produces a
//! structured, language-agnostic fact sheet: build tooling, primary
//! language, test and CI presence, packaging, framework usage,
//! external-system integrations, and code-complexity signals.
//!
//! Detection is heuristic by design: path and substring conventions plus
//! regex matching over raw text, never AST parsing. Every detector is
//! best-effort and degrades to a default instead of failing the scan.
//!
//! # Architecture
//!
//! - `rules`: declarative detection rules for external systems
//! - `scan`: the detectors and the orchestrating `Scanner`
//! - `report`: output formatting (pretty, Markdown, JSON)
//!
//! # Adding a New Detection Rule
//!
//! Extend `src/assets/default_rules.json` or supply a rules file via
//! `--rules`; no code changes are needed for new external systems.

pub mod cli;
pub mod report;
pub mod rules;
pub mod scan;

pub use rules::{DependencyCategory, DependencyRule};
pub use scan::{
    BuildTool, CoverageBand, CoverageMode, DetectedDependency, Language, Packaging, ProjectModule,
    RepoFacts, RepoMetrics, Scanner, Thresholds,
};

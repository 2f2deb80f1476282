//! Fact extraction and signal derivation over a repository tree.

pub mod complexity;
pub mod coverage;
pub mod dependencies;
pub mod facts;
pub mod metrics;
pub mod modules;
mod runner;
mod types;

pub use complexity::Thresholds;
pub use coverage::CoverageBand;
pub use metrics::{FileMetric, RepoMetrics, MAX_LARGEST_FILES};
pub use runner::{CoverageMode, Scanner};
pub use types::{BuildTool, DetectedDependency, Language, Packaging, ProjectModule, RepoFacts};

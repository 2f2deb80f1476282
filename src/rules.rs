//! Declarative detection rules for external-system integrations.
//!
//! A rule names an external system, assigns it a category, and carries two
//! kinds of evidence sources: build-manifest artifact identifiers and
//! case-insensitive regex heuristics matched against file content. Rules are
//! pure data; the engine in [`crate::scan::dependencies`] applies them.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Embedded default rule asset, shipped with the binary.
pub const DEFAULT_RULES: &str = include_str!("assets/default_rules.json");

/// File name of the rule asset. Files with this name are skipped during
/// heuristic scanning so the rule definitions never match themselves.
pub const RULES_ASSET_NAME: &str = "default_rules.json";

/// Category of an external system a rule detects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DependencyCategory {
    Persistence,
    Messaging,
    CloudServices,
    Web,
    #[default]
    Unknown,
}

impl DependencyCategory {
    /// Human-readable label, also used in the rule asset and reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            DependencyCategory::Persistence => "Persistence",
            DependencyCategory::Messaging => "Messaging",
            DependencyCategory::CloudServices => "Cloud Services",
            DependencyCategory::Web => "Web",
            DependencyCategory::Unknown => "Unknown",
        }
    }

    /// Look up a category by its display name, case-insensitively.
    /// Unrecognized labels map to `Unknown`.
    pub fn from_label(label: &str) -> Self {
        let known = [
            DependencyCategory::Persistence,
            DependencyCategory::Messaging,
            DependencyCategory::CloudServices,
            DependencyCategory::Web,
        ];
        known
            .into_iter()
            .find(|c| c.display_name().eq_ignore_ascii_case(label))
            .unwrap_or(DependencyCategory::Unknown)
    }
}

impl std::fmt::Display for DependencyCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl Serialize for DependencyCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.display_name())
    }
}

impl<'de> Deserialize<'de> for DependencyCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(DependencyCategory::from_label(&label))
    }
}

/// A single declarative detection rule.
///
/// Field names mirror the rule asset schema; unknown fields are ignored so
/// older binaries tolerate newer assets.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DependencyRule {
    pub name: String,
    #[serde(default)]
    pub category: DependencyCategory,
    #[serde(default, rename = "mavenArtifacts")]
    pub maven_artifacts: Vec<String>,
    #[serde(default)]
    pub heuristics: Vec<String>,
}

/// Parse a rule list from JSON text.
pub fn parse_rules(json: &str) -> anyhow::Result<Vec<DependencyRule>> {
    let rules: Vec<DependencyRule> = serde_json::from_str(json)?;
    Ok(rules)
}

/// Load the embedded default rule set.
///
/// A broken asset degrades to an empty rule list rather than failing the
/// scan; the engine then simply detects nothing.
pub fn load_default() -> Vec<DependencyRule> {
    parse_rules(DEFAULT_RULES).unwrap_or_default()
}

/// Load rules from a user-supplied JSON file, falling back to the embedded
/// defaults when the file is missing or unparsable.
pub fn load_from_file(path: &Path) -> Vec<DependencyRule> {
    let loaded = fs::read_to_string(path)
        .map_err(anyhow::Error::from)
        .and_then(|content| parse_rules(&content));
    match loaded {
        Ok(rules) => rules,
        Err(e) => {
            eprintln!(
                "Warning: failed to load rules from {}: {} (using embedded defaults)",
                path.display(),
                e
            );
            load_default()
        }
    }
}

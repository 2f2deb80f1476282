//! Output formatting for scan results.
//!
//! Supports three output formats:
//! - Pretty: colored terminal output for human readability
//! - Markdown: a deterministic insight report for sharing/archiving
//! - JSON: structured output for programmatic consumption

use colored::*;
use std::fmt::Write as _;

use crate::rules::DependencyCategory;
use crate::scan::{CoverageBand, RepoFacts};

/// Render the fact record as pretty-printed JSON.
pub fn render_json(facts: &RepoFacts) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(facts)?)
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write a colored summary of the fact record to stdout.
pub fn write_pretty(facts: &RepoFacts) {
    println!();
    print!("  ");
    print!("{}", "repoprobe".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Repository: ".dimmed());
    println!("{}", facts.repo_path);
    println!();

    let build_tool = facts
        .build_tool
        .map(|t| t.to_string())
        .unwrap_or_else(|| "None detected".to_string());
    println!("  {} {}", "Build tool:".dimmed(), build_tool);
    println!("  {} {}", "Language:  ".dimmed(), facts.language);
    println!("  {} {}", "Packaging: ".dimmed(), facts.packaging);
    println!("  {} {}", "Tests:     ".dimmed(), yes_no(facts.tests_present));
    println!("  {} {}", "CI:        ".dimmed(), yes_no(facts.ci_present));
    println!(
        "  {} {}",
        "Framework: ".dimmed(),
        yes_no(facts.uses_framework)
    );
    println!("  {} {}", "Database:  ".dimmed(), yes_no(facts.has_database));
    println!();

    write_coverage_line(facts);
    println!();

    if !facts.dependencies.is_empty() {
        println!("  {}", "External systems:".bold());
        for dep in &facts.dependencies {
            println!(
                "    {} {} ({})",
                "•".dimmed(),
                dep.name.bold(),
                dep.category
            );
            println!("      {}", dep.evidence.dimmed());
        }
        println!();
    }

    if !facts.complexity_signals.is_empty() {
        println!("  {}", "Complexity signals:".yellow().bold());
        for signal in &facts.complexity_signals {
            println!("    {} {}", "!".yellow(), signal);
        }
        println!();
    }

    if !facts.maintainability_concerns.is_empty() {
        println!("  {}", "Maintainability concerns:".red().bold());
        for concern in &facts.maintainability_concerns {
            println!("    {} {}", "✗".red(), concern);
        }
        println!();
    }
}

fn write_coverage_line(facts: &RepoFacts) {
    let label = if facts.coverage_exact {
        "Coverage (report):"
    } else {
        "Coverage (estimate):"
    };
    let value = format!("{}%", facts.coverage_percent);
    let colored_value = match CoverageBand::of(facts.coverage_percent) {
        CoverageBand::Green => value.green(),
        CoverageBand::Yellow => value.yellow(),
        CoverageBand::Red => value.red(),
    };
    println!("  {} {}", label.dimmed(), colored_value);
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

// =============================================================================
// Markdown Format
// =============================================================================

/// Render the deterministic Markdown insight report.
pub fn render_markdown(facts: &RepoFacts) -> String {
    let mut out = String::new();

    out.push_str("# Repository Insight Report\n\n");
    write_overview(&mut out, facts);
    write_detected_information(&mut out, facts);
    write_architecture(&mut out, facts);
    write_findings(&mut out, facts);
    write_external_dependencies(&mut out, facts);
    write_metrics(&mut out, facts);

    out
}

/// One-paragraph deterministic overview assembled from the detected facts.
fn write_overview(out: &mut String, facts: &RepoFacts) {
    out.push_str("## Project Overview\n\n");

    let _ = write!(out, "This is a **{}** project ", facts.language);
    match facts.build_tool {
        Some(tool) => {
            let _ = write!(out, "managed by **{tool}**. ");
        }
        None => out.push_str("with no detected build tool. "),
    }

    if facts.uses_framework {
        out.push_str("It uses the **Spring** framework. ");
    }
    if facts.packaging != crate::scan::Packaging::Unknown {
        let _ = write!(out, "The codebase is packaged as a **{}**. ", facts.packaging);
    }

    if !facts.dependencies.is_empty() {
        let mut categories: Vec<&str> = Vec::new();
        for dep in &facts.dependencies {
            let name = dep.category.display_name();
            if !categories.contains(&name) {
                categories.push(name);
            }
        }
        let _ = write!(
            out,
            "Deterministic analysis indicates interactions with **{}** external system(s), \
             primarily for **{}**. ",
            facts.dependencies.len(),
            categories.join(", ")
        );
    }

    if facts.tests_present {
        out.push_str("The repository contains **test sources**. ");
    }
    if facts.ci_present {
        out.push_str("CI configuration is **available** for this project. ");
    }

    out.push_str("\n\n---\n\n");
}

fn write_detected_information(out: &mut String, facts: &RepoFacts) {
    out.push_str("## Detected Information\n");
    let build_tool = facts
        .build_tool
        .map(|t| t.to_string())
        .unwrap_or_else(|| "None".to_string());
    let _ = writeln!(out, "- Build tool: {build_tool}");
    let _ = writeln!(out, "- Language: {}", facts.language);
    let _ = writeln!(out, "- Packaging: {}", facts.packaging);
    let _ = writeln!(out, "- Tests present: {}", facts.tests_present);
    let _ = writeln!(out, "- CI present: {}", facts.ci_present);
    out.push('\n');
}

/// Mermaid diagrams: a module/package architecture graph, and a system
/// context graph showing the detected external-system categories.
fn write_architecture(out: &mut String, facts: &RepoFacts) {
    out.push_str("## Architecture Overview\n\n");

    out.push_str("### Project Architecture\n");
    if facts.modules.is_empty() {
        out.push_str("_No module structure detected._\n\n");
    } else {
        out.push_str("```mermaid\n");
        write_project_architecture(out, &facts.modules);
        out.push_str("```\n\n");
    }

    if !facts.dependencies.is_empty() {
        out.push_str("### System Context\n");
        out.push_str("```mermaid\n");
        write_system_context(out, &facts.dependencies);
        out.push_str("```\n\n");
    }

    out.push_str("---\n\n");
}

fn write_project_architecture(out: &mut String, modules: &[crate::scan::ProjectModule]) {
    out.push_str("graph TB\n");

    if let [module] = modules {
        // Single module: the root node carries the module name and fans
        // out to its packages.
        let _ = writeln!(out, "  Project[\"{}\"]", module.name);
        if module.top_level_packages.is_empty() {
            out.push_str("  Project --> Packages[\"Source packages\"]\n");
        } else {
            for pkg in &module.top_level_packages {
                let _ = writeln!(out, "  Project --> {}[\"{}\"]", node_id(pkg), pkg);
            }
        }
        return;
    }

    out.push_str("  Project[\"Project\"]\n");
    for module in modules {
        let module_id = node_id(&module.name);
        let label = match &module.description {
            Some(description) => format!("{}<br/>({})", module.name, description),
            None => module.name.clone(),
        };
        let _ = writeln!(out, "  Project --> {}[\"{}\"]", module_id, label);
        for pkg in &module.top_level_packages {
            let _ = writeln!(
                out,
                "  {} --> {}{}[\"{}\"]",
                module_id,
                module_id,
                node_id(pkg),
                pkg
            );
        }
    }
}

fn write_system_context(out: &mut String, dependencies: &[crate::scan::DetectedDependency]) {
    let mut categories: Vec<&str> = dependencies
        .iter()
        .map(|d| d.category.display_name())
        .collect();
    categories.sort_by_key(|c| c.to_ascii_lowercase());
    categories.dedup();

    out.push_str("graph TD\n");
    out.push_str("  Project[Project]\n");
    for category in categories {
        let id: String = category.split_whitespace().collect();
        let _ = writeln!(out, "  Project -->|{category}| {id}[{category}]");
    }
}

/// Mermaid node ids must be bare identifiers; strip everything else.
fn node_id(label: &str) -> String {
    label.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

fn write_findings(out: &mut String, facts: &RepoFacts) {
    let hygiene = collect_hygiene_findings(facts);
    let integration = collect_integration_findings(facts);
    let recommendations = collect_recommendations(facts);

    out.push_str("## Findings & Recommendations\n\n");

    out.push_str("### Summary\n");
    let _ = writeln!(
        out,
        "Repository analysis identified {} hygiene observations and {} integration patterns.\n",
        hygiene.len(),
        integration.len()
    );

    out.push_str("### Findings\n");
    for finding in hygiene.iter().chain(integration.iter()) {
        let _ = writeln!(out, "- {finding}");
    }
    for signal in &facts.complexity_signals {
        let _ = writeln!(out, "- {signal}");
    }
    for concern in &facts.maintainability_concerns {
        let _ = writeln!(out, "- {concern}");
    }
    out.push('\n');

    // At most four recommendations, highest value first.
    if !recommendations.is_empty() {
        out.push_str("### Recommendations\n");
        for rec in recommendations.iter().take(4) {
            let _ = writeln!(out, "- {rec}");
        }
        out.push('\n');
    }
}

fn collect_hygiene_findings(facts: &RepoFacts) -> Vec<String> {
    let mut findings = Vec::new();
    if facts.tests_present {
        findings.push("Test sources are present in the repository.".to_string());
    } else {
        findings.push("No test sources were detected.".to_string());
    }
    if facts.ci_present {
        findings.push("CI configuration was detected.".to_string());
    } else {
        findings.push("No CI configuration was detected.".to_string());
    }
    findings
}

fn collect_integration_findings(facts: &RepoFacts) -> Vec<String> {
    let mut findings = Vec::new();
    if facts.has_category(DependencyCategory::Persistence) {
        findings.push("The project integrates with external persistence systems.".to_string());
    }
    if facts.has_category(DependencyCategory::Messaging) {
        findings.push("The project integrates with external systems via messaging.".to_string());
    }
    if facts.has_category(DependencyCategory::CloudServices) {
        findings.push("The project integrates with various cloud provider services.".to_string());
    }
    if facts.has_category(DependencyCategory::Web) {
        findings.push("The project integrates with external systems via HTTP APIs.".to_string());
    }
    findings
}

fn collect_recommendations(facts: &RepoFacts) -> Vec<String> {
    let mut recs = Vec::new();

    if facts.tests_present && !facts.ci_present {
        recs.push(
            "Consider adding a CI pipeline to automatically run tests on pull requests."
                .to_string(),
        );
    } else if facts.ci_present && !facts.tests_present {
        recs.push("Consider adding test sources to leverage the existing CI pipeline.".to_string());
    } else if !facts.tests_present && !facts.ci_present {
        recs.push(
            "Consider implementing a test suite to ensure code correctness and prevent \
             regressions."
                .to_string(),
        );
    }

    if facts.has_category(DependencyCategory::Persistence) {
        recs.push(
            "Consider using an in-memory database or containers for local/CI persistence testing."
                .to_string(),
        );
    }
    if facts.has_category(DependencyCategory::Messaging) {
        recs.push(
            "Consider establishing monitoring and failure-handling strategies for message \
             consumption."
                .to_string(),
        );
    }
    if facts.has_category(DependencyCategory::CloudServices) {
        recs.push(
            "Consider using LocalStack or similar emulators for validating cloud service \
             integrations."
                .to_string(),
        );
    }
    if facts.has_category(DependencyCategory::Web) {
        recs.push(
            "Consider using stubs or consumer-driven contract tests for external HTTP \
             integrations."
                .to_string(),
        );
    }

    recs
}

fn write_external_dependencies(out: &mut String, facts: &RepoFacts) {
    out.push_str("## External Dependencies\n\n");
    if facts.dependencies.is_empty() {
        out.push_str("No external systems or infrastructure dependencies detected.\n\n");
        return;
    }
    for dep in &facts.dependencies {
        let _ = writeln!(out, "- **{}** ({})", dep.name, dep.category);
        let _ = writeln!(out, "  - Evidence: _{}_", dep.evidence);
    }
    out.push('\n');
}

fn write_metrics(out: &mut String, facts: &RepoFacts) {
    out.push_str("## Metrics\n\n");
    let _ = writeln!(
        out,
        "![Coverage](https://img.shields.io/badge/coverage-{}%25-{})\n",
        facts.coverage_percent,
        CoverageBand::of(facts.coverage_percent).as_str()
    );
    out.push_str("| Metric | Value |\n");
    out.push_str("|--------|-------|\n");
    let _ = writeln!(out, "| Source files | {} |", facts.metrics.total_files);
    let _ = writeln!(out, "| Classes | {} |", facts.metrics.total_classes);
    let _ = writeln!(
        out,
        "| Test classes | {} |",
        facts.metrics.total_test_classes
    );
    let _ = writeln!(
        out,
        "| Approx. lines of code | {} |",
        facts.metrics.approx_lines_of_code
    );
    let coverage_kind = if facts.coverage_exact {
        "report"
    } else {
        "estimate"
    };
    let _ = writeln!(
        out,
        "| Test coverage ({coverage_kind}) | {}% |",
        facts.coverage_percent
    );
    out.push('\n');

    if !facts.metrics.largest_files.is_empty() {
        out.push_str("### Largest Files\n\n");
        for file in &facts.metrics.largest_files {
            let _ = writeln!(out, "- `{}` ({} LOC)", file.relative_path, file.line_count);
        }
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::{
        DetectedDependency, Language, Packaging, ProjectModule, RepoFacts, RepoMetrics,
    };

    fn sample_facts() -> RepoFacts {
        RepoFacts {
            repo_path: "/work/sample".to_string(),
            build_tool: Some(crate::scan::BuildTool::Maven),
            language: Language::Java,
            packaging: Packaging::Jar,
            tests_present: true,
            ci_present: false,
            uses_framework: true,
            has_database: true,
            dependencies: vec![DetectedDependency::new(
                "PostgreSQL",
                DependencyCategory::Persistence,
                "Library: postgresql".to_string(),
            )
            .unwrap()],
            modules: vec![ProjectModule {
                name: "sample".to_string(),
                path: ".".to_string(),
                description: None,
                top_level_packages: vec!["com".to_string()],
            }],
            coverage_percent: 60,
            coverage_exact: false,
            metrics: RepoMetrics::default(),
            complexity_signals: vec!["Large file (>300 LOC): Big.java (400 LOC)".to_string()],
            maintainability_concerns: Vec::new(),
        }
    }

    #[test]
    fn test_markdown_contains_all_sections() {
        let markdown = render_markdown(&sample_facts());
        assert!(markdown.starts_with("# Repository Insight Report"));
        assert!(markdown.contains("## Project Overview"));
        assert!(markdown.contains("## Detected Information"));
        assert!(markdown.contains("## Architecture Overview"));
        assert!(markdown.contains("## Findings & Recommendations"));
        assert!(markdown.contains("## External Dependencies"));
        assert!(markdown.contains("## Metrics"));
    }

    #[test]
    fn test_markdown_overview_paragraph() {
        let markdown = render_markdown(&sample_facts());
        assert!(markdown.contains("This is a **Java** project managed by **Maven**."));
        assert!(markdown.contains("It uses the **Spring** framework."));
        assert!(markdown.contains("interactions with **1** external system(s)"));
        assert!(markdown.contains("primarily for **Persistence**"));
    }

    #[test]
    fn test_markdown_overview_ci_wording() {
        let mut facts = sample_facts();
        facts.ci_present = true;
        let markdown = render_markdown(&facts);
        assert!(markdown.contains("CI configuration is **available** for this project."));
    }

    #[test]
    fn test_architecture_single_module_diagram() {
        let markdown = render_markdown(&sample_facts());
        assert!(markdown.contains("### Project Architecture\n```mermaid\ngraph TB\n"));
        assert!(markdown.contains("  Project[\"sample\"]\n"));
        assert!(markdown.contains("  Project --> com[\"com\"]\n"));
    }

    #[test]
    fn test_architecture_single_module_without_packages() {
        let mut facts = sample_facts();
        facts.modules[0].top_level_packages.clear();
        let markdown = render_markdown(&facts);
        assert!(markdown.contains("  Project --> Packages[\"Source packages\"]\n"));
    }

    #[test]
    fn test_architecture_multi_module_diagram() {
        let mut facts = sample_facts();
        facts.modules = vec![
            ProjectModule {
                name: "core-lib".to_string(),
                path: "core-lib".to_string(),
                description: Some("shared domain".to_string()),
                top_level_packages: vec!["com".to_string()],
            },
            ProjectModule::new("api", "api"),
        ];
        let markdown = render_markdown(&facts);
        assert!(markdown.contains("  Project[\"Project\"]\n"));
        assert!(markdown.contains("  Project --> corelib[\"core-lib<br/>(shared domain)\"]\n"));
        assert!(markdown.contains("  corelib --> corelibcom[\"com\"]\n"));
        assert!(markdown.contains("  Project --> api[\"api\"]\n"));
    }

    #[test]
    fn test_system_context_categories_sorted_and_deduplicated() {
        let mut facts = sample_facts();
        facts.dependencies = vec![
            DetectedDependency::new(
                "Kafka",
                DependencyCategory::Messaging,
                "Library: kafka-clients".to_string(),
            )
            .unwrap(),
            DetectedDependency::new(
                "S3",
                DependencyCategory::CloudServices,
                "Library: s3".to_string(),
            )
            .unwrap(),
            DetectedDependency::new(
                "Redis",
                DependencyCategory::Persistence,
                "Library: jedis".to_string(),
            )
            .unwrap(),
            DetectedDependency::new(
                "PostgreSQL",
                DependencyCategory::Persistence,
                "Library: postgresql".to_string(),
            )
            .unwrap(),
        ];
        let markdown = render_markdown(&facts);
        let expected = "### System Context\n```mermaid\ngraph TD\n  Project[Project]\n  \
                        Project -->|Cloud Services| CloudServices[Cloud Services]\n  \
                        Project -->|Messaging| Messaging[Messaging]\n  \
                        Project -->|Persistence| Persistence[Persistence]\n```\n";
        assert!(markdown.contains(expected));
    }

    #[test]
    fn test_system_context_omitted_without_dependencies() {
        let mut facts = sample_facts();
        facts.dependencies.clear();
        let markdown = render_markdown(&facts);
        assert!(!markdown.contains("### System Context"));
    }

    #[test]
    fn test_markdown_coverage_badge_color() {
        let markdown = render_markdown(&sample_facts());
        assert!(markdown.contains("coverage-60%25-warning"));
    }

    #[test]
    fn test_markdown_dependency_evidence() {
        let markdown = render_markdown(&sample_facts());
        assert!(markdown.contains("- **PostgreSQL** (Persistence)"));
        assert!(markdown.contains("  - Evidence: _Library: postgresql_"));
    }

    #[test]
    fn test_markdown_recommendation_for_missing_ci() {
        let markdown = render_markdown(&sample_facts());
        assert!(markdown.contains(
            "Consider adding a CI pipeline to automatically run tests on pull requests."
        ));
    }

    #[test]
    fn test_markdown_empty_dependencies() {
        let mut facts = sample_facts();
        facts.dependencies.clear();
        let markdown = render_markdown(&facts);
        assert!(markdown.contains("No external systems or infrastructure dependencies detected."));
    }

    #[test]
    fn test_recommendations_capped_at_four() {
        let mut facts = sample_facts();
        facts.tests_present = false;
        facts.ci_present = false;
        for category in [
            DependencyCategory::Persistence,
            DependencyCategory::Messaging,
            DependencyCategory::CloudServices,
            DependencyCategory::Web,
        ] {
            facts.dependencies.push(
                DetectedDependency::new("X", category, "Library: x".to_string()).unwrap(),
            );
        }
        let markdown = render_markdown(&facts);
        let recommendation_lines = markdown
            .split("### Recommendations\n")
            .nth(1)
            .unwrap()
            .lines()
            .take_while(|l| l.starts_with("- "))
            .count();
        assert_eq!(recommendation_lines, 4);
    }

    #[test]
    fn test_json_round_trips_key_fields() {
        let json = render_json(&sample_facts()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["language"], "Java");
        assert_eq!(value["coverage_percent"], 60);
        assert_eq!(value["dependencies"][0]["category"], "Persistence");
    }
}

//! Command-line interface for repoprobe.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::report;
use crate::rules;
use crate::scan::{CoverageMode, Scanner, Thresholds};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Deterministic repository fact extraction.
///
/// Repoprobe scans a source repository and extracts verifiable facts:
/// build tool, language, packaging, test and CI presence, external-system
/// integrations, module structure, size metrics, and a test coverage
/// figure. Every fact carries evidence and no fact requires executing the
/// scanned project.
#[derive(Parser)]
#[command(name = "repoprobe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a repository and report extracted facts
    Scan(ScanArgs),
    /// Inspect or export the detection rule set
    Rules(RulesArgs),
}

/// Arguments for the scan command.
#[derive(Parser)]
pub struct ScanArgs {
    /// Path to the repository root
    pub path: PathBuf,

    /// Path to a JSON rules file (default: embedded rule set)
    #[arg(short, long)]
    pub rules: Option<PathBuf>,

    /// Output format: pretty, markdown, or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Read coverage from a JaCoCo CSV report when one exists
    #[arg(long)]
    pub coverage_exact: bool,

    /// Line count above which a file is flagged as large
    #[arg(long)]
    pub large_file_lines: Option<usize>,

    /// Class count above which the codebase is flagged for modularization
    #[arg(long)]
    pub class_count_threshold: Option<usize>,
}

/// Arguments for the rules command.
#[derive(Parser)]
pub struct RulesArgs {
    /// Export the embedded rule set to a file (a starting point for edits)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Run the scan command.
pub fn run_scan(args: &ScanArgs) -> anyhow::Result<i32> {
    if args.format != "pretty" && args.format != "markdown" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty', 'markdown', or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let abs_path = match args.path.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };
    if !abs_path.is_dir() {
        eprintln!("Error: not a directory: {}", abs_path.display());
        return Ok(EXIT_ERROR);
    }

    // A broken rules override warns and falls back inside the loader.
    let rule_set = match &args.rules {
        Some(path) => rules::load_from_file(path),
        None => rules::load_default(),
    };

    let mut thresholds = Thresholds::default();
    if let Some(lines) = args.large_file_lines {
        thresholds.large_file_lines = lines;
    }
    if let Some(classes) = args.class_count_threshold {
        thresholds.class_count = classes;
    }

    let coverage_mode = if args.coverage_exact {
        CoverageMode::Exact
    } else {
        CoverageMode::Heuristic
    };

    let scanner = Scanner::new(rule_set)
        .coverage_mode(coverage_mode)
        .thresholds(thresholds);
    let facts = scanner.scan(&abs_path);

    match args.format.as_str() {
        "json" => emit(args.output.as_deref(), &report::render_json(&facts)?)?,
        "markdown" => emit(args.output.as_deref(), &report::render_markdown(&facts))?,
        _ => match &args.output {
            // Pretty output is ANSI-colored and only makes sense on a terminal.
            Some(path) => {
                eprintln!(
                    "Warning: --output ignores format 'pretty'; writing markdown to {}",
                    path.display()
                );
                emit(Some(path), &report::render_markdown(&facts))?;
            }
            None => report::write_pretty(&facts),
        },
    }

    Ok(EXIT_SUCCESS)
}

fn emit(output: Option<&std::path::Path>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)?;
            println!("Wrote report to {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

/// Run the rules command.
pub fn run_rules(args: &RulesArgs) -> anyhow::Result<i32> {
    if let Some(path) = &args.output {
        if path.exists() {
            eprintln!("Error: file already exists: {}", path.display());
            return Ok(EXIT_ERROR);
        }
        std::fs::write(path, rules::DEFAULT_RULES)?;
        println!("Wrote default rule set to {}", path.display());
        println!();
        println!("Next steps:");
        println!("  1. Edit {} to add or adjust rules", path.display());
        println!("  2. Run: repoprobe scan . --rules {}", path.display());
        return Ok(EXIT_SUCCESS);
    }

    let rule_set = rules::load_default();
    println!("Built-in detection rules:");
    println!();
    for rule in &rule_set {
        println!(
            "  {:<22} {:<15} {} artifact(s), {} heuristic(s)",
            rule.name,
            rule.category.display_name(),
            rule.maven_artifacts.len(),
            rule.heuristics.len()
        );
    }
    println!();
    println!("Usage:");
    println!("  repoprobe rules --output rules.json");

    Ok(EXIT_SUCCESS)
}

//! CLI command definitions and handlers

use crate::analyze::AnalysisEngine;
use crate::config::AnalysisConfig;
use crate::detect;
use crate::diagnose::DiagnosisEngine;
use crate::report;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// codediag - per-function metrics and severity-ranked diagnosis
#[derive(Parser, Debug)]
#[command(name = "codediag")]
#[command(
    version,
    about = "Analyze a multi-language codebase for complexity, coverage gaps, dead code, coupling, and hardcoded secrets",
    after_help = "\
Examples:
  codediag .                         Analyze current directory
  codediag analyze /path/to/repo     Analyze a specific project
  codediag analyze . --format json   JSON output for scripting
  codediag analyze . -o report.json --format json"
)]
pub struct Cli {
    /// Path to the project (default: current directory)
    #[arg(global = true, default_value = ".")]
    pub path: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a project and print the diagnosis
    Analyze {
        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Flag functions with cyclomatic complexity above this
        #[arg(long)]
        complexity_threshold: Option<u32>,

        /// Flag modules with import degree above this
        #[arg(long)]
        coupling_threshold: Option<u32>,

        /// Drop external findings below this confidence (0.0-1.0)
        #[arg(long)]
        min_confidence: Option<f64>,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Analyze {
            format,
            output,
            complexity_threshold,
            coupling_threshold,
            min_confidence,
        }) => run_analyze(
            &cli.path,
            &format,
            output,
            complexity_threshold,
            coupling_threshold,
            min_confidence,
        ),
        // Bare `codediag .` behaves like `codediag analyze .`.
        None => run_analyze(&cli.path, "text", None, None, None, None),
    }
}

fn run_analyze(
    path: &PathBuf,
    format: &str,
    output: Option<PathBuf>,
    complexity_threshold: Option<u32>,
    coupling_threshold: Option<u32>,
    min_confidence: Option<f64>,
) -> Result<()> {
    let project = detect::detect_project(path)?;

    let mut config = AnalysisConfig::load(&project.root_path)?;
    if let Some(threshold) = complexity_threshold {
        config.complexity_threshold = threshold;
    }
    if let Some(threshold) = coupling_threshold {
        config.coupling_threshold = threshold;
    }
    if let Some(confidence) = min_confidence {
        config.min_finding_confidence = confidence;
    }
    debug!(?config, "effective configuration");

    let outcome = AnalysisEngine::new(config.clone()).run(&project);
    let diagnosis =
        DiagnosisEngine::new(config).diagnose(&project.root_path, &outcome.report, None)?;

    let rendered = match format {
        "json" => report::render_json(&project, &outcome.report, &diagnosis)?,
        _ => report::render_text(&project, &outcome.report, &diagnosis),
    };

    match output {
        Some(out_path) => {
            std::fs::write(&out_path, rendered)
                .with_context(|| format!("Failed to write report to {}", out_path.display()))?;
            eprintln!("Report written to {}", out_path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

//! codediag - multi-language code metrics and diagnosis CLI
//!
//! Extracts per-function records across seven languages, computes
//! complexity, coverage, coupling and dead-code metrics, and distills them
//! into a deduplicated, severity-ranked diagnosis with a health score.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = codediag::cli::Cli::parse();
    codediag::cli::run(cli)
}

//! Per-function code metrics and severity-ranked diagnosis for
//! multi-language projects.
//!
//! The pipeline runs in three phases: the detector inventories the project
//! by language, the analysis engine extracts function records and computes
//! metrics in per-language passes, and the diagnosis engine turns the
//! results into a deduplicated, ranked set of findings with a health score.

pub mod analyze;
pub mod cli;
pub mod config;
pub mod detect;
pub mod diagnose;
pub mod errors;
pub mod extract;
pub mod models;
pub mod report;

pub use config::AnalysisConfig;
pub use errors::CodediagError;
pub use models::{AnalysisReport, DiagnosisReport, Finding, Language, ProjectInfo, Severity};

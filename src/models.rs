//! Core data models for codediag
//!
//! Value types shared by the extractors, metric analyzers, and the
//! diagnosis pipeline. Reports are immutable once built.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Languages the pipeline understands. Closed set; dispatch is a lookup,
/// not discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Java,
    Go,
    Rust,
    CSharp,
}

impl Language {
    /// Map a file extension (without the dot) to a language.
    pub fn from_extension(ext: &str) -> Option<Language> {
        match ext {
            "py" | "pyw" | "pyi" => Some(Language::Python),
            "js" | "jsx" | "mjs" | "cjs" => Some(Language::JavaScript),
            "ts" | "tsx" => Some(Language::TypeScript),
            "java" => Some(Language::Java),
            "go" => Some(Language::Go),
            "rs" => Some(Language::Rust),
            "cs" => Some(Language::CSharp),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Java => "java",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::CSharp => "csharp",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One callable unit as seen by an extractor.
///
/// Immutable within a pass once produced; analyzer flags (`is_tested`,
/// `is_dead`, coupling counts) are written exactly once by the pass that
/// owns the record's language slice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub name: String,
    /// `Class.method` where a class context exists, otherwise the bare name.
    pub qualified_name: String,
    pub file_path: PathBuf,
    pub language: Language,
    pub line_start: u32,
    pub line_end: u32,
    /// Raw body text covering `line_start..=line_end`.
    pub body: String,
    /// Cyclomatic complexity, always >= 1.
    pub complexity: u32,
    pub is_public: bool,
    pub is_tested: bool,
    pub is_dead: bool,
    /// Whole-word references to this function from other source lines.
    pub fan_in: u32,
    /// Distinct project functions referenced from this body.
    pub fan_out: u32,
}

/// Per-file metrics used by the coupling analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub file_path: PathBuf,
    pub language: Language,
    pub loc: usize,
    pub imports: Vec<String>,
}

/// A module whose combined import degree exceeds the coupling threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouplingIssue {
    pub module_path: PathBuf,
    /// Modules this one imports (efferent coupling).
    pub imports_out: u32,
    /// Modules importing this one (afferent coupling).
    pub imported_by: u32,
}

impl CouplingIssue {
    pub fn degree(&self) -> u32 {
        self.imports_out + self.imported_by
    }
}

/// Project-wide analysis results, built once at the aggregation barrier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub total_functions: usize,
    pub tested_function_count: usize,
    /// 0-100; (sum tested)/(sum total) across languages, never an
    /// average of per-language percentages.
    pub estimated_coverage: f64,
    pub average_complexity: f64,
    pub total_loc: usize,
    pub high_complexity_functions: Vec<FunctionRecord>,
    pub untested_functions: Vec<FunctionRecord>,
    pub dead_code_functions: Vec<FunctionRecord>,
    pub coupling_issues: Vec<CouplingIssue>,
}

/// Severity of a finding.
///
/// Declaration order is most-severe-first so the derived `Ord` sorts
/// CRITICAL before WARNING before INFO.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCategory {
    Bug,
    Security,
    ErrorHandling,
    DeadCode,
    Complexity,
    Coupling,
    MissingTests,
    Style,
}

/// Where a finding came from. The merge/dedupe/score logic is agnostic to
/// the source; only the confidence pre-filter looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingSource {
    Static,
    Ai,
    Security,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuggestedFix {
    pub description: String,
    #[serde(default)]
    pub code_before: String,
    #[serde(default)]
    pub code_after: String,
    #[serde(default)]
    pub explanation: String,
}

fn default_confidence() -> f64 {
    1.0
}

/// A single actionable diagnostic item. Value object; immutable after
/// creation, alive for one diagnosis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Sequential `CD-NNN` id, assigned after the final sort.
    #[serde(default)]
    pub id: String,
    pub severity: Severity,
    pub category: FindingCategory,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub line_start: u32,
    #[serde(default)]
    pub line_end: u32,
    #[serde(default)]
    pub function_name: String,
    #[serde(default)]
    pub suggested_fix: Option<SuggestedFix>,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    pub source: FindingSource,
}

/// Final deduplicated, severity-ranked diagnosis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisReport {
    pub findings: Vec<Finding>,
    pub critical_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    /// 0-100.
    pub health_score: f64,
    pub health_label: String,
    pub summary: String,
}

/// Per-language slice of the project inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub language: Language,
    pub files: Vec<PathBuf>,
    pub total_loc: usize,
    pub test_files: Vec<PathBuf>,
}

impl LanguageInfo {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            files: Vec::new(),
            total_loc: 0,
            test_files: Vec::new(),
        }
    }
}

/// Project inventory produced by the detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub root_path: PathBuf,
    pub name: String,
    pub languages: Vec<LanguageInfo>,
    pub total_files: usize,
    pub total_loc: usize,
}

//! Analysis engine
//!
//! Runs the metric analyzers over a detected project inventory. Work is
//! organized as one pass per language (extract, complexity, coverage), with
//! file extraction fanned out in parallel inside each pass. Nothing is
//! shared between in-flight passes; coupling, dead code, and the aggregate
//! report fields are computed once at the merge barrier after every pass
//! has finished.
//!
//! A file that cannot be read or parsed is logged and skipped; extraction
//! failures are never fatal to the run.

pub mod complexity;
pub mod coupling;
pub mod coverage;
pub mod dead_code;

use crate::config::AnalysisConfig;
use crate::extract;
use crate::models::{AnalysisReport, FunctionRecord, ModuleRecord, ProjectInfo};
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Everything the analysis phase produces: the raw records plus the
/// aggregated report built from them.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub functions: Vec<FunctionRecord>,
    pub modules: Vec<ModuleRecord>,
    pub report: AnalysisReport,
}

pub struct AnalysisEngine {
    config: AnalysisConfig,
}

impl AnalysisEngine {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Analyze the whole project inventory.
    pub fn run(&self, project: &ProjectInfo) -> AnalysisOutcome {
        let mut functions: Vec<FunctionRecord> = Vec::new();
        let mut modules: Vec<ModuleRecord> = Vec::new();
        let mut sources: Vec<(PathBuf, String)> = Vec::new();

        for language_info in &project.languages {
            let language = language_info.language;
            debug!(
                language = %language,
                files = language_info.files.len(),
                "analysis pass"
            );

            // Extraction is per-file independent; fan out.
            let extracted: Vec<(PathBuf, String, extract::FileExtraction)> = language_info
                .files
                .par_iter()
                .filter_map(|path| {
                    let content = match extract::read_source(path) {
                        Ok(c) => c,
                        Err(e) => {
                            warn!(path = %path.display(), error = %e, "skipping file");
                            return None;
                        }
                    };
                    match extract::extract_source(&content, path, language) {
                        Ok(extraction) => Some((path.clone(), content, extraction)),
                        Err(e) => {
                            warn!(path = %path.display(), error = %e, "extraction failed");
                            None
                        }
                    }
                })
                .collect();

            let mut pass_functions: Vec<FunctionRecord> = Vec::new();
            for (path, content, extraction) in extracted {
                modules.push(ModuleRecord {
                    file_path: path.clone(),
                    language,
                    loc: extraction.loc,
                    imports: extraction.imports,
                });
                for mut function in extraction.functions {
                    function.complexity = complexity::complexity_of(language, &function.body);
                    pass_functions.push(function);
                }
                sources.push((path, content));
            }

            // Coverage is scoped to this language's own test files.
            let test_contents: Vec<String> = language_info
                .test_files
                .iter()
                .filter_map(|path| match std::fs::read_to_string(path) {
                    Ok(c) => Some(c),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "skipping unreadable test file");
                        None
                    }
                })
                .collect();
            coverage::mark_tested(&mut pass_functions, &test_contents);

            functions.extend(pass_functions);
        }

        // Merge barrier: every per-language pass is done, whole-project
        // signals and aggregates are computed here exactly once.
        dead_code::mark_dead(&mut functions, &sources);
        let coupling_issues = coupling::coupling_issues(&modules, self.config.coupling_threshold);
        let report = self.aggregate(&functions, &modules, coupling_issues);

        AnalysisOutcome {
            functions,
            modules,
            report,
        }
    }

    fn aggregate(
        &self,
        functions: &[FunctionRecord],
        modules: &[ModuleRecord],
        coupling_issues: Vec<crate::models::CouplingIssue>,
    ) -> AnalysisReport {
        let total_functions = functions.len();
        let tested_function_count = functions.iter().filter(|f| f.is_tested).count();
        // Sums before ratios. Averaging per-language percentages would let
        // a tiny language slice swing the number.
        let estimated_coverage = if total_functions == 0 {
            0.0
        } else {
            tested_function_count as f64 / total_functions as f64 * 100.0
        };
        let average_complexity = if total_functions == 0 {
            0.0
        } else {
            functions.iter().map(|f| f.complexity as f64).sum::<f64>() / total_functions as f64
        };

        AnalysisReport {
            total_functions,
            tested_function_count,
            estimated_coverage,
            average_complexity,
            total_loc: modules.iter().map(|m| m.loc).sum(),
            high_complexity_functions: functions
                .iter()
                .filter(|f| f.complexity > self.config.complexity_threshold)
                .cloned()
                .collect(),
            untested_functions: functions.iter().filter(|f| !f.is_tested).cloned().collect(),
            dead_code_functions: functions.iter().filter(|f| f.is_dead).cloned().collect(),
            coupling_issues,
        }
    }
}

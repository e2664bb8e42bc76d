//! Diagnosis pipeline
//!
//! A linear state machine over the finding lifecycle:
//!
//! INIT -> RUN_STATIC -> RUN_SECURITY -> MERGE_EXTERNAL -> DEDUPE ->
//! RELATIVIZE_PATHS -> SORT_AND_ID -> SCORE -> DONE
//!
//! Every stage is best-effort over whatever findings exist; the only fatal
//! condition is an aggregation invariant violation at the end, since a
//! report with broken counts would score garbage.

pub mod security;
pub mod static_findings;

use crate::config::AnalysisConfig;
use crate::errors::CodediagError;
use crate::models::{AnalysisReport, DiagnosisReport, Finding, FindingSource, Severity};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Init,
    RunStatic,
    RunSecurity,
    MergeExternal,
    Dedupe,
    RelativizePaths,
    SortAndId,
    Score,
    Done,
}

impl Stage {
    fn name(self) -> &'static str {
        match self {
            Stage::Init => "init",
            Stage::RunStatic => "run_static",
            Stage::RunSecurity => "run_security",
            Stage::MergeExternal => "merge_external",
            Stage::Dedupe => "dedupe",
            Stage::RelativizePaths => "relativize_paths",
            Stage::SortAndId => "sort_and_id",
            Stage::Score => "score",
            Stage::Done => "done",
        }
    }
}

pub struct DiagnosisEngine {
    config: AnalysisConfig,
}

impl DiagnosisEngine {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Run the full pipeline. `external` carries findings from an outside
    /// reviewer, already shaped like ours; `None` skips the merge stage.
    pub fn diagnose(
        &self,
        project_root: &Path,
        analysis: &AnalysisReport,
        external: Option<Vec<Finding>>,
    ) -> Result<DiagnosisReport, CodediagError> {
        let mut stage = Stage::Init;
        if !(0.0..=100.0).contains(&analysis.estimated_coverage) {
            return Err(CodediagError::Diagnosis(format!(
                "estimated coverage {} outside [0, 100]",
                analysis.estimated_coverage
            )));
        }
        if analysis.tested_function_count > analysis.total_functions {
            return Err(CodediagError::Diagnosis(format!(
                "tested count {} exceeds total {}",
                analysis.tested_function_count, analysis.total_functions
            )));
        }
        let mut findings: Vec<Finding> = Vec::new();

        stage = self.advance(stage, Stage::RunStatic);
        findings.extend(static_findings::synthesize(analysis, &self.config));

        stage = self.advance(stage, Stage::RunSecurity);
        findings.extend(security::scan_for_secrets(project_root));

        if let Some(external) = external {
            stage = self.advance(stage, Stage::MergeExternal);
            let before = external.len();
            let accepted: Vec<Finding> = external
                .into_iter()
                .filter(|f| {
                    f.source != FindingSource::Ai
                        || f.confidence >= self.config.min_finding_confidence
                })
                .collect();
            debug!(
                accepted = accepted.len(),
                rejected = before - accepted.len(),
                "external findings merged"
            );
            findings.extend(accepted);
        }

        stage = self.advance(stage, Stage::Dedupe);
        let mut findings = deduplicate(findings, project_root);

        stage = self.advance(stage, Stage::RelativizePaths);
        for finding in &mut findings {
            finding.file_path = relativize(&finding.file_path, project_root);
        }

        stage = self.advance(stage, Stage::SortAndId);
        findings.sort_by(|a, b| {
            a.severity
                .cmp(&b.severity)
                .then_with(|| a.file_path.cmp(&b.file_path))
                .then_with(|| a.line_start.cmp(&b.line_start))
        });
        for (idx, finding) in findings.iter_mut().enumerate() {
            finding.id = format!("CD-{:03}", idx + 1);
        }

        stage = self.advance(stage, Stage::Score);
        let critical_count = findings.iter().filter(|f| f.severity == Severity::Critical).count();
        let warning_count = findings.iter().filter(|f| f.severity == Severity::Warning).count();
        let info_count = findings.iter().filter(|f| f.severity == Severity::Info).count();
        let health_score = health_score(
            critical_count,
            warning_count,
            info_count,
            analysis.estimated_coverage,
        );
        let health_label = health_label(health_score).to_string();
        let summary = summarize(&findings, critical_count, warning_count, info_count);

        let report = DiagnosisReport {
            findings,
            critical_count,
            warning_count,
            info_count,
            health_score,
            health_label,
            summary,
        };
        validate(&report)?;

        self.advance(stage, Stage::Done);
        Ok(report)
    }

    fn advance(&self, from: Stage, to: Stage) -> Stage {
        debug!(from = from.name(), to = to.name(), "diagnosis stage");
        to
    }
}

/// A cluster of duplicates sharing a file and category. The window spans
/// every absorbed member, so chains like lines 10/12/14 collapse even when
/// the endpoints are more than three lines apart.
struct Cluster {
    representative: Finding,
    path: String,
    line_min: u32,
    line_max: u32,
}

/// Two findings are duplicates when they target the same file and category
/// within three lines of each other (transitively). The highest-confidence
/// member of a cluster survives; on a confidence tie the more severe one
/// does.
fn deduplicate(findings: Vec<Finding>, project_root: &Path) -> Vec<Finding> {
    let mut clusters: Vec<Cluster> = Vec::new();
    for candidate in findings {
        let candidate_path = relativize(&candidate.file_path, project_root);
        let line = candidate.line_start;
        let slot = clusters.iter().position(|cluster| {
            cluster.path == candidate_path
                && cluster.representative.category == candidate.category
                && line.saturating_add(3) >= cluster.line_min
                && line <= cluster.line_max.saturating_add(3)
        });
        match slot {
            Some(idx) => {
                let cluster = &mut clusters[idx];
                cluster.line_min = cluster.line_min.min(line);
                cluster.line_max = cluster.line_max.max(line);
                if wins_over(&candidate, &cluster.representative) {
                    cluster.representative = candidate;
                }
            }
            None => clusters.push(Cluster {
                representative: candidate,
                path: candidate_path,
                line_min: line,
                line_max: line,
            }),
        }
    }
    clusters.into_iter().map(|c| c.representative).collect()
}

fn wins_over(candidate: &Finding, existing: &Finding) -> bool {
    if candidate.confidence != existing.confidence {
        return candidate.confidence > existing.confidence;
    }
    // Severity declaration order is most-severe-first.
    candidate.severity < existing.severity
}

/// Make a path relative to the project root, with forward slashes. Paths
/// from outside the root pass through unchanged.
fn relativize(path: &str, project_root: &Path) -> String {
    let normalized = path.replace('\\', "/");
    let root = project_root.to_string_lossy().replace('\\', "/");
    let root = root.trim_end_matches('/');
    if root.is_empty() {
        return normalized;
    }
    match normalized.strip_prefix(root) {
        Some(rest) => rest.trim_start_matches('/').to_string(),
        None => normalized,
    }
}

/// Start from 100 and subtract capped penalties per severity plus a
/// coverage shortfall term, clamped to [0, 100].
fn health_score(critical: usize, warning: usize, info: usize, estimated_coverage: f64) -> f64 {
    let mut score = 100.0;
    score -= (10.0 * critical as f64).min(40.0);
    score -= (3.0 * warning as f64).min(30.0);
    score -= (1.0 * info as f64).min(10.0);
    score -= (1.0 - estimated_coverage / 100.0) * 15.0;
    score.clamp(0.0, 100.0)
}

fn health_label(score: f64) -> &'static str {
    if score >= 80.0 {
        "healthy"
    } else if score >= 60.0 {
        "moderate"
    } else if score >= 40.0 {
        "at-risk"
    } else {
        "critical"
    }
}

fn summarize(findings: &[Finding], critical: usize, warning: usize, info: usize) -> String {
    let mut parts: Vec<String> = Vec::new();
    if critical > 0 {
        parts.push(format!(
            "{critical} critical issue{}",
            if critical > 1 { "s" } else { "" }
        ));
    }
    if warning > 0 {
        parts.push(format!(
            "{warning} warning{}",
            if warning > 1 { "s" } else { "" }
        ));
    }
    if info > 0 {
        parts.push(format!("{info} note{}", if info > 1 { "s" } else { "" }));
    }
    if parts.is_empty() {
        return "No issues found. Code looks healthy.".to_string();
    }

    let mut summary = parts.join(", ") + ".";
    if let Some(top) = findings.iter().find(|f| f.severity == Severity::Critical) {
        if !top.file_path.is_empty() && top.line_start > 0 {
            summary.push_str(&format!(
                " Top priority: {} at {}:{}.",
                top.title, top.file_path, top.line_start
            ));
        }
    }
    summary
}

/// Aggregation invariants. A report that fails any of these would score
/// and render nonsense, so the run aborts.
fn validate(report: &DiagnosisReport) -> Result<(), CodediagError> {
    let counted = report.critical_count + report.warning_count + report.info_count;
    if counted != report.findings.len() {
        return Err(CodediagError::Diagnosis(format!(
            "severity counts ({counted}) do not sum to finding count ({})",
            report.findings.len()
        )));
    }
    if !(0.0..=100.0).contains(&report.health_score) {
        return Err(CodediagError::Diagnosis(format!(
            "health score {} outside [0, 100]",
            report.health_score
        )));
    }
    for (idx, finding) in report.findings.iter().enumerate() {
        let expected = format!("CD-{:03}", idx + 1);
        if finding.id != expected {
            return Err(CodediagError::Diagnosis(format!(
                "finding id {} at position {idx}, expected {expected}",
                finding.id
            )));
        }
    }
    Ok(())
}

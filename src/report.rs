//! Report rendering
//!
//! Terminal output with styling plus pretty-printed JSON for machine
//! consumption. Both renderers return a string; the caller decides where
//! it goes.

use crate::models::{AnalysisReport, DiagnosisReport, ProjectInfo, Severity};
use anyhow::Result;
use console::style;
use serde::Serialize;

/// Combined payload for JSON emission.
#[derive(Serialize)]
struct FullReport<'a> {
    project: &'a ProjectInfo,
    analysis: &'a AnalysisReport,
    diagnosis: &'a DiagnosisReport,
}

/// Render as pretty-printed JSON.
pub fn render_json(
    project: &ProjectInfo,
    analysis: &AnalysisReport,
    diagnosis: &DiagnosisReport,
) -> Result<String> {
    Ok(serde_json::to_string_pretty(&FullReport {
        project,
        analysis,
        diagnosis,
    })?)
}

const MAX_FINDINGS_SHOWN: usize = 20;

fn severity_tag(severity: Severity) -> console::StyledObject<&'static str> {
    match severity {
        Severity::Critical => style("[CRIT]").red().bold(),
        Severity::Warning => style("[WARN]").yellow(),
        Severity::Info => style("[INFO]").dim(),
    }
}

fn score_styled(score: f64, label: &str) -> console::StyledObject<String> {
    let text = format!("{score:.1}/100 ({label})");
    if score >= 80.0 {
        style(text).green().bold()
    } else if score >= 60.0 {
        style(text).yellow().bold()
    } else {
        style(text).red().bold()
    }
}

/// Render as formatted terminal output.
pub fn render_text(
    project: &ProjectInfo,
    analysis: &AnalysisReport,
    diagnosis: &DiagnosisReport,
) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "\n{} {}\n",
        style("codediag").bold(),
        style(&project.name).cyan()
    ));
    out.push_str(&format!("{}\n", style("─".repeat(46)).dim()));
    out.push_str(&format!(
        "Health: {}\n",
        score_styled(diagnosis.health_score, &diagnosis.health_label)
    ));
    out.push_str(&format!(
        "Files: {}  Functions: {}  LOC: {}\n",
        project.total_files, analysis.total_functions, analysis.total_loc
    ));
    out.push_str(&format!(
        "Coverage (estimated): {:.1}%  Avg complexity: {:.1}\n",
        analysis.estimated_coverage, analysis.average_complexity
    ));

    let languages: Vec<String> = project
        .languages
        .iter()
        .map(|l| format!("{} ({} files)", l.language, l.files.len() + l.test_files.len()))
        .collect();
    if !languages.is_empty() {
        out.push_str(&format!("Languages: {}\n", languages.join(", ")));
    }

    out.push_str(&format!(
        "\n{} ({} total: {} critical, {} warning, {} info)\n",
        style("FINDINGS").bold(),
        diagnosis.findings.len(),
        diagnosis.critical_count,
        diagnosis.warning_count,
        diagnosis.info_count
    ));

    for finding in diagnosis.findings.iter().take(MAX_FINDINGS_SHOWN) {
        let location = if finding.file_path.is_empty() {
            String::new()
        } else {
            format!("  {}", style(format!("{}:{}", finding.file_path, finding.line_start)).dim())
        };
        out.push_str(&format!(
            "  {} {} {}{}\n",
            style(&finding.id).dim(),
            severity_tag(finding.severity),
            finding.title,
            location
        ));
    }
    if diagnosis.findings.len() > MAX_FINDINGS_SHOWN {
        out.push_str(&format!(
            "  {} more not shown\n",
            diagnosis.findings.len() - MAX_FINDINGS_SHOWN
        ));
    }

    out.push_str(&format!("\n{}\n", diagnosis.summary));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Finding, FindingCategory, FindingSource, LanguageInfo, Language};
    use std::path::PathBuf;

    fn fixture() -> (ProjectInfo, AnalysisReport, DiagnosisReport) {
        let project = ProjectInfo {
            root_path: PathBuf::from("/proj"),
            name: "proj".to_string(),
            languages: vec![LanguageInfo::new(Language::Python)],
            total_files: 3,
            total_loc: 120,
        };
        let analysis = AnalysisReport {
            total_functions: 10,
            tested_function_count: 4,
            estimated_coverage: 40.0,
            average_complexity: 3.2,
            total_loc: 120,
            ..AnalysisReport::default()
        };
        let diagnosis = DiagnosisReport {
            findings: vec![Finding {
                id: "CD-001".to_string(),
                severity: Severity::Critical,
                category: FindingCategory::Security,
                title: "Hardcoded API key in settings.py:3".to_string(),
                description: String::new(),
                file_path: "settings.py".to_string(),
                line_start: 3,
                line_end: 3,
                function_name: String::new(),
                suggested_fix: None,
                confidence: 0.85,
                source: FindingSource::Security,
            }],
            critical_count: 1,
            warning_count: 0,
            info_count: 0,
            health_score: 81.0,
            health_label: "healthy".to_string(),
            summary: "1 critical issue.".to_string(),
        };
        (project, analysis, diagnosis)
    }

    #[test]
    fn test_text_render_includes_findings_and_score() {
        let (project, analysis, diagnosis) = fixture();
        let out = render_text(&project, &analysis, &diagnosis);
        assert!(out.contains("CD-001"));
        assert!(out.contains("Hardcoded API key"));
        assert!(out.contains("81.0/100"));
        assert!(out.contains("40.0%"));
    }

    #[test]
    fn test_json_render_is_valid_and_complete() {
        let (project, analysis, diagnosis) = fixture();
        let out = render_json(&project, &analysis, &diagnosis).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["project"]["name"], "proj");
        assert_eq!(parsed["analysis"]["total_functions"], 10);
        assert_eq!(parsed["diagnosis"]["findings"][0]["id"], "CD-001");
        assert_eq!(parsed["diagnosis"]["health_label"], "healthy");
    }
}

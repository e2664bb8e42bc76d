//! Static finding synthesizer
//!
//! Deterministic mapping from analysis results to findings, one finding per
//! flagged item. Running it twice over the same report yields the same
//! findings; there is no sampling and no state.

use crate::analyze::complexity::{COMPLEXITY_HIGH, COMPLEXITY_LOW};
use crate::config::AnalysisConfig;
use crate::models::{
    AnalysisReport, Finding, FindingCategory, FindingSource, FunctionRecord, Severity,
    SuggestedFix,
};

/// Synthesize findings from the aggregated analysis report.
pub fn synthesize(report: &AnalysisReport, config: &AnalysisConfig) -> Vec<Finding> {
    let mut findings = Vec::new();

    for function in &report.high_complexity_functions {
        findings.push(complexity_finding(function, config.complexity_threshold));
    }

    for function in &report.dead_code_functions {
        findings.push(dead_code_finding(function));
    }

    for issue in &report.coupling_issues {
        findings.push(Finding {
            id: String::new(),
            severity: Severity::Warning,
            category: FindingCategory::Coupling,
            title: format!(
                "Highly coupled module {} (degree {})",
                issue.module_path.display(),
                issue.degree()
            ),
            description: format!(
                "This module imports {} other modules and is imported by {}. Changes here ripple widely; consider splitting responsibilities or introducing an interface boundary.",
                issue.imports_out, issue.imported_by
            ),
            file_path: issue.module_path.to_string_lossy().into_owned(),
            line_start: 1,
            line_end: 1,
            function_name: String::new(),
            suggested_fix: None,
            confidence: 0.9,
            source: FindingSource::Static,
        });
    }

    for function in &report.untested_functions {
        findings.push(missing_tests_finding(function));
    }

    findings
}

fn complexity_finding(function: &FunctionRecord, threshold: u32) -> Finding {
    // Above 20 the function is genuinely hard to reason about, so the
    // severity escalates; anything past 50 lands here too.
    let severity = if function.complexity > COMPLEXITY_HIGH {
        Severity::Critical
    } else {
        Severity::Warning
    };
    Finding {
        id: String::new(),
        severity,
        category: FindingCategory::Complexity,
        title: format!(
            "High complexity in {} (CC {})",
            function.qualified_name, function.complexity
        ),
        description: format!(
            "Cyclomatic complexity is {}, above the threshold of {}. Each decision point multiplies the paths a reader and a test suite must cover.",
            function.complexity, threshold
        ),
        file_path: function.file_path.to_string_lossy().into_owned(),
        line_start: function.line_start,
        line_end: function.line_end,
        function_name: function.qualified_name.clone(),
        suggested_fix: Some(SuggestedFix {
            description: "Extract independent branches into helper functions".to_string(),
            ..SuggestedFix::default()
        }),
        confidence: 1.0,
        source: FindingSource::Static,
    }
}

fn dead_code_finding(function: &FunctionRecord) -> Finding {
    // An unused exported symbol is a stronger claim than an unused private
    // helper, so it gets the louder severity.
    let severity = if function.is_public {
        Severity::Warning
    } else {
        Severity::Info
    };
    Finding {
        id: String::new(),
        severity,
        category: FindingCategory::DeadCode,
        title: format!("Unreferenced function {}", function.qualified_name),
        description: format!(
            "No call sites for `{}` were found in non-test source. If it is part of a published API, document it; otherwise remove it.",
            function.name
        ),
        file_path: function.file_path.to_string_lossy().into_owned(),
        line_start: function.line_start,
        line_end: function.line_end,
        function_name: function.qualified_name.clone(),
        suggested_fix: None,
        confidence: 0.8,
        source: FindingSource::Static,
    }
}

fn missing_tests_finding(function: &FunctionRecord) -> Finding {
    let critical_surface = function.is_public && function.complexity > COMPLEXITY_LOW;
    Finding {
        id: String::new(),
        severity: if critical_surface {
            Severity::Warning
        } else {
            Severity::Info
        },
        category: FindingCategory::MissingTests,
        title: format!("No test coverage for {}", function.qualified_name),
        description: if critical_surface {
            format!(
                "`{}` is public with cyclomatic complexity {} and no test references it. Untested branching on a public surface is where regressions hide.",
                function.name, function.complexity
            )
        } else {
            format!("No test references `{}`.", function.name)
        },
        file_path: function.file_path.to_string_lossy().into_owned(),
        line_start: function.line_start,
        line_end: function.line_end,
        function_name: function.qualified_name.clone(),
        suggested_fix: None,
        confidence: 0.7,
        source: FindingSource::Static,
    }
}

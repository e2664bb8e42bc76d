//! Go extractor (line-pattern heuristics)

use crate::extract::{block_end_line, body_for_span, line_at, FileExtraction};
use crate::models::{FunctionRecord, Language};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

static FUNC_PATTERN: OnceLock<Regex> = OnceLock::new();
static IMPORT_LINE: OnceLock<Regex> = OnceLock::new();

pub(crate) fn extract(source: &str, path: &Path) -> FileExtraction {
    let func_re = FUNC_PATTERN
        .get_or_init(|| Regex::new(r"(?m)^func\s+(?:\([^)]*\)\s+)?(\w+)\s*\(").unwrap());

    let mut extraction = FileExtraction::default();

    for caps in func_re.captures_iter(source) {
        let name = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        if name.is_empty() {
            continue;
        }
        let whole = caps.get(0).unwrap();
        let line_start = line_at(source, whole.start());
        let line_end = block_end_line(source, whole.end().saturating_sub(1), line_start);

        extraction.functions.push(FunctionRecord {
            name: name.to_string(),
            qualified_name: name.to_string(),
            file_path: path.to_path_buf(),
            language: Language::Go,
            line_start,
            line_end,
            body: body_for_span(source, line_start, line_end),
            complexity: 1,
            // Exported identifiers start with an uppercase letter.
            is_public: name.chars().next().is_some_and(|c| c.is_uppercase()),
            is_tested: false,
            is_dead: false,
            fan_in: 0,
            fan_out: 0,
        });
    }

    extraction.imports = parse_imports(source);
    extraction
}

/// Handles both `import "x"` and grouped `import ( ... )` blocks.
fn parse_imports(source: &str) -> Vec<String> {
    let quoted =
        IMPORT_LINE.get_or_init(|| Regex::new(r#""([\w./\-]+)""#).unwrap());

    let mut imports = Vec::new();
    let mut in_block = false;
    for line in source.lines() {
        let trimmed = line.trim();
        if in_block {
            if trimmed.starts_with(')') {
                in_block = false;
                continue;
            }
            if let Some(caps) = quoted.captures(trimmed) {
                imports.push(caps[1].to_string());
            }
        } else if trimmed.starts_with("import (") {
            in_block = true;
        } else if trimmed.starts_with("import ") {
            if let Some(caps) = quoted.captures(trimmed) {
                imports.push(caps[1].to_string());
            }
        }
    }
    imports
}

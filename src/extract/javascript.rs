//! JavaScript/TypeScript extractor (line-pattern heuristics)

use crate::extract::{block_end_line, body_for_span, line_at, FileExtraction};
use crate::models::{FunctionRecord, Language};
use regex::Regex;
use rustc_hash::FxHashSet;
use std::path::Path;
use std::sync::OnceLock;

static FUNCTION_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
static IMPORT_PATTERN: OnceLock<Regex> = OnceLock::new();
static REQUIRE_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Names a header pattern can capture that are control flow, not functions.
const RESERVED: &[&str] = &[
    "if", "for", "while", "switch", "catch", "function", "return", "constructor",
];

fn function_patterns() -> &'static Vec<Regex> {
    FUNCTION_PATTERNS.get_or_init(|| {
        vec![
            // function name(params) {  /  export async function name(...)
            Regex::new(r"(?m)^\s*(?:export\s+)?(?:default\s+)?(?:async\s+)?function\s*\*?\s*(\w+)\s*\(")
                .unwrap(),
            // const name = (params) =>  /  let name = async (...) =>
            Regex::new(
                r"(?m)^\s*(?:export\s+)?(?:const|let|var)\s+(\w+)\s*=\s*(?:async\s+)?\([^)\n]*\)\s*(?::\s*[^=\n]+)?=>",
            )
            .unwrap(),
            // class methods: indented name(params) {
            Regex::new(r"(?m)^\s+(?:async\s+)?(\w+)\s*\([^)\n]*\)\s*\{").unwrap(),
        ]
    })
}

pub(crate) fn extract(source: &str, path: &Path, language: Language) -> FileExtraction {
    let mut extraction = FileExtraction::default();
    let mut seen: FxHashSet<String> = FxHashSet::default();

    for pattern in function_patterns() {
        for caps in pattern.captures_iter(source) {
            let name = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            if name.is_empty() || RESERVED.contains(&name) || !seen.insert(name.to_string()) {
                continue;
            }
            let whole = caps.get(0).unwrap();
            let line_start = line_at(source, whole.start());
            let line_end = block_end_line(source, whole.end().saturating_sub(1), line_start);

            extraction.functions.push(FunctionRecord {
                name: name.to_string(),
                qualified_name: name.to_string(),
                file_path: path.to_path_buf(),
                language,
                line_start,
                line_end,
                body: body_for_span(source, line_start, line_end),
                complexity: 1,
                is_public: !name.starts_with('_'),
                is_tested: false,
                is_dead: false,
                fan_in: 0,
                fan_out: 0,
            });
        }
    }

    let import_re = IMPORT_PATTERN.get_or_init(|| {
        Regex::new(r#"(?m)import\s+[^;'"]*?from\s+['"]([^'"]+)['"]|^\s*import\s+['"]([^'"]+)['"]"#)
            .unwrap()
    });
    let require_re = REQUIRE_PATTERN
        .get_or_init(|| Regex::new(r#"require\s*\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap());

    for caps in import_re.captures_iter(source) {
        if let Some(m) = caps.get(1).or_else(|| caps.get(2)) {
            extraction.imports.push(m.as_str().to_string());
        }
    }
    for caps in require_re.captures_iter(source) {
        if let Some(m) = caps.get(1) {
            extraction.imports.push(m.as_str().to_string());
        }
    }

    extraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn extract_js(source: &str) -> FileExtraction {
        extract(source, &PathBuf::from("app.js"), Language::JavaScript)
    }

    #[test]
    fn test_function_declaration_with_accurate_span() {
        let source = "function handle(req) {\n  if (req.ok) {\n    return 1;\n  }\n  return 0;\n}\n";
        let result = extract_js(source);
        assert_eq!(result.functions.len(), 1);
        assert_eq!(result.functions[0].name, "handle");
        assert_eq!(result.functions[0].line_start, 1);
        assert_eq!(result.functions[0].line_end, 6);
    }

    #[test]
    fn test_arrow_function() {
        let source = "export const sum = (a, b) => {\n  return a + b;\n};\n";
        let result = extract_js(source);
        assert_eq!(result.functions.len(), 1);
        assert_eq!(result.functions[0].name, "sum");
        assert_eq!(result.functions[0].line_end, 3);
    }

    #[test]
    fn test_class_method_and_keyword_filter() {
        let source = "class Api {\n  fetchUser(id) {\n    return this.get(id);\n  }\n}\nif (x) {\n  y();\n}\n";
        let result = extract_js(source);
        let names: Vec<&str> = result.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["fetchUser"]);
    }

    #[test]
    fn test_imports_and_requires() {
        let source = "import fs from 'fs';\nimport { x } from './util';\nconst path = require('path');\n";
        let result = extract_js(source);
        assert!(result.imports.contains(&"fs".to_string()));
        assert!(result.imports.contains(&"./util".to_string()));
        assert!(result.imports.contains(&"path".to_string()));
    }

    #[test]
    fn test_duplicate_names_collapse() {
        let source = "function go() {}\nconst go = () => {};\n";
        let result = extract_js(source);
        assert_eq!(result.functions.len(), 1);
    }
}

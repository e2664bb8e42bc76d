//! C# extractor (line-pattern heuristics)

use crate::extract::{block_end_line, body_for_span, line_at, FileExtraction};
use crate::models::{FunctionRecord, Language};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

static METHOD_PATTERN: OnceLock<Regex> = OnceLock::new();
static USING_PATTERN: OnceLock<Regex> = OnceLock::new();

const RESERVED: &[&str] = &[
    "if", "for", "foreach", "while", "switch", "catch", "class", "namespace", "new", "return",
];

pub(crate) fn extract(source: &str, path: &Path) -> FileExtraction {
    let method_re = METHOD_PATTERN.get_or_init(|| {
        Regex::new(
            r"(?m)(public|private|protected|internal)\s+(?:(?:static|async|virtual|override|sealed|partial)\s+)*(?:[\w<>\[\],?]+)\s+(\w+)\s*\(([^)]*)\)",
        )
        .unwrap()
    });
    let using_re =
        USING_PATTERN.get_or_init(|| Regex::new(r"(?m)^using\s+([\w.]+)\s*;").unwrap());

    let mut extraction = FileExtraction::default();

    for caps in method_re.captures_iter(source) {
        let name = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        if name.is_empty() || RESERVED.contains(&name) {
            continue;
        }
        let whole = caps.get(0).unwrap();
        let line_start = line_at(source, whole.start());
        let line_end = block_end_line(source, whole.end(), line_start);

        extraction.functions.push(FunctionRecord {
            name: name.to_string(),
            qualified_name: name.to_string(),
            file_path: path.to_path_buf(),
            language: Language::CSharp,
            line_start,
            line_end,
            body: body_for_span(source, line_start, line_end),
            complexity: 1,
            is_public: caps.get(1).map(|m| m.as_str()) == Some("public"),
            is_tested: false,
            is_dead: false,
            fan_in: 0,
            fan_out: 0,
        });
    }

    for caps in using_re.captures_iter(source) {
        extraction.imports.push(caps[1].to_string());
    }

    extraction
}

//! Java extractor (line-pattern heuristics)

use crate::extract::{block_end_line, body_for_span, line_at, FileExtraction};
use crate::models::{FunctionRecord, Language};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

static METHOD_PATTERN: OnceLock<Regex> = OnceLock::new();
static IMPORT_PATTERN: OnceLock<Regex> = OnceLock::new();

const RESERVED: &[&str] = &["if", "for", "while", "switch", "catch", "class", "new", "return"];

pub(crate) fn extract(source: &str, path: &Path) -> FileExtraction {
    let method_re = METHOD_PATTERN.get_or_init(|| {
        Regex::new(
            r"(?m)(?:public|private|protected)?\s*(?:static\s+)?(?:final\s+)?(?:synchronized\s+)?(?:\w+(?:<[^>]+>)?)\s+(\w+)\s*\(([^)]*)\)\s*(?:throws\s+[\w,\s]+)?\s*\{",
        )
        .unwrap()
    });
    let import_re =
        IMPORT_PATTERN.get_or_init(|| Regex::new(r"(?m)^import\s+(?:static\s+)?([\w.]+);").unwrap());

    let mut extraction = FileExtraction::default();

    for caps in method_re.captures_iter(source) {
        let name = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        if name.is_empty() || RESERVED.contains(&name) {
            continue;
        }
        let whole = caps.get(0).unwrap();
        let line_start = line_at(source, whole.start());
        let line_end = block_end_line(source, whole.end().saturating_sub(1), line_start);

        // The leftmost match starts at the visibility modifier when one is
        // present.
        let header = whole.as_str();
        let is_public = header.starts_with("public") || header.starts_with("protected");

        extraction.functions.push(FunctionRecord {
            name: name.to_string(),
            qualified_name: name.to_string(),
            file_path: path.to_path_buf(),
            language: Language::Java,
            line_start,
            line_end,
            body: body_for_span(source, line_start, line_end),
            complexity: 1,
            is_public,
            is_tested: false,
            is_dead: false,
            fan_in: 0,
            fan_out: 0,
        });
    }

    for caps in import_re.captures_iter(source) {
        extraction.imports.push(caps[1].to_string());
    }

    extraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn extract_java(source: &str) -> FileExtraction {
        extract(source, &PathBuf::from("Service.java"))
    }

    #[test]
    fn test_public_and_private_methods() {
        let source = "public class Service {\n    public int charge(int amount) {\n        return amount;\n    }\n\n    private void log(String msg) {\n        System.out.println(msg);\n    }\n}\n";
        let result = extract_java(source);
        assert_eq!(result.functions.len(), 2);
        assert_eq!(result.functions[0].name, "charge");
        assert!(result.functions[0].is_public);
        assert_eq!(result.functions[0].line_end, 4);
        assert!(!result.functions[1].is_public);
    }

    #[test]
    fn test_control_flow_is_not_a_method() {
        let source = "public class A {\n    void run() {\n        if (ready) {\n            go();\n        }\n    }\n}\n";
        let result = extract_java(source);
        let names: Vec<&str> = result.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["run"]);
    }

    #[test]
    fn test_imports() {
        let source = "import java.util.List;\nimport static org.junit.Assert.assertEquals;\n";
        let result = extract_java(source);
        assert_eq!(
            result.imports,
            vec!["java.util.List", "org.junit.Assert.assertEquals"]
        );
    }
}

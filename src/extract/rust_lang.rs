//! Rust extractor (line-pattern heuristics)

use crate::extract::{block_end_line, body_for_span, line_at, FileExtraction};
use crate::models::{FunctionRecord, Language};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

static FN_PATTERN: OnceLock<Regex> = OnceLock::new();
static USE_PATTERN: OnceLock<Regex> = OnceLock::new();

pub(crate) fn extract(source: &str, path: &Path) -> FileExtraction {
    let fn_re = FN_PATTERN.get_or_init(|| {
        Regex::new(
            r#"(?m)^\s*(pub(?:\([^)]*\))?\s+)?(?:async\s+)?(?:unsafe\s+)?(?:extern\s+"[^"]*"\s+)?fn\s+(\w+)"#,
        )
        .unwrap()
    });
    let use_re =
        USE_PATTERN.get_or_init(|| Regex::new(r"(?m)^\s*(?:pub\s+)?use\s+([A-Za-z0-9_:]+)").unwrap());

    let mut extraction = FileExtraction::default();

    for caps in fn_re.captures_iter(source) {
        let name = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        if name.is_empty() {
            continue;
        }
        let whole = caps.get(0).unwrap();
        let line_start = line_at(source, whole.start());
        let line_end = block_end_line(source, whole.end(), line_start);

        extraction.functions.push(FunctionRecord {
            name: name.to_string(),
            qualified_name: name.to_string(),
            file_path: path.to_path_buf(),
            language: Language::Rust,
            line_start,
            line_end,
            body: body_for_span(source, line_start, line_end),
            complexity: 1,
            is_public: caps.get(1).is_some(),
            is_tested: false,
            is_dead: false,
            fan_in: 0,
            fan_out: 0,
        });
    }

    for caps in use_re.captures_iter(source) {
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

    fn extract_rs(source: &str) -> FileExtraction {
        extract(source, &PathBuf::from("lib.rs"))
    }

    #[test]
    fn test_pub_and_private_functions() {
        let source = "pub fn encode(input: &str) -> String {\n    input.to_string()\n}\n\nfn helper() {\n    ()\n}\n";
        let result = extract_rs(source);
        assert_eq!(result.functions.len(), 2);
        assert!(result.functions[0].is_public);
        assert_eq!(result.functions[0].line_end, 3);
        assert!(!result.functions[1].is_public);
    }

    #[test]
    fn test_pub_crate_and_async() {
        let source = "pub(crate) async fn run(cfg: &Config) -> Result<()> {\n    Ok(())\n}\n";
        let result = extract_rs(source);
        assert_eq!(result.functions.len(), 1);
        assert_eq!(result.functions[0].name, "run");
        assert!(result.functions[0].is_public);
    }

    #[test]
    fn test_generic_function_span_covers_nested_blocks() {
        let source = "fn pick<T>(items: &[T]) -> Option<&T> {\n    if items.is_empty() {\n        None\n    } else {\n        items.first()\n    }\n}\n";
        let result = extract_rs(source);
        assert_eq!(result.functions[0].line_end, 7);
    }

    #[test]
    fn test_use_imports() {
        let source = "use std::collections::HashMap;\npub use crate::models::Finding;\n";
        let result = extract_rs(source);
        assert_eq!(
            result.imports,
            vec!["std::collections::HashMap", "crate::models::Finding"]
        );
    }
}

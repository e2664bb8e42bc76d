//! Per-language function extractors
//!
//! Each extractor turns one source file into a uniform set of
//! [`FunctionRecord`]s plus the file's import list. Python gets a structural
//! tree-sitter parse; the other languages use line-pattern heuristics with
//! brace-balanced end recovery so line spans stay accurate.

mod csharp;
mod go;
mod java;
mod javascript;
pub mod python;
mod rust_lang;

use crate::errors::CodediagError;
use crate::models::{FunctionRecord, Language};
use std::path::Path;

/// Directory names that hold test code, not production source.
pub const TEST_DIR_NAMES: &[&str] = &["tests", "test", "__tests__", "spec", "specs"];

/// Result of extracting one source file.
#[derive(Debug, Default, Clone)]
pub struct FileExtraction {
    pub functions: Vec<FunctionRecord>,
    pub imports: Vec<String>,
    pub loc: usize,
}

/// Read a source file, rejecting binary content.
///
/// Unreadable and binary files yield a [`CodediagError::Extraction`];
/// callers skip those and continue.
pub fn read_source(path: &Path) -> Result<String, CodediagError> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| CodediagError::extraction(path, e.to_string()))?;
    if source.contains('\0') {
        return Err(CodediagError::extraction(path, "binary file"));
    }
    Ok(source)
}

/// Extract from already-read source text. Dispatch is a fixed lookup from
/// language tag to implementation.
pub fn extract_source(
    source: &str,
    path: &Path,
    language: Language,
) -> Result<FileExtraction, CodediagError> {
    let mut extraction = match language {
        Language::Python => python::extract(source, path)?,
        Language::JavaScript | Language::TypeScript => javascript::extract(source, path, language),
        Language::Rust => rust_lang::extract(source, path),
        Language::Go => go::extract(source, path),
        Language::Java => java::extract(source, path),
        Language::CSharp => csharp::extract(source, path),
    };
    extraction.loc = source.lines().count();
    Ok(extraction)
}

/// Whether any directory segment of `path` is a recognized test directory.
///
/// Safety net: files under these directories never enter source extraction,
/// so test helpers cannot pollute the untested-function results.
pub fn is_in_test_dir(path: &Path) -> bool {
    let mut components: Vec<&str> = path
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .collect();
    // The filename itself is not a directory segment.
    components.pop();
    components
        .iter()
        .any(|segment| TEST_DIR_NAMES.contains(&segment.to_lowercase().as_str()))
}

/// Per-language test-file naming conventions.
pub fn is_test_file(path: &Path, language: Language) -> bool {
    if is_in_test_dir(path) {
        return true;
    }
    let file_name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name.to_lowercase(),
        None => return false,
    };
    let stem = file_name
        .rsplit_once('.')
        .map(|(s, _)| s)
        .unwrap_or(&file_name);
    match language {
        Language::Python => file_name.starts_with("test_") || stem.ends_with("_test"),
        Language::JavaScript | Language::TypeScript => {
            stem.ends_with(".test") || stem.ends_with(".spec")
        }
        Language::Go => stem.ends_with("_test"),
        Language::Java => {
            stem.ends_with("test") || stem.ends_with("tests") || stem.ends_with("spec")
        }
        Language::CSharp => stem.ends_with("test") || stem.ends_with("tests"),
        // Rust tests are inline or under tests/, which the dir check covers.
        Language::Rust => false,
    }
}

/// 1-based line number of a byte offset.
pub(crate) fn line_at(source: &str, byte_offset: usize) -> u32 {
    source[..byte_offset.min(source.len())]
        .bytes()
        .filter(|&b| b == b'\n')
        .count() as u32
        + 1
}

/// Find the closing line of a brace-delimited block whose header ends at
/// `header_end`. Returns the header line when no block opens nearby
/// (abstract methods, expression-bodied arrows).
pub(crate) fn block_end_line(source: &str, header_end: usize, header_line: u32) -> u32 {
    let bytes = source.as_bytes();
    let mut i = header_end;
    // The opening brace should appear shortly after the signature.
    let open_limit = (header_end + 160).min(bytes.len());
    while i < open_limit && bytes[i] != b'{' {
        if bytes[i] == b';' {
            return header_line;
        }
        i += 1;
    }
    if i >= open_limit || bytes[i] != b'{' {
        return header_line;
    }
    let mut depth = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return line_at(source, i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    // Unbalanced file; fall back to the last line.
    source.lines().count() as u32
}

/// Slice the body text for an inclusive 1-based line span.
pub(crate) fn body_for_span(source: &str, line_start: u32, line_end: u32) -> String {
    source
        .lines()
        .skip(line_start.saturating_sub(1) as usize)
        .take((line_end.saturating_sub(line_start) + 1) as usize)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_test_dir_detection() {
        assert!(is_in_test_dir(&PathBuf::from("src/tests/helpers.py")));
        assert!(is_in_test_dir(&PathBuf::from("pkg/__tests__/app.test.js")));
        assert!(is_in_test_dir(&PathBuf::from("Spec/runner.cs")));
        assert!(!is_in_test_dir(&PathBuf::from("src/app.py")));
        // The filename alone does not make a test directory.
        assert!(!is_in_test_dir(&PathBuf::from("src/tests.py")));
    }

    #[test]
    fn test_test_file_naming() {
        assert!(is_test_file(
            &PathBuf::from("test_app.py"),
            Language::Python
        ));
        assert!(is_test_file(
            &PathBuf::from("app_test.py"),
            Language::Python
        ));
        assert!(is_test_file(
            &PathBuf::from("app.test.ts"),
            Language::TypeScript
        ));
        assert!(is_test_file(&PathBuf::from("app.spec.js"), Language::JavaScript));
        assert!(is_test_file(&PathBuf::from("main_test.go"), Language::Go));
        assert!(is_test_file(&PathBuf::from("AppTest.java"), Language::Java));
        assert!(!is_test_file(&PathBuf::from("app.py"), Language::Python));
        assert!(!is_test_file(&PathBuf::from("main.go"), Language::Go));
    }

    #[test]
    fn test_line_at() {
        let source = "a\nb\nc\n";
        assert_eq!(line_at(source, 0), 1);
        assert_eq!(line_at(source, 2), 2);
        assert_eq!(line_at(source, 4), 3);
    }

    #[test]
    fn test_block_end_line_balances_nested_braces() {
        let source = "fn foo() {\n    if x {\n        y();\n    }\n}\nfn bar() {}\n";
        // Header ends right before the first '{'.
        let header_end = source.find('{').unwrap();
        assert_eq!(block_end_line(source, header_end, 1), 5);
    }

    #[test]
    fn test_block_end_line_semicolon_header() {
        let source = "void doWork(int a);\nint other() { return 1; }\n";
        assert_eq!(block_end_line(source, "void doWork(int a)".len(), 1), 1);
    }

    #[test]
    fn test_body_for_span() {
        let source = "one\ntwo\nthree\nfour";
        assert_eq!(body_for_span(source, 2, 3), "two\nthree");
    }

    #[test]
    fn test_read_source_rejects_binary_and_missing_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let binary = dir.path().join("blob.py");
        std::fs::write(&binary, b"PK\x00\x03not text").unwrap();
        assert!(read_source(&binary).is_err());
        assert!(read_source(&dir.path().join("gone.py")).is_err());

        let text = dir.path().join("ok.py");
        std::fs::write(&text, "def f():\n    return 1\n").unwrap();
        assert_eq!(read_source(&text).unwrap().lines().count(), 2);
    }

    #[test]
    fn test_extract_source_counts_loc() {
        let source = "func Add(a int, b int) int {\n\treturn a + b\n}\n";
        let result =
            extract_source(source, &PathBuf::from("math.go"), Language::Go).unwrap();
        assert_eq!(result.loc, 3);
        assert_eq!(result.functions.len(), 1);
    }
}

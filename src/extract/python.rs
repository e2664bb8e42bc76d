//! Python extractor using tree-sitter
//!
//! Structural parse: walks the AST for function definitions at any nesting
//! depth (module level, class methods, inner defs) and records exact line
//! spans from the tree.

use crate::errors::CodediagError;
use crate::extract::{body_for_span, FileExtraction};
use crate::models::{FunctionRecord, Language};
use std::path::Path;
use tree_sitter::{Node, Parser};

pub fn extract(source: &str, path: &Path) -> Result<FileExtraction, CodediagError> {
    let mut parser = Parser::new();
    let language = tree_sitter_python::LANGUAGE;
    parser
        .set_language(&language.into())
        .map_err(|e| CodediagError::extraction(path, format!("python grammar: {e}")))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| CodediagError::extraction(path, "tree-sitter parse failed"))?;

    let mut extraction = FileExtraction::default();
    let mut class_stack: Vec<String> = Vec::new();
    walk(
        &tree.root_node(),
        source,
        path,
        &mut class_stack,
        &mut extraction,
    );
    Ok(extraction)
}

fn walk(
    node: &Node,
    source: &str,
    path: &Path,
    class_stack: &mut Vec<String>,
    out: &mut FileExtraction,
) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "function_definition" => {
                if let Some(record) = function_record(&child, source, path, class_stack) {
                    out.functions.push(record);
                }
                // Inner defs are callables too.
                walk(&child, source, path, class_stack, out);
            }
            "class_definition" => {
                let name = child
                    .child_by_field_name("name")
                    .and_then(|n| n.utf8_text(source.as_bytes()).ok())
                    .unwrap_or("")
                    .to_string();
                class_stack.push(name);
                walk(&child, source, path, class_stack, out);
                class_stack.pop();
            }
            "import_statement" | "import_from_statement" => {
                collect_imports(&child, source, out);
            }
            _ => {
                walk(&child, source, path, class_stack, out);
            }
        }
    }
}

fn function_record(
    node: &Node,
    source: &str,
    path: &Path,
    class_stack: &[String],
) -> Option<FunctionRecord> {
    let name_node = node.child_by_field_name("name")?;
    let name = name_node.utf8_text(source.as_bytes()).ok()?.to_string();

    let line_start = node.start_position().row as u32 + 1;
    let line_end = node.end_position().row as u32 + 1;

    let qualified_name = match class_stack.last() {
        Some(class) if !class.is_empty() => format!("{class}.{name}"),
        _ => name.clone(),
    };

    Some(FunctionRecord {
        is_public: !name.starts_with('_'),
        body: body_for_span(source, line_start, line_end),
        name,
        qualified_name,
        file_path: path.to_path_buf(),
        language: Language::Python,
        line_start,
        line_end,
        complexity: 1,
        is_tested: false,
        is_dead: false,
        fan_in: 0,
        fan_out: 0,
    })
}

/// `import a.b, c` and `from a.b import x` both contribute `a.b`-style paths.
fn collect_imports(node: &Node, source: &str, out: &mut FileExtraction) {
    if node.kind() == "import_from_statement" {
        if let Some(module) = node.child_by_field_name("module_name") {
            if let Ok(text) = module.utf8_text(source.as_bytes()) {
                out.imports.push(text.to_string());
            }
            return;
        }
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "dotted_name" | "relative_import" => {
                if let Ok(text) = child.utf8_text(source.as_bytes()) {
                    out.imports.push(text.to_string());
                }
                // import_from_statement lists names after the module; only
                // the first dotted_name is the module itself.
                if node.kind() == "import_from_statement" {
                    return;
                }
            }
            "aliased_import" => {
                if let Some(name) = child.child_by_field_name("name") {
                    if let Ok(text) = name.utf8_text(source.as_bytes()) {
                        out.imports.push(text.to_string());
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn extract_str(source: &str) -> FileExtraction {
        extract(source, &PathBuf::from("app.py")).unwrap()
    }

    #[test]
    fn test_extracts_top_level_functions_with_spans() {
        let source = "def calc(a, b):\n    if a:\n        return a\n    return b\n\n\ndef other():\n    pass\n";
        let result = extract_str(source);
        assert_eq!(result.functions.len(), 2);
        let calc = &result.functions[0];
        assert_eq!(calc.name, "calc");
        assert_eq!(calc.line_start, 1);
        assert_eq!(calc.line_end, 4);
        assert!(calc.body.contains("return b"));
    }

    #[test]
    fn test_methods_get_class_qualified_names() {
        let source = "class Billing:\n    def charge(self, amount):\n        return amount\n\n    def _retry(self):\n        pass\n";
        let result = extract_str(source);
        assert_eq!(result.functions.len(), 2);
        assert_eq!(result.functions[0].qualified_name, "Billing.charge");
        assert!(result.functions[0].is_public);
        assert_eq!(result.functions[1].qualified_name, "Billing._retry");
        assert!(!result.functions[1].is_public);
    }

    #[test]
    fn test_nested_defs_are_extracted() {
        let source = "def outer():\n    def inner():\n        return 1\n    return inner\n";
        let result = extract_str(source);
        let names: Vec<&str> = result.functions.iter().map(|f| f.name.as_str()).collect();
        assert!(names.contains(&"outer"));
        assert!(names.contains(&"inner"));
    }

    #[test]
    fn test_async_functions_are_extracted() {
        let source = "async def fetch(url):\n    return await get(url)\n";
        let result = extract_str(source);
        assert_eq!(result.functions.len(), 1);
        assert_eq!(result.functions[0].name, "fetch");
    }

    #[test]
    fn test_imports() {
        let source = "import os\nimport json as j\nfrom collections import defaultdict\nfrom app.core import engine\n";
        let result = extract_str(source);
        assert!(result.imports.contains(&"os".to_string()));
        assert!(result.imports.contains(&"json".to_string()));
        assert!(result.imports.contains(&"collections".to_string()));
        assert!(result.imports.contains(&"app.core".to_string()));
    }

    #[test]
    fn test_garbage_source_yields_no_functions() {
        // tree-sitter is error-tolerant; worst case is an empty result.
        let result = extract_str("$$$ not python @@@");
        assert!(result.functions.is_empty());
    }
}

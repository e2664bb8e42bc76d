//! Module coupling analyzer
//!
//! Builds a directed import graph between source modules and flags any
//! module whose combined degree (imports made + imported by) exceeds the
//! configured threshold. The signal is raw degree; no cycle detection.

use crate::models::{CouplingIssue, ModuleRecord};
use petgraph::graphmap::DiGraphMap;
use rustc_hash::FxHashSet;

/// Emit a [`CouplingIssue`] for every module above `threshold`.
pub fn coupling_issues(modules: &[ModuleRecord], threshold: u32) -> Vec<CouplingIssue> {
    let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();
    for idx in 0..modules.len() {
        graph.add_node(idx);
    }

    for (from, module) in modules.iter().enumerate() {
        let mut targets: FxHashSet<usize> = FxHashSet::default();
        for import in &module.imports {
            for to in resolve_import(import, modules) {
                if to != from {
                    targets.insert(to);
                }
            }
        }
        for to in targets {
            graph.add_edge(from, to, ());
        }
    }

    let mut issues = Vec::new();
    for (idx, module) in modules.iter().enumerate() {
        let imports_out =
            graph.neighbors_directed(idx, petgraph::Direction::Outgoing).count() as u32;
        let imported_by =
            graph.neighbors_directed(idx, petgraph::Direction::Incoming).count() as u32;
        if imports_out + imported_by > threshold {
            issues.push(CouplingIssue {
                module_path: module.file_path.clone(),
                imports_out,
                imported_by,
            });
        }
    }
    issues
}

/// Resolve an import string to project modules: the dotted path as a path
/// fragment, or the last segment as a file stem.
fn resolve_import(import: &str, modules: &[ModuleRecord]) -> Vec<usize> {
    let as_path = import.replace(['.', ':'], "/").replace("//", "/");
    let last_segment = import
        .rsplit(|c| c == '.' || c == ':' || c == '/')
        .find(|s| !s.is_empty())
        .unwrap_or(import);

    modules
        .iter()
        .enumerate()
        .filter(|(_, m)| {
            let path_str = m.file_path.to_string_lossy().replace('\\', "/");
            let stem = m
                .file_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("");
            path_str.contains(&as_path) || stem == last_segment
        })
        .map(|(idx, _)| idx)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Language;
    use std::path::PathBuf;

    fn module(path: &str, imports: &[&str]) -> ModuleRecord {
        ModuleRecord {
            file_path: PathBuf::from(path),
            language: Language::Python,
            loc: 10,
            imports: imports.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_low_coupling_emits_nothing() {
        let modules = vec![
            module("src/a.py", &["b"]),
            module("src/b.py", &[]),
        ];
        assert!(coupling_issues(&modules, 8).is_empty());
    }

    #[test]
    fn test_hub_module_above_threshold_is_flagged() {
        // hub imports nothing but is imported by five modules; with a
        // threshold of 4 its degree of 5 crosses the line.
        let mut modules = vec![module("src/hub.py", &[])];
        for i in 0..5 {
            modules.push(module(&format!("src/user{i}.py"), &["hub"]));
        }
        let issues = coupling_issues(&modules, 4);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].module_path, PathBuf::from("src/hub.py"));
        assert_eq!(issues[0].imported_by, 5);
        assert_eq!(issues[0].imports_out, 0);
        assert_eq!(issues[0].degree(), 5);
    }

    #[test]
    fn test_dotted_import_resolves_to_path_fragment() {
        let modules = vec![
            module("src/app/core.py", &[]),
            module("src/main.py", &["app.core"]),
        ];
        let issues = coupling_issues(&modules, 0);
        // Both ends of the single edge have degree 1.
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn test_self_import_is_ignored() {
        let modules = vec![module("src/solo.py", &["solo"])];
        assert!(coupling_issues(&modules, 0).is_empty());
    }
}

//! Dead-code analyzer
//!
//! A function is dead when its name has zero whole-word matches anywhere in
//! non-test source outside its own definition line. Entry-point names that
//! runtimes invoke implicitly are exempt. This pass also fills the coupling
//! counts on each record: `fan_in` from the reference scan, `fan_out` from
//! the project function names referenced inside the body.

use crate::models::FunctionRecord;
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::{Path, PathBuf};

/// Entry points invoked by the runtime or test harness, never by project
/// code. Flagging these as dead would be noise.
const ENTRY_POINT_ALLOWLIST: &[&str] = &["main", "init", "__init__", "__main__", "setup", "teardown"];

fn is_entry_point(name: &str) -> bool {
    ENTRY_POINT_ALLOWLIST.contains(&name)
        || (name.starts_with("__") && name.ends_with("__"))
}

/// Scan `sources` (non-test files only) and mark dead functions, filling
/// `fan_in`/`fan_out` along the way.
pub fn mark_dead(functions: &mut [FunctionRecord], sources: &[(PathBuf, String)]) {
    let by_path: FxHashMap<&Path, &str> = sources
        .iter()
        .map(|(p, c)| (p.as_path(), c.as_str()))
        .collect();

    let all_names: FxHashSet<String> = functions.iter().map(|f| f.name.clone()).collect();

    // Reference counts are computed per distinct name, then applied to the
    // records, so duplicate names across files are scanned once.
    let mut names: Vec<(String, Regex)> = Vec::new();
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for function in functions.iter() {
        if seen.insert(function.name.as_str()) {
            if let Ok(re) = Regex::new(&format!(r"\b{}\b", regex::escape(&function.name))) {
                names.push((function.name.clone(), re));
            }
        }
    }
    let regex_by_name: FxHashMap<&str, &Regex> =
        names.iter().map(|(n, re)| (n.as_str(), re)).collect();

    for function in functions.iter_mut() {
        let Some(re) = regex_by_name.get(function.name.as_str()) else {
            continue;
        };

        let mut references = 0u32;
        for (path, content) in sources {
            let mut count = re.find_iter(content).count();
            if path.as_path() == function.file_path.as_path() {
                count = count.saturating_sub(matches_on_line(
                    re,
                    by_path.get(function.file_path.as_path()).copied().unwrap_or(""),
                    function.line_start,
                ));
            }
            references += count as u32;
        }
        // Recursion counts as a reference; only the definition line itself
        // is excluded.
        function.fan_in = references;

        if !is_entry_point(&function.name) && references == 0 {
            function.is_dead = true;
        }

        function.fan_out = fan_out(&function.body, &function.name, &all_names);
    }
}

fn matches_on_line(re: &Regex, content: &str, line: u32) -> usize {
    content
        .lines()
        .nth(line.saturating_sub(1) as usize)
        .map(|text| re.find_iter(text).count())
        .unwrap_or(0)
}

/// Distinct project functions invoked from this body.
fn fan_out(body: &str, own_name: &str, all_names: &FxHashSet<String>) -> u32 {
    all_names
        .iter()
        .filter(|name| name.as_str() != own_name)
        .filter(|name| {
            body.contains(name.as_str())
                && Regex::new(&format!(r"\b{}\s*\(", regex::escape(name)))
                    .map(|re| re.is_match(body))
                    .unwrap_or(false)
        })
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Language;

    fn record(name: &str, path: &str, line_start: u32, body: &str) -> FunctionRecord {
        FunctionRecord {
            name: name.to_string(),
            qualified_name: name.to_string(),
            file_path: PathBuf::from(path),
            language: Language::Python,
            line_start,
            line_end: line_start + 1,
            body: body.to_string(),
            complexity: 1,
            is_public: true,
            is_tested: false,
            is_dead: false,
            fan_in: 0,
            fan_out: 0,
        }
    }

    #[test]
    fn test_unreferenced_function_is_dead() {
        let source = "def orphan():\n    return 1\n\ndef used():\n    return 2\n\nprint(used())\n";
        let sources = vec![(PathBuf::from("app.py"), source.to_string())];
        let mut functions = vec![
            record("orphan", "app.py", 1, "def orphan():\n    return 1"),
            record("used", "app.py", 4, "def used():\n    return 2"),
        ];
        mark_dead(&mut functions, &sources);
        assert!(functions[0].is_dead);
        assert_eq!(functions[0].fan_in, 0);
        assert!(!functions[1].is_dead);
        assert_eq!(functions[1].fan_in, 1);
    }

    #[test]
    fn test_entry_points_are_exempt() {
        let source = "def main():\n    pass\n";
        let sources = vec![(PathBuf::from("app.py"), source.to_string())];
        let mut functions = vec![record("main", "app.py", 1, "def main():\n    pass")];
        mark_dead(&mut functions, &sources);
        assert!(!functions[0].is_dead);
    }

    #[test]
    fn test_python_dunders_are_exempt() {
        let source = "def __repr__(self):\n    return 'x'\n";
        let sources = vec![(PathBuf::from("app.py"), source.to_string())];
        let mut functions = vec![record("__repr__", "app.py", 1, "def __repr__(self): ...")];
        mark_dead(&mut functions, &sources);
        assert!(!functions[0].is_dead);
    }

    #[test]
    fn test_cross_file_reference_keeps_function_alive() {
        let lib = "def fetch():\n    return 1\n";
        let app = "from lib import fetch\n\nresult = fetch()\n";
        let sources = vec![
            (PathBuf::from("lib.py"), lib.to_string()),
            (PathBuf::from("app.py"), app.to_string()),
        ];
        let mut functions = vec![record("fetch", "lib.py", 1, "def fetch():\n    return 1")];
        mark_dead(&mut functions, &sources);
        assert!(!functions[0].is_dead);
        assert_eq!(functions[0].fan_in, 2);
    }

    #[test]
    fn test_fan_out_counts_distinct_callees() {
        let body = "def top():\n    a()\n    b()\n    a()\n";
        let sources = vec![(PathBuf::from("app.py"), "x".to_string())];
        let mut functions = vec![
            record("top", "app.py", 1, body),
            record("a", "app.py", 10, "def a(): ..."),
            record("b", "app.py", 12, "def b(): ..."),
        ];
        mark_dead(&mut functions, &sources);
        assert_eq!(functions[0].fan_out, 2);
    }
}

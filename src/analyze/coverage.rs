//! Coverage-gap analyzer
//!
//! Infers `is_tested` per function from test-file text using three
//! OR-combined heuristics, tried in order until one succeeds:
//!
//! 1. whole-word invocation of the function name,
//! 2. the name and an assertion-like token within a bounded character
//!    window (tolerates multi-line test bodies),
//! 3. a bare `name(` match anywhere in the test content.
//!
//! Each call covers exactly one language's records; the flag is only ever
//! set, never reset, so a later language pass cannot corrupt an earlier one.

use crate::models::FunctionRecord;
use regex::Regex;
use std::sync::OnceLock;

/// Window size for the cross-line name/assertion search.
pub const ASSERTION_WINDOW: usize = 500;

static ASSERTION_TOKEN: OnceLock<Regex> = OnceLock::new();

fn assertion_token() -> &'static Regex {
    ASSERTION_TOKEN.get_or_init(|| Regex::new(r"(?i)\b(?:assert\w*|expect|should)\b").unwrap())
}

/// Mark functions referenced by the given test contents as tested.
pub fn mark_tested(functions: &mut [FunctionRecord], test_contents: &[String]) {
    if test_contents.is_empty() {
        return;
    }
    for function in functions.iter_mut() {
        if function.is_tested {
            continue;
        }
        // One compiled pattern per name, reused across every test file.
        let invocation = invocation_pattern(&function.name);
        if test_contents
            .iter()
            .any(|c| is_covered(&function.name, invocation.as_ref(), c))
        {
            function.is_tested = true;
        }
    }
}

fn invocation_pattern(name: &str) -> Option<Regex> {
    Regex::new(&format!(r"\b{}\s*\(", regex::escape(name))).ok()
}

fn is_covered(name: &str, invocation: Option<&Regex>, test_content: &str) -> bool {
    invocation.is_some_and(|re| re.is_match(test_content))
        || windowed_assertion(name, test_content)
        || test_content.contains(&format!("{name}("))
}

/// The name and an assertion token may sit on different lines; a naive
/// same-line match misses multi-line test bodies.
fn windowed_assertion(name: &str, content: &str) -> bool {
    for (idx, _) in content.match_indices(name) {
        let mut start = idx.saturating_sub(ASSERTION_WINDOW);
        let mut end = (idx + name.len() + ASSERTION_WINDOW).min(content.len());
        while !content.is_char_boundary(start) {
            start -= 1;
        }
        while !content.is_char_boundary(end) {
            end += 1;
        }
        if assertion_token().is_match(&content[start..end]) {
            return true;
        }
    }
    false
}

//! Cyclomatic complexity analyzer
//!
//! CC = 1 + number of decision points in the body. Each language has an
//! explicit decision-point grammar; dispatch is a fixed table, and the band
//! constants below are the single source of truth for both classification
//! and any generated finding text.

use crate::models::Language;
use regex::Regex;
use std::sync::OnceLock;

/// Band boundaries. `COMPLEXITY_MEDIUM` is the flagging threshold used by
/// the static synthesizer; the higher bands escalate severity.
pub const COMPLEXITY_LOW: u32 = 5;
pub const COMPLEXITY_MEDIUM: u32 = 10;
pub const COMPLEXITY_HIGH: u32 = 20;
pub const COMPLEXITY_VERY_HIGH: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexityBand {
    Low,
    Normal,
    Elevated,
    High,
    Critical,
}

impl ComplexityBand {
    pub fn classify(cc: u32) -> ComplexityBand {
        match cc {
            0..=COMPLEXITY_LOW => ComplexityBand::Low,
            _ if cc <= COMPLEXITY_MEDIUM => ComplexityBand::Normal,
            _ if cc <= COMPLEXITY_HIGH => ComplexityBand::Elevated,
            _ if cc <= COMPLEXITY_VERY_HIGH => ComplexityBand::High,
            _ => ComplexityBand::Critical,
        }
    }
}

struct DecisionGrammar {
    patterns: Vec<Regex>,
}

static GRAMMARS: OnceLock<[DecisionGrammar; 5]> = OnceLock::new();

fn keyword(words: &[&str]) -> Regex {
    Regex::new(&format!(r"\b(?:{})\b", words.join("|"))).unwrap()
}

fn grammars() -> &'static [DecisionGrammar; 5] {
    GRAMMARS.get_or_init(|| {
        [
            // Python
            DecisionGrammar {
                patterns: vec![keyword(&[
                    "if", "elif", "for", "while", "except", "and", "or", "case",
                ])],
            },
            // JavaScript/TypeScript
            DecisionGrammar {
                patterns: vec![
                    keyword(&["if", "for", "while", "case", "catch"]),
                    Regex::new(r"&&|\|\|").unwrap(),
                ],
            },
            // Rust: `=>` only appears in match arms
            DecisionGrammar {
                patterns: vec![
                    keyword(&["if", "for", "while"]),
                    Regex::new(r"&&|\|\||=>").unwrap(),
                ],
            },
            // Go
            DecisionGrammar {
                patterns: vec![
                    keyword(&["if", "for", "case"]),
                    Regex::new(r"&&|\|\|").unwrap(),
                ],
            },
            // Java / C#
            DecisionGrammar {
                patterns: vec![
                    keyword(&["if", "for", "foreach", "while", "case", "catch"]),
                    Regex::new(r"&&|\|\|").unwrap(),
                ],
            },
        ]
    })
}

fn grammar_for(language: Language) -> &'static DecisionGrammar {
    let grammars = grammars();
    match language {
        Language::Python => &grammars[0],
        Language::JavaScript | Language::TypeScript => &grammars[1],
        Language::Rust => &grammars[2],
        Language::Go => &grammars[3],
        Language::Java | Language::CSharp => &grammars[4],
    }
}

/// Compute cyclomatic complexity for a function body. Always >= 1.
pub fn complexity_of(language: Language, body: &str) -> u32 {
    let grammar = grammar_for(language);
    let decision_points: usize = grammar
        .patterns
        .iter()
        .map(|p| p.find_iter(body).count())
        .sum();
    1 + decision_points as u32
}

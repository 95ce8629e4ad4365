use regex::Regex;

use crate::models::{RawRow, Row};

/// Structural prefix of a qualifying hierarchical code in the export:
/// two leading spaces then the "O" expense-tree marker.
const CODE_PATTERN: &str = "^  O";

fn range_key(code: &str) -> Option<u32> {
    if code.is_empty() {
        return None;
    }
    let chars: Vec<char> = code.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(2)..].iter().collect();
    tail.trim().parse().ok()
}

/// Derive `hierarchical_code`, forward-filled `concept` and `range_key`
/// for every row. This is a stateful left-to-right scan over the rows in
/// original order: blanks inherit the most recent non-blank value, so the
/// scan runs exactly once and order must be preserved.
pub fn classify(raw: Vec<RawRow>) -> Vec<Row> {
    let code_re = Regex::new(CODE_PATTERN).unwrap();

    let mut last_code = String::new();
    let mut last_concept = String::new();
    let mut rows = Vec::with_capacity(raw.len());

    for r in raw {
        if code_re.is_match(&r.code) {
            last_code = r.code.clone();
        }
        if !r.concept.trim().is_empty() {
            last_concept = r.concept.clone();
        }
        rows.push(Row {
            hierarchical_code: last_code.clone(),
            concept: last_concept.clone(),
            source: r.source,
            range_key: range_key(&last_code),
            exec: r.exec,
        });
    }
    rows
}

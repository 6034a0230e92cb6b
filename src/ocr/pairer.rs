//! Turns raw OCR text into `(label, value)` candidate pairs.
//!
//! The OCR engine usually emits the Battle Report as two stacked text blocks:
//! every label first, then every value in the same order. The default pairer
//! relies on that layout; anything smarter can implement [`LinePairer`].

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

use super::fields::StatField;

/// Section heading that precedes the stats table.
const REPORT_MARKER_PATTERN: &str = r"(?i)battle report";

static REPORT_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(REPORT_MARKER_PATTERN).expect("marker pattern compiles"));

/// An unvalidated label/value candidate, in OCR line order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPair {
    pub label: String,
    pub value: String,
}

impl RawPair {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Strategy for splitting OCR text into label/value pairs.
pub trait LinePairer {
    fn pair(&self, text: &str) -> Vec<RawPair>;
}

/// Pairs line `i` of the first half with line `i` of the second half.
#[derive(Clone, Debug)]
pub struct HalfSplitPairer {
    /// Upper bound on emitted pairs.
    pub max_pairs: usize,
}

impl Default for HalfSplitPairer {
    fn default() -> Self {
        Self {
            max_pairs: StatField::ALL.len(),
        }
    }
}

impl LinePairer for HalfSplitPairer {
    fn pair(&self, text: &str) -> Vec<RawPair> {
        let section = report_section(text);

        let lines: Vec<&str> = section
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let half = lines.len() / 2;
        let mut seen: HashSet<String> = HashSet::new();
        let mut pairs = Vec::with_capacity(half.min(self.max_pairs));

        for (label, value) in lines[..half].iter().zip(&lines[half..]) {
            if pairs.len() >= self.max_pairs {
                break;
            }

            // OCR sometimes detects a caption twice
            if !seen.insert(label.to_lowercase()) {
                continue;
            }

            pairs.push(RawPair::new(*label, *value));
        }

        pairs
    }
}

/// Returns the text after the "Battle Report" heading, or the whole text
/// when no heading was recognized.
fn report_section(text: &str) -> &str {
    match REPORT_MARKER_REGEX.find(text) {
        Some(marker) => text[marker.end()..].trim(),
        None => text,
    }
}

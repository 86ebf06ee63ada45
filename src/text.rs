//! Text normalization and word-overlap primitives.
//!
//! Everything that compares two bodies of text goes through these helpers so
//! that the merger, the similarity detector, and the overlap report agree on
//! what a "word" is.
//!
//! # Example
//!
//! ```rust
//! use script_research::text::{normalize, jaccard, word_set};
//!
//! let a = normalize("Widgets are GREAT, for home use!");
//! assert_eq!(a, "widgets are great for home use");
//! let sim = jaccard(&word_set(&a), &word_set("great widgets at home"));
//! assert!((sim - 1.0).abs() < 1e-9);
//! ```

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::thresholds::{
    FINGERPRINT_SEPARATOR, FINGERPRINT_SPAN_CHARS, MIN_FINGERPRINT_CHARS,
    MIN_SIGNIFICANT_WORD_CHARS,
};

/// Lowercase, strip punctuation, and collapse runs of whitespace.
///
/// Punctuation is removed rather than replaced, so `don't` becomes `dont`.
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .flat_map(char::to_lowercase)
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Count whitespace-delimited, non-empty tokens.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Distinct words longer than [`MIN_SIGNIFICANT_WORD_CHARS`].
///
/// Expects already-normalized text; short function words are dropped so
/// they do not inflate overlap between unrelated passages.
pub fn word_set(normalized: &str) -> HashSet<&str> {
    normalized
        .split_whitespace()
        .filter(|w| w.chars().count() > MIN_SIGNIFICANT_WORD_CHARS)
        .collect()
}

/// Jaccard index `|A ∩ B| / |A ∪ B|`. Returns `0.0` if either set is empty.
pub fn jaccard(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// Word-set Jaccard similarity of two normalized strings.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    jaccard(&word_set(a), &word_set(b))
}

/// The first `n` chars of `s` (char-boundary safe).
pub fn head_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// The last `n` chars of `s` (char-boundary safe).
pub fn tail_chars(s: &str, n: usize) -> &str {
    let total = s.chars().count();
    if total <= n {
        return s;
    }
    match s.char_indices().nth(total - n) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}

/// Head and tail signature of a source's normalized content.
///
/// Comparing the halves separately catches documents that share an opening
/// but diverge later, and vice versa. Short documents have overlapping or
/// identical halves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fingerprint {
    pub head: String,
    pub tail: String,
}

impl Fingerprint {
    /// Build a fingerprint, or `None` when the content is too short to be
    /// a meaningful signature.
    pub fn from_normalized(normalized: &str) -> Option<Self> {
        if normalized.chars().count() < MIN_FINGERPRINT_CHARS {
            return None;
        }

        Some(Self {
            head: head_chars(normalized, FINGERPRINT_SPAN_CHARS).to_string(),
            tail: tail_chars(normalized, FINGERPRINT_SPAN_CHARS).to_string(),
        })
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.head, FINGERPRINT_SEPARATOR, self.tail)
    }
}

//! Tunable constants for scoring, deduplication, and adequacy checks.
//!
//! Every threshold the pipeline compares against lives here so the tables
//! can be tested directly and tuned without touching algorithm code.

use serde::Serialize;

// ============ Normalization / fingerprinting ============

/// Normalized content shorter than this (in chars) gets no fingerprint.
pub const MIN_FINGERPRINT_CHARS: usize = 50;

/// Chars taken from each end of normalized content to build a fingerprint.
pub const FINGERPRINT_SPAN_CHARS: usize = 300;

/// Separator between the head and tail halves of a rendered fingerprint.
pub const FINGERPRINT_SEPARATOR: char = '|';

/// Words must be longer than this (in chars) to enter a similarity word set.
pub const MIN_SIGNIFICANT_WORD_CHARS: usize = 3;

// ============ Quality scoring ============

pub const QUALITY_BASE: f64 = 0.5;
pub const SYNTHESIS_QUALITY: f64 = 1.0;
pub const DOCUMENT_BONUS: f64 = 0.2;
pub const WEB_BONUS: f64 = 0.1;
pub const STARRED_BONUS: f64 = 0.1;
pub const VERIFIED_BONUS: f64 = 0.1;

/// `(exclusive lower bound in words, bonus)`, checked in order; first match wins.
pub const WORD_COUNT_BONUSES: [(usize, f64); 3] = [(1000, 0.15), (500, 0.10), (200, 0.05)];

/// Sources under this many words are treated as snippets.
pub const SNIPPET_WORDS: usize = 50;
pub const SNIPPET_PENALTY: f64 = 0.2;

/// Relevance adjustment is `(relevance - RELEVANCE_BASELINE) * RELEVANCE_WEIGHT`.
pub const RELEVANCE_BASELINE: f64 = 0.75;
pub const RELEVANCE_WEIGHT: f64 = 0.2;

/// Quality assumed for a record that has not been scored.
pub const NEUTRAL_QUALITY: f64 = 0.5;

// ============ Duplicate resolution ============

/// Document-vs-web pairs above this similarity are duplicates.
pub const CROSS_ORIGIN_DUPLICATE: f64 = 0.7;

/// Web-vs-web pairs above this similarity are duplicates.
pub const INTRA_WEB_DUPLICATE: f64 = 0.8;

/// Cross-origin duplicates above this similarity are classed as exact.
pub const EXACT_DUPLICATE: f64 = 0.9;

// ============ Merging ============

pub const DEFAULT_MAX_SOURCES: usize = 50;

/// Quality differences at or below this do not reorder sources.
pub const QUALITY_TIE_BAND: f64 = 0.05;

// ============ Adequacy ============

/// Corpus-level thresholds a research set must meet for a target duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Requirement {
    pub min_words: usize,
    pub min_sources: usize,
    pub min_quality: f64,
}

/// Requirement for targets shorter than the first checkpoint.
pub const FLOOR_REQUIREMENT: Requirement = Requirement {
    min_words: 3000,
    min_sources: 5,
    min_quality: 0.60,
};

/// Duration checkpoints in minutes, ascending, with their requirements.
pub const REQUIREMENT_CHECKPOINTS: [(u32, Requirement); 5] = [
    (
        35,
        Requirement {
            min_words: 7000,
            min_sources: 10,
            min_quality: 0.70,
        },
    ),
    (
        40,
        Requirement {
            min_words: 8500,
            min_sources: 12,
            min_quality: 0.72,
        },
    ),
    (
        45,
        Requirement {
            min_words: 10000,
            min_sources: 15,
            min_quality: 0.75,
        },
    ),
    (
        50,
        Requirement {
            min_words: 11000,
            min_sources: 17,
            min_quality: 0.77,
        },
    ),
    (
        60,
        Requirement {
            min_words: 13000,
            min_sources: 20,
            min_quality: 0.80,
        },
    ),
];

/// Look up the requirement for a target duration.
///
/// Uses the smallest checkpoint at or above `duration_minutes`. Targets
/// below the first checkpoint get [`FLOOR_REQUIREMENT`]; targets past the
/// last checkpoint reuse the last one rather than extrapolating.
pub fn requirement_for(duration_minutes: u32) -> Requirement {
    let (first_minutes, _) = REQUIREMENT_CHECKPOINTS[0];
    if duration_minutes < first_minutes {
        return FLOOR_REQUIREMENT;
    }

    REQUIREMENT_CHECKPOINTS
        .iter()
        .find(|(minutes, _)| *minutes >= duration_minutes)
        .or_else(|| REQUIREMENT_CHECKPOINTS.last())
        .map(|(_, req)| *req)
        .unwrap_or(FLOOR_REQUIREMENT)
}

/// Overall research score normalizers and weights.
pub const SCORE_SOURCE_TARGET: f64 = 15.0;
pub const SCORE_WORD_TARGET: f64 = 10000.0;
pub const SCORE_SOURCE_WEIGHT: f64 = 0.3;
pub const SCORE_WORD_WEIGHT: f64 = 0.4;
pub const SCORE_QUALITY_WEIGHT: f64 = 0.3;

/// Targets at or above this duration benefit from curated documents.
pub const LONG_FORM_MINUTES: u32 = 45;

/// Only sources with more raw chars than this enter the overlap report.
pub const OVERLAP_MIN_CONTENT_CHARS: usize = 100;

/// Normalized chars compared per source by the overlap report.
pub const OVERLAP_PREFIX_CHARS: usize = 500;

/// Overlap above this similarity is reported.
pub const OVERLAP_REPORT: f64 = 0.7;

/// Overlap above this similarity is reported for removal rather than review.
pub const OVERLAP_REMOVE: f64 = 0.9;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_first_checkpoint_uses_floor() {
        assert_eq!(requirement_for(0), FLOOR_REQUIREMENT);
        assert_eq!(requirement_for(34), FLOOR_REQUIREMENT);
    }

    #[test]
    fn test_exact_checkpoints() {
        for (minutes, req) in REQUIREMENT_CHECKPOINTS {
            assert_eq!(requirement_for(minutes), req);
        }
    }

    #[test]
    fn test_between_checkpoints_rounds_up() {
        assert_eq!(requirement_for(36), REQUIREMENT_CHECKPOINTS[1].1);
        assert_eq!(requirement_for(41), REQUIREMENT_CHECKPOINTS[2].1);
        assert_eq!(requirement_for(55), REQUIREMENT_CHECKPOINTS[4].1);
    }

    #[test]
    fn test_past_last_checkpoint_reuses_last() {
        let last = REQUIREMENT_CHECKPOINTS[4].1;
        assert_eq!(requirement_for(61), last);
        assert_eq!(requirement_for(240), last);
    }

    #[test]
    fn test_checkpoints_monotonic() {
        let mut prev = FLOOR_REQUIREMENT;
        let mut prev_minutes = 0;
        for (minutes, req) in REQUIREMENT_CHECKPOINTS {
            assert!(minutes > prev_minutes);
            assert!(req.min_words >= prev.min_words);
            assert!(req.min_sources >= prev.min_sources);
            assert!(req.min_quality >= prev.min_quality);
            prev = req;
            prev_minutes = minutes;
        }
    }

    #[test]
    fn test_known_values() {
        let req = requirement_for(45);
        assert_eq!(req.min_words, 10000);
        assert_eq!(req.min_sources, 15);
        let req = requirement_for(60);
        assert_eq!(req.min_words, 13000);
        assert_eq!(req.min_sources, 20);
        assert!((req.min_quality - 0.80).abs() < 1e-9);
    }
}

//! Source quality scoring.
//!
//! Additive point system starting from [`QUALITY_BASE`]:
//!
//! | Signal | Adjustment |
//! |--------|------------|
//! | document origin | +0.2 |
//! | web origin | +0.1 |
//! | starred | +0.1 |
//! | fact-check verified | +0.1 |
//! | > 1000 / > 500 / > 200 words | +0.15 / +0.10 / +0.05 |
//! | < 50 words | −0.2 |
//! | relevance `r` present | `(r − 0.75) × 0.2` |
//!
//! Synthesis sources short-circuit to `1.0`: they are already a distilled
//! aggregate. The result is clamped to `[0, 1]`.

use crate::models::{Origin, Source};
use crate::thresholds::{
    DOCUMENT_BONUS, QUALITY_BASE, RELEVANCE_BASELINE, RELEVANCE_WEIGHT, SNIPPET_PENALTY,
    SNIPPET_WORDS, STARRED_BONUS, SYNTHESIS_QUALITY, VERIFIED_BONUS, WEB_BONUS,
    WORD_COUNT_BONUSES,
};

/// Score a source in `[0, 1]`. Pure; ignores any previously stored score.
pub fn score(source: &Source) -> f64 {
    let mut score = QUALITY_BASE;

    match source.origin() {
        Origin::Synthesis => return SYNTHESIS_QUALITY,
        Origin::Document => score += DOCUMENT_BONUS,
        Origin::Web => score += WEB_BONUS,
        Origin::Unknown => {}
    }

    if source.is_starred {
        score += STARRED_BONUS;
    }
    if source.is_verified() {
        score += VERIFIED_BONUS;
    }

    if let Some((_, bonus)) = WORD_COUNT_BONUSES
        .iter()
        .find(|(threshold, _)| source.word_count > *threshold)
    {
        score += bonus;
    } else if source.word_count < SNIPPET_WORDS {
        score -= SNIPPET_PENALTY;
    }

    if let Some(relevance) = source.relevance {
        score += (relevance - RELEVANCE_BASELINE) * RELEVANCE_WEIGHT;
    }

    score.clamp(0.0, 1.0)
}

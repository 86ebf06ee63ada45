//! Research adequacy validation for a target script duration.
//!
//! Compares a merged corpus against the duration-indexed [`Requirement`]
//! table and produces a [`ValidationResult`]: a verdict, itemized gaps, and
//! ranked recommendations. Inadequate research is a normal result, never an
//! error; the caller decides whether to block generation.
//!
//! # Overall research score
//!
//! ```text
//! score = 0.3 × min(1, sources / 15)
//!       + 0.4 × min(1, words / 10000)
//!       + 0.3 × average_quality
//! ```
//!
//! # Example
//!
//! ```rust
//! use script_research::adequacy::{validate_research_for_duration, calculate_adequacy_percentage};
//!
//! let result = validate_research_for_duration(&[], 45, false);
//! assert!(!result.is_adequate);
//! assert_eq!(calculate_adequacy_percentage(&result), 0);
//! ```

use serde::Serialize;
use tracing::info;

use crate::models::{Origin, Source};
use crate::quality;
use crate::text::{count_words, head_chars, text_similarity};
use crate::thresholds::{
    requirement_for, Requirement, LONG_FORM_MINUTES, OVERLAP_MIN_CONTENT_CHARS,
    OVERLAP_PREFIX_CHARS, OVERLAP_REMOVE, OVERLAP_REPORT, SCORE_QUALITY_WEIGHT,
    SCORE_SOURCE_TARGET, SCORE_SOURCE_WEIGHT, SCORE_WORD_TARGET, SCORE_WORD_WEIGHT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GapKind {
    WordCount,
    SourceCount,
    Quality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warning,
}

/// A requirement the corpus falls short of.
#[derive(Debug, Clone, Serialize)]
pub struct Gap {
    #[serde(rename = "type")]
    pub kind: GapKind,
    pub severity: Severity,
    pub current: f64,
    pub required: f64,
    /// `required - current`, always positive.
    pub missing: f64,
    pub message: String,
}

/// Recommendation priority; sorts `High` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    AddSources,
    DeepResearch,
    UploadDocuments,
    AddSynthesis,
    UploadSpecializedDocuments,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub action: RecommendedAction,
    pub message: String,
}

/// Aggregate measurements of a corpus.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Measurements {
    pub total_words: usize,
    pub source_count: usize,
    /// Mean per-source quality, freshly scored.
    pub average_quality: f64,
    /// Weighted blend of volume, breadth, and quality.
    pub research_score: f64,
    pub documents: usize,
    pub web: usize,
    pub synthesis: usize,
    pub verified: usize,
    pub starred: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub is_adequate: bool,
    pub score: f64,
    pub duration_minutes: u32,
    pub requirement: Requirement,
    pub current: Measurements,
    pub gaps: Vec<Gap>,
    pub recommendations: Vec<Recommendation>,
}

/// Validate a merged corpus against the requirement for `duration_minutes`.
///
/// `has_user_documents` reports whether the caller supplied documents at
/// all, which steers the upload recommendations.
pub fn validate_research_for_duration(
    sources: &[Source],
    duration_minutes: u32,
    has_user_documents: bool,
) -> ValidationResult {
    let requirement = requirement_for(duration_minutes);
    let current = measure(sources);

    let mut gaps = Vec::new();
    let mut recommendations = Vec::new();

    if current.total_words < requirement.min_words {
        let missing = requirement.min_words - current.total_words;
        gaps.push(Gap {
            kind: GapKind::WordCount,
            severity: Severity::Critical,
            current: current.total_words as f64,
            required: requirement.min_words as f64,
            missing: missing as f64,
            message: format!(
                "Research has {} words; a {}-minute script needs {} ({} short)",
                current.total_words, duration_minutes, requirement.min_words, missing
            ),
        });
        recommendations.push(Recommendation {
            priority: Priority::High,
            action: RecommendedAction::AddSources,
            message: format!("Add more sources to cover roughly {} more words", missing),
        });
    }

    if current.source_count < requirement.min_sources {
        let missing = requirement.min_sources - current.source_count;
        gaps.push(Gap {
            kind: GapKind::SourceCount,
            severity: Severity::Critical,
            current: current.source_count as f64,
            required: requirement.min_sources as f64,
            missing: missing as f64,
            message: format!(
                "Research has {} sources; {} required ({} short)",
                current.source_count, requirement.min_sources, missing
            ),
        });
        recommendations.push(Recommendation {
            priority: Priority::High,
            action: RecommendedAction::DeepResearch,
            message: format!("Run a deeper research pass to find at least {} more sources", missing),
        });
    }

    if current.research_score < requirement.min_quality {
        gaps.push(Gap {
            kind: GapKind::Quality,
            severity: Severity::Warning,
            current: current.research_score,
            required: requirement.min_quality,
            missing: requirement.min_quality - current.research_score,
            message: format!(
                "Research score {:.2} is below the {:.2} target",
                current.research_score, requirement.min_quality
            ),
        });
        if !has_user_documents {
            recommendations.push(Recommendation {
                priority: Priority::Medium,
                action: RecommendedAction::UploadDocuments,
                message: "Upload your own documents to raise research quality".to_string(),
            });
        }
    }

    if current.synthesis == 0 {
        recommendations.push(Recommendation {
            priority: Priority::Medium,
            action: RecommendedAction::AddSynthesis,
            message: "Add a deep-research synthesis pass to consolidate findings".to_string(),
        });
    }

    if !has_user_documents && current.documents == 0 && duration_minutes >= LONG_FORM_MINUTES {
        recommendations.push(Recommendation {
            priority: Priority::Low,
            action: RecommendedAction::UploadSpecializedDocuments,
            message: format!(
                "{}-minute scripts benefit from curated material; consider uploading specialized documents",
                duration_minutes
            ),
        });
    }

    recommendations.sort_by_key(|r| r.priority);

    let is_adequate = !gaps.iter().any(|g| g.severity == Severity::Critical);

    info!(
        duration_minutes,
        sources = current.source_count,
        words = current.total_words,
        score = current.research_score,
        is_adequate,
        "validated research"
    );

    ValidationResult {
        is_adequate,
        score: current.research_score,
        duration_minutes,
        requirement,
        current,
        gaps,
        recommendations,
    }
}

/// Compute aggregate measurements and the overall research score.
pub fn measure(sources: &[Source]) -> Measurements {
    let source_count = sources.len();
    let total_words: usize = sources.iter().map(|s| count_words(&s.content)).sum();
    let average_quality = if source_count == 0 {
        0.0
    } else {
        sources.iter().map(quality::score).sum::<f64>() / source_count as f64
    };
    let by_origin = |origin: Origin| sources.iter().filter(|s| s.origin() == origin).count();

    Measurements {
        total_words,
        source_count,
        average_quality,
        research_score: research_score(source_count, total_words, average_quality),
        documents: by_origin(Origin::Document),
        web: by_origin(Origin::Web),
        synthesis: by_origin(Origin::Synthesis),
        verified: sources.iter().filter(|s| s.is_verified()).count(),
        starred: sources.iter().filter(|s| s.is_starred).count(),
    }
}

/// Weighted blend of breadth, volume, and mean quality, in `[0, 1]`.
pub fn research_score(source_count: usize, total_words: usize, average_quality: f64) -> f64 {
    let breadth = (source_count as f64 / SCORE_SOURCE_TARGET).min(1.0);
    let volume = (total_words as f64 / SCORE_WORD_TARGET).min(1.0);
    SCORE_SOURCE_WEIGHT * breadth + SCORE_WORD_WEIGHT * volume + SCORE_QUALITY_WEIGHT * average_quality
}

/// Display percentage: the mean of words, sources, and score ratios against
/// the requirement, each capped at 100, floored.
pub fn calculate_adequacy_percentage(result: &ValidationResult) -> u8 {
    fn capped(current: f64, required: f64) -> f64 {
        if required <= 0.0 {
            return 100.0;
        }
        (current / required * 100.0).clamp(0.0, 100.0)
    }

    let req = &result.requirement;
    let cur = &result.current;
    let mean = (capped(cur.total_words as f64, req.min_words as f64)
        + capped(cur.source_count as f64, req.min_sources as f64)
        + capped(cur.research_score, req.min_quality))
        / 3.0;

    mean.floor() as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapAction {
    Remove,
    Review,
}

/// Two sources in one corpus whose openings overlap heavily.
#[derive(Debug, Clone, Serialize)]
pub struct ContentOverlap {
    pub first_id: String,
    pub second_id: String,
    pub similarity: f64,
    pub recommendation: OverlapAction,
}

/// Report overlapping pairs within a single corpus. Read-only.
///
/// Compares the first [`OVERLAP_PREFIX_CHARS`] normalized chars of every
/// pair whose raw content exceeds [`OVERLAP_MIN_CONTENT_CHARS`].
pub fn detect_duplicate_content(sources: &[Source]) -> Vec<ContentOverlap> {
    let candidates: Vec<(&Source, &str)> = sources
        .iter()
        .filter(|s| s.content_length() > OVERLAP_MIN_CONTENT_CHARS)
        .map(|s| (s, head_chars(&s.normalized_content, OVERLAP_PREFIX_CHARS)))
        .collect();

    let mut overlaps = Vec::new();
    for (i, (a, a_prefix)) in candidates.iter().enumerate() {
        for (b, b_prefix) in &candidates[i + 1..] {
            let sim = text_similarity(a_prefix, b_prefix);
            if sim > OVERLAP_REPORT {
                overlaps.push(ContentOverlap {
                    first_id: a.id.clone(),
                    second_id: b.id.clone(),
                    similarity: sim,
                    recommendation: if sim > OVERLAP_REMOVE {
                        OverlapAction::Remove
                    } else {
                        OverlapAction::Review
                    },
                });
            }
        }
    }
    overlaps
}

//! Research merging: normalize, deduplicate, re-score, rank, truncate.
//!
//! # Algorithm
//!
//! 1. Normalize both populations. User documents are forced to document
//!    origin, starred, and `user-provided`.
//! 2. Find duplicates ([`find_duplicates`]) unless disabled.
//! 3. Exclude the losing side of every finding.
//! 4. Concatenate survivors (documents first when prioritized).
//! 5. Re-score every survivor with [`quality::score`].
//! 6. Stable priority sort ([`priority_cmp`]).
//! 7. Truncate to `max_sources`.
//! 8. Compute [`MergeStats`].
//!
//! Empty input is not an error: zero sources in, zero sources out, all
//! statistics zero.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dedup::{find_duplicates, DuplicateFinding, DuplicateType};
use crate::models::{FactCheckStatus, Origin, Source, SourceKind, SourceRecord};
use crate::quality;
use crate::thresholds::{DEFAULT_MAX_SOURCES, QUALITY_TIE_BAND};

/// Merge behavior switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    pub remove_duplicates: bool,
    /// Place documents ahead of web sources before sorting (tie-break input).
    pub prioritize_documents: bool,
    /// `None` keeps every source.
    pub max_sources: Option<usize>,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            remove_duplicates: true,
            prioritize_documents: true,
            max_sources: Some(DEFAULT_MAX_SOURCES),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InputStats {
    pub web_sources: usize,
    pub user_documents: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DuplicateStats {
    pub total_found: usize,
    pub exact: usize,
    pub high: usize,
    pub web_duplicates: usize,
    /// Distinct sources excluded by the findings.
    pub removed: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OutputStats {
    pub total_sources: usize,
    pub documents: usize,
    pub web: usize,
    pub synthesis: usize,
    pub starred: usize,
    pub verified: usize,
    pub total_words: usize,
    pub total_characters: usize,
    pub average_words_per_source: f64,
    pub average_quality: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeStats {
    pub input: InputStats,
    pub duplicates: DuplicateStats,
    pub output: OutputStats,
}

/// Ranked, deduplicated corpus plus what happened along the way.
#[derive(Debug, Clone, Serialize)]
pub struct MergeResult {
    pub sources: Vec<Source>,
    pub stats: MergeStats,
    pub duplicates_removed: usize,
    pub findings: Vec<DuplicateFinding>,
}

/// Merge web research and user documents into one ranked corpus.
pub fn merge_research_sources(
    web_sources: &[SourceRecord],
    user_documents: &[SourceRecord],
    options: &MergeOptions,
) -> MergeResult {
    let web: Vec<Source> = web_sources.iter().map(normalize_web).collect();
    let documents: Vec<Source> = user_documents.iter().map(normalize_document).collect();

    let findings = if options.remove_duplicates {
        find_duplicates(&web, &documents)
    } else {
        Vec::new()
    };

    // Only web sources are ever removed; documents always survive.
    let excluded: HashSet<usize> = findings.iter().map(|f| f.excluded_web).collect();
    for &i in &excluded {
        debug!(id = %web[i].id, "excluding duplicate web source");
    }

    let kept_web = web
        .iter()
        .enumerate()
        .filter(|(i, _)| !excluded.contains(i))
        .map(|(_, s)| s.clone());
    let kept_docs = documents.iter().cloned();

    let mut merged: Vec<Source> = if options.prioritize_documents {
        kept_docs.chain(kept_web).collect()
    } else {
        kept_web.chain(kept_docs).collect()
    };

    for source in &mut merged {
        source.quality_score = quality::score(source);
    }

    sort_by_priority(&mut merged);

    if let Some(max) = options.max_sources {
        merged.truncate(max);
    }

    let duplicates_removed = excluded.len();
    let stats = MergeStats {
        input: InputStats {
            web_sources: web.len(),
            user_documents: documents.len(),
            total: web.len() + documents.len(),
        },
        duplicates: duplicate_stats(&findings, duplicates_removed),
        output: output_stats(&merged),
    };

    info!(
        web = stats.input.web_sources,
        documents = stats.input.user_documents,
        duplicates_removed,
        output = stats.output.total_sources,
        "merged research sources"
    );

    MergeResult {
        sources: merged,
        stats,
        duplicates_removed,
        findings,
    }
}

fn normalize_web(record: &SourceRecord) -> Source {
    let mut source = Source::from_record(record, Origin::Web);
    source.quality_score = quality::score(&source);
    source
}

fn normalize_document(record: &SourceRecord) -> Source {
    let mut source = Source::from_record(record, Origin::Document);
    source.kind = SourceKind::Document;
    source.is_starred = true;
    source.fact_check = Some(FactCheckStatus::UserProvided);
    source.quality_score = quality::score(&source);
    source
}

/// Priority ordering; `Less` means `a` ranks ahead of `b`.
///
/// Keys, each consulted only on a tie of the previous ones: starred first,
/// higher origin rank, quality higher by more than [`QUALITY_TIE_BAND`],
/// more words. The quality dead band makes this relation non-transitive:
/// qualities 0.69, 0.73 and 0.77 with falling word counts form a cycle. When
/// that happens truncation may keep a source that compares below a dropped
/// one. Among sources whose qualities are equal or further apart than the
/// band, the order is total and truncation keeps the strongest.
pub fn priority_cmp(a: &Source, b: &Source) -> Ordering {
    b.is_starred
        .cmp(&a.is_starred)
        .then_with(|| b.origin().rank().cmp(&a.origin().rank()))
        .then_with(|| {
            let diff = b.quality_score - a.quality_score;
            if diff > QUALITY_TIE_BAND {
                Ordering::Greater
            } else if diff < -QUALITY_TIE_BAND {
                Ordering::Less
            } else {
                Ordering::Equal
            }
        })
        .then_with(|| b.word_count.cmp(&a.word_count))
}

/// Stable sort by [`priority_cmp`].
///
/// `slice::sort_by` requires a total order and may panic without one, so
/// this is an insertion sort; corpora are tens of sources.
pub fn sort_by_priority(sources: &mut [Source]) {
    for i in 1..sources.len() {
        let mut j = i;
        while j > 0 && priority_cmp(&sources[j - 1], &sources[j]) == Ordering::Greater {
            sources.swap(j - 1, j);
            j -= 1;
        }
    }
}

fn duplicate_stats(findings: &[DuplicateFinding], removed: usize) -> DuplicateStats {
    let count = |kind: DuplicateType| findings.iter().filter(|f| f.kind == kind).count();
    DuplicateStats {
        total_found: findings.len(),
        exact: count(DuplicateType::Exact),
        high: count(DuplicateType::High),
        web_duplicates: count(DuplicateType::WebDuplicate),
        removed,
    }
}

/// Aggregate counts and averages over a corpus. All zero when empty.
pub fn output_stats(sources: &[Source]) -> OutputStats {
    let total = sources.len();
    let by_origin = |origin: Origin| sources.iter().filter(|s| s.origin() == origin).count();
    let total_words: usize = sources.iter().map(|s| s.word_count).sum();
    let total_quality: f64 = sources.iter().map(|s| s.quality_score).sum();

    let (average_words_per_source, average_quality) = if total == 0 {
        (0.0, 0.0)
    } else {
        (
            total_words as f64 / total as f64,
            total_quality / total as f64,
        )
    };

    OutputStats {
        total_sources: total,
        documents: by_origin(Origin::Document),
        web: by_origin(Origin::Web),
        synthesis: by_origin(Origin::Synthesis),
        starred: sources.iter().filter(|s| s.is_starred).count(),
        verified: sources.iter().filter(|s| s.is_verified()).count(),
        total_words,
        total_characters: sources.iter().map(Source::content_length).sum(),
        average_words_per_source,
        average_quality,
    }
}

//! Duplicate detection across the web and user-document populations.
//!
//! Two passes over already-normalized sources:
//!
//! 1. **Cross-origin**: every (document, web) pair above
//!    [`CROSS_ORIGIN_DUPLICATE`] is a duplicate; the document is always kept.
//! 2. **Intra-web**: every web pair `(i, j)` with `i < j` above the stricter
//!    [`INTRA_WEB_DUPLICATE`] is a duplicate; the higher-quality record is
//!    kept, ties going to the earlier one.
//!
//! The cost is `O(n·m + k²)`, fine for the tens of sources a research run
//! produces.

use serde::Serialize;
use tracing::debug;

use crate::models::Source;
use crate::similarity::similarity;
use crate::thresholds::{CROSS_ORIGIN_DUPLICATE, EXACT_DUPLICATE, INTRA_WEB_DUPLICATE};

/// How a duplicate pair was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateType {
    /// Cross-origin pair above [`EXACT_DUPLICATE`].
    Exact,
    /// Cross-origin pair above [`CROSS_ORIGIN_DUPLICATE`].
    High,
    /// Two web sources above [`INTRA_WEB_DUPLICATE`].
    WebDuplicate,
}

/// Which record of a duplicate pair survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateAction {
    KeepDocument,
    KeepFirst,
    KeepSecond,
}

/// A detected duplicate pair.
///
/// For cross-origin findings `first_id` is the document and `second_id` the
/// web source. The removed record is always a web source; it is identified by
/// position because ids from independent producers can collide.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateFinding {
    pub first_id: String,
    pub second_id: String,
    pub similarity: f64,
    #[serde(rename = "type")]
    pub kind: DuplicateType,
    pub action: DuplicateAction,
    pub reason: String,
    /// Index into the web slice of the record this finding removes.
    #[serde(skip)]
    pub excluded_web: usize,
}

impl DuplicateFinding {
    /// The id this finding removes from the corpus.
    pub fn excluded_id(&self) -> &str {
        match self.action {
            DuplicateAction::KeepDocument | DuplicateAction::KeepFirst => &self.second_id,
            DuplicateAction::KeepSecond => &self.first_id,
        }
    }
}

/// Find duplicate pairs. Findings are ordered cross-origin first, then
/// intra-web, each in input order.
pub fn find_duplicates(web: &[Source], documents: &[Source]) -> Vec<DuplicateFinding> {
    let mut findings = Vec::new();

    for doc in documents {
        for (wi, w) in web.iter().enumerate() {
            let sim = similarity(doc, w);
            if sim > CROSS_ORIGIN_DUPLICATE {
                let kind = if sim > EXACT_DUPLICATE {
                    DuplicateType::Exact
                } else {
                    DuplicateType::High
                };
                debug!(document = %doc.id, web = %w.id, similarity = sim, "document duplicates web source");
                findings.push(DuplicateFinding {
                    first_id: doc.id.clone(),
                    second_id: w.id.clone(),
                    similarity: sim,
                    kind,
                    action: DuplicateAction::KeepDocument,
                    reason: format!(
                        "User document \"{}\" overlaps web source \"{}\" ({:.0}% similar); keeping the document",
                        doc.title,
                        w.title,
                        sim * 100.0
                    ),
                    excluded_web: wi,
                });
            }
        }
    }

    for (i, a) in web.iter().enumerate() {
        for (j, b) in web.iter().enumerate().skip(i + 1) {
            let sim = similarity(a, b);
            if sim > INTRA_WEB_DUPLICATE {
                let (action, kept, excluded_web) = if b.quality_score > a.quality_score {
                    (DuplicateAction::KeepSecond, b, i)
                } else {
                    (DuplicateAction::KeepFirst, a, j)
                };
                debug!(first = %a.id, second = %b.id, kept = %kept.id, similarity = sim, "web sources duplicate");
                findings.push(DuplicateFinding {
                    first_id: a.id.clone(),
                    second_id: b.id.clone(),
                    similarity: sim,
                    kind: DuplicateType::WebDuplicate,
                    action,
                    reason: format!(
                        "Web sources \"{}\" and \"{}\" are {:.0}% similar; keeping the higher quality \"{}\"",
                        a.title,
                        b.title,
                        sim * 100.0,
                        kept.title
                    ),
                    excluded_web,
                });
            }
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Origin, SourceRecord};

    const SHARED: &str = "Solar panels convert sunlight into electricity using photovoltaic cells mounted on rooftops. ";
    const OTHER: &str = "Medieval castles featured moats drawbridges battlements and towering stone keeps. ";

    fn source(id: &str, origin: Origin, content: &str, quality: f64) -> Source {
        let record = SourceRecord {
            id: Some(id.to_string()),
            source_title: id.to_uppercase(),
            source_content: content.to_string(),
            ..Default::default()
        };
        let mut s = Source::from_record(&record, origin);
        s.quality_score = quality;
        s
    }

    #[test]
    fn test_no_duplicates() {
        let web = vec![source("w1", Origin::Web, &SHARED.repeat(4), 0.6)];
        let docs = vec![source("d1", Origin::Document, &OTHER.repeat(4), 0.7)];
        assert!(find_duplicates(&web, &docs).is_empty());
    }

    #[test]
    fn test_cross_origin_exact_keeps_document() {
        let web = vec![source("w1", Origin::Web, &SHARED.repeat(4), 0.9)];
        let docs = vec![source("d1", Origin::Document, &SHARED.repeat(4), 0.3)];
        let findings = find_duplicates(&web, &docs);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, DuplicateType::Exact);
        assert_eq!(findings[0].action, DuplicateAction::KeepDocument);
        assert_eq!(findings[0].excluded_id(), "w1");
        assert_eq!(findings[0].excluded_web, 0);
    }

    #[test]
    fn test_cross_origin_high() {
        // 3 shared significant words out of 4 → 0.75
        let web = vec![source("w1", Origin::Web, "widgets great home", 0.6)];
        let docs = vec![source("d1", Origin::Document, "widgets great home office", 0.7)];
        let findings = find_duplicates(&web, &docs);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, DuplicateType::High);
    }

    #[test]
    fn test_intra_web_keeps_higher_quality() {
        let web = vec![
            source("w1", Origin::Web, &SHARED.repeat(4), 0.5),
            source("w2", Origin::Web, &SHARED.repeat(4), 0.8),
        ];
        let findings = find_duplicates(&web, &[]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, DuplicateType::WebDuplicate);
        assert_eq!(findings[0].action, DuplicateAction::KeepSecond);
        assert_eq!(findings[0].excluded_id(), "w1");
    }

    #[test]
    fn test_intra_web_tie_keeps_first() {
        let web = vec![
            source("w1", Origin::Web, &SHARED.repeat(4), 0.6),
            source("w2", Origin::Web, &SHARED.repeat(4), 0.6),
        ];
        let findings = find_duplicates(&web, &[]);
        assert_eq!(findings[0].action, DuplicateAction::KeepFirst);
        assert_eq!(findings[0].excluded_id(), "w2");
        assert_eq!(findings[0].excluded_web, 1);
    }

    #[test]
    fn test_colliding_web_ids_resolved_by_position() {
        let web = vec![
            source("1", Origin::Web, &SHARED.repeat(4), 0.8),
            source("1", Origin::Web, &SHARED.repeat(4), 0.5),
        ];
        let findings = find_duplicates(&web, &[]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].excluded_web, 1);
    }

    #[test]
    fn test_intra_web_threshold_stricter() {
        // 3 of 4 words shared → 0.75: a cross-origin duplicate, not a web one
        let web = vec![
            source("w1", Origin::Web, "widgets great home", 0.6),
            source("w2", Origin::Web, "widgets great home office", 0.6),
        ];
        assert!(find_duplicates(&web, &[]).is_empty());
    }

    #[test]
    fn test_finding_order() {
        let web = vec![
            source("w1", Origin::Web, &SHARED.repeat(4), 0.6),
            source("w2", Origin::Web, &SHARED.repeat(4), 0.6),
        ];
        let docs = vec![source("d1", Origin::Document, &SHARED.repeat(4), 0.7)];
        let findings = find_duplicates(&web, &docs);
        let kinds: Vec<DuplicateType> = findings.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DuplicateType::Exact,
                DuplicateType::Exact,
                DuplicateType::WebDuplicate
            ]
        );
    }
}

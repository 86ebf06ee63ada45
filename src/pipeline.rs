//! One-shot merge-then-validate, as the script-generation handler runs it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::adequacy::{calculate_adequacy_percentage, validate_research_for_duration, ValidationResult};
use crate::merge::{merge_research_sources, MergeOptions, MergeResult};
use crate::models::SourceRecord;

/// Outcome of [`assess`]: the ranked corpus and the go/no-go verdict.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub merge: MergeResult,
    pub validation: ValidationResult,
    pub adequacy_percentage: u8,
    pub assessed_at: DateTime<Utc>,
}

impl Assessment {
    pub fn is_adequate(&self) -> bool {
        self.validation.is_adequate
    }
}

/// Merge both populations, then validate the merged corpus for `duration_minutes`.
pub fn assess(
    web_sources: &[SourceRecord],
    user_documents: &[SourceRecord],
    duration_minutes: u32,
    options: &MergeOptions,
) -> Assessment {
    let merge = merge_research_sources(web_sources, user_documents, options);
    let validation =
        validate_research_for_duration(&merge.sources, duration_minutes, !user_documents.is_empty());
    let adequacy_percentage = calculate_adequacy_percentage(&validation);

    Assessment {
        merge,
        validation,
        adequacy_percentage,
        assessed_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assess_empty() {
        let a = assess(&[], &[], 45, &MergeOptions::default());
        assert!(!a.is_adequate());
        assert_eq!(a.merge.sources.len(), 0);
        assert_eq!(a.adequacy_percentage, 0);
    }

    #[test]
    fn test_assess_passes_document_flag() {
        let doc = SourceRecord {
            id: Some("d".to_string()),
            source_content: "Internal findings on widget durability.".to_string(),
            ..Default::default()
        };
        let a = assess(&[], &[doc], 60, &MergeOptions::default());
        assert_eq!(a.validation.current.documents, 1);
        assert!(!a
            .validation
            .recommendations
            .iter()
            .any(|r| r.action == crate::adequacy::RecommendedAction::UploadSpecializedDocuments));
    }
}

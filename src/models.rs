//! Core data models used throughout the research pipeline.
//!
//! [`SourceRecord`] is the loosely-typed shape producers hand us (every field
//! but the content may be missing). [`Source`] is the normalized, typed record
//! the merger, scorer, and validator operate on.

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::text::{count_words, normalize, Fingerprint};

/// Raw source record as produced by web research or document upload.
///
/// Deserialization never fails on a single field: `null` or a value of the
/// wrong type falls back to the field's default, so one noisy record cannot
/// reject the batch it arrived in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceRecord {
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub source_content: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub source_title: String,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_count", skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    #[serde(default, deserialize_with = "lenient::opt_float", skip_serializing_if = "Option::is_none")]
    pub relevance: Option<f64>,
    #[serde(default, deserialize_with = "lenient::boolean")]
    pub is_starred: bool,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub fact_check_status: Option<String>,
    /// Written on output; never read back as a score.
    #[serde(default, deserialize_with = "lenient::opt_float", skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
}

/// Field deserializers that coerce malformed values instead of failing.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn text(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            // Integer keys from upstream tables.
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(text(Value::deserialize(d)?).unwrap_or_default())
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(text(Value::deserialize(d)?))
    }

    pub fn boolean<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Bool(b) => b,
            Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
            _ => false,
        })
    }

    /// Floats are floored, negatives become zero.
    pub fn opt_count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<usize>, D::Error> {
        let n = match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        Ok(n.filter(|n| n.is_finite()).map(|n| n.max(0.0).floor() as usize))
    }

    pub fn opt_float<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
    }
}

/// Where a source came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Web,
    Document,
    Synthesis,
    Unknown,
}

impl Origin {
    /// Parse a `source_type` label. `user` is accepted for documents.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "web" => Origin::Web,
            "document" | "user" => Origin::Document,
            "synthesis" => Origin::Synthesis,
            _ => Origin::Unknown,
        }
    }

    /// Ordering priority: document > synthesis > web > anything else.
    pub fn rank(self) -> u8 {
        match self {
            Origin::Document => 3,
            Origin::Synthesis => 2,
            Origin::Web => 1,
            Origin::Unknown => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Origin::Web => "web",
            Origin::Document => "document",
            Origin::Synthesis => "synthesis",
            Origin::Unknown => "unknown",
        }
    }
}

/// Origin-specific data carried by a [`Source`].
#[derive(Debug, Clone, PartialEq)]
pub enum SourceKind {
    Web { url: Option<String> },
    Document,
    Synthesis,
    /// An origin label we do not recognize, kept for round-tripping.
    Unknown { label: String },
}

impl SourceKind {
    pub fn origin(&self) -> Origin {
        match self {
            SourceKind::Web { .. } => Origin::Web,
            SourceKind::Document => Origin::Document,
            SourceKind::Synthesis => Origin::Synthesis,
            SourceKind::Unknown { .. } => Origin::Unknown,
        }
    }

    fn label(&self) -> &str {
        match self {
            SourceKind::Unknown { label } => label,
            other => other.origin().as_str(),
        }
    }

    fn url(&self) -> Option<&str> {
        match self {
            SourceKind::Web { url } => url.as_deref(),
            _ => None,
        }
    }
}

/// Verification state of a source's claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FactCheckStatus {
    Verified,
    UserProvided,
}

impl FactCheckStatus {
    fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "verified" => Some(FactCheckStatus::Verified),
            "user-provided" | "user_provided" => Some(FactCheckStatus::UserProvided),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            FactCheckStatus::Verified => "verified",
            FactCheckStatus::UserProvided => "user-provided",
        }
    }
}

/// A normalized research source.
///
/// Serializes as its wire-shape [`SourceRecord`].
#[derive(Debug, Clone, Serialize)]
#[serde(into = "SourceRecord")]
pub struct Source {
    pub id: String,
    pub kind: SourceKind,
    pub title: String,
    pub content: String,
    /// Supplied word count, or the whitespace token count of `content`.
    pub word_count: usize,
    /// Topical fit in `[0, 1]`, when the retrieval step estimated one.
    pub relevance: Option<f64>,
    pub is_starred: bool,
    pub fact_check: Option<FactCheckStatus>,
    /// Recomputed every time the merger runs.
    pub quality_score: f64,
    pub normalized_content: String,
    pub fingerprint: Option<Fingerprint>,
}

impl Source {
    /// Normalize a raw record, filling every missing field with a default.
    ///
    /// `default_origin` applies when the record carries no `source_type`.
    pub fn from_record(record: &SourceRecord, default_origin: Origin) -> Self {
        let id = match record.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                let generated = Uuid::new_v4().to_string();
                warn!(id = %generated, "source record without id; generated one");
                generated
            }
        };

        let kind = match record.source_type.as_deref() {
            Some(label) => kind_for(Origin::parse(label), label, record),
            None => kind_for(default_origin, default_origin.as_str(), record),
        };

        let relevance = record.relevance.filter(|r| r.is_finite()).map(|r| {
            if !(0.0..=1.0).contains(&r) {
                warn!(id = %id, relevance = r, "relevance outside [0, 1]; clamping");
            }
            r.clamp(0.0, 1.0)
        });

        let normalized_content = normalize(&record.source_content);
        let fingerprint = Fingerprint::from_normalized(&normalized_content);

        Self {
            id,
            kind,
            title: record.source_title.clone(),
            word_count: record
                .word_count
                .unwrap_or_else(|| count_words(&record.source_content)),
            content: record.source_content.clone(),
            relevance,
            is_starred: record.is_starred,
            fact_check: record
                .fact_check_status
                .as_deref()
                .and_then(FactCheckStatus::parse),
            quality_score: crate::thresholds::NEUTRAL_QUALITY,
            normalized_content,
            fingerprint,
        }
    }

    pub fn origin(&self) -> Origin {
        self.kind.origin()
    }

    pub fn url(&self) -> Option<&str> {
        self.kind.url()
    }

    /// Content length in chars.
    pub fn content_length(&self) -> usize {
        self.content.chars().count()
    }

    pub fn is_verified(&self) -> bool {
        self.fact_check == Some(FactCheckStatus::Verified)
    }

    /// Render back into the wire shape, including the current quality score.
    pub fn to_record(&self) -> SourceRecord {
        SourceRecord {
            id: Some(self.id.clone()),
            source_type: Some(self.kind.label().to_string()),
            source_content: self.content.clone(),
            source_title: self.title.clone(),
            source_url: self.url().map(str::to_string),
            word_count: Some(self.word_count),
            relevance: self.relevance,
            is_starred: self.is_starred,
            fact_check_status: self.fact_check.map(|f| f.as_str().to_string()),
            quality_score: Some(self.quality_score),
        }
    }
}

impl From<Source> for SourceRecord {
    fn from(source: Source) -> Self {
        source.to_record()
    }
}

fn kind_for(origin: Origin, label: &str, record: &SourceRecord) -> SourceKind {
    match origin {
        Origin::Web => SourceKind::Web {
            url: record
                .source_url
                .as_deref()
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(str::to_string),
        },
        Origin::Document => SourceKind::Document,
        Origin::Synthesis => SourceKind::Synthesis,
        Origin::Unknown => SourceKind::Unknown {
            label: label.trim().to_string(),
        },
    }
}

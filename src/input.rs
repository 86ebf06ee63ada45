//! Reading source records from JSON files.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::Path;
use tracing::warn;

use crate::models::SourceRecord;

/// Parse a JSON array of records, or an object with a `sources` array.
///
/// Only the outer shape can fail. Entries that are not objects are skipped
/// with a warning; malformed fields inside a record fall back to defaults.
pub fn parse_sources(json: &str) -> Result<Vec<SourceRecord>> {
    let value: Value = serde_json::from_str(json).context("Sources are not valid JSON")?;
    records_from_value(value)
}

fn records_from_value(value: Value) -> Result<Vec<SourceRecord>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("sources") {
            Some(Value::Array(items)) => items,
            Some(other) => bail!("`sources` must be an array, found {}", type_name(&other)),
            None => bail!("Expected a JSON array of source records or an object with a `sources` array"),
        },
        other => bail!(
            "Expected a JSON array of source records or an object with a `sources` array, found {}",
            type_name(&other)
        ),
    };

    Ok(collect_records(items))
}

/// Convert array entries into records, skipping any that cannot be one.
pub fn collect_records(items: Vec<Value>) -> Vec<SourceRecord> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            if !item.is_object() {
                warn!(index, found = type_name(&item), "skipping source entry that is not an object");
                return None;
            }
            match serde_json::from_value(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(index, error = %e, "skipping unreadable source record");
                    None
                }
            }
        })
        .collect()
}

/// `deserialize_with` helper for record arrays embedded in request bodies.
/// `null` reads as an empty list.
pub fn deserialize_records<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<SourceRecord>, D::Error> {
    let items = Option::<Vec<Value>>::deserialize(d)?.unwrap_or_default();
    Ok(collect_records(items))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub fn read_sources(path: &Path) -> Result<Vec<SourceRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read sources file: {}", path.display()))?;
    parse_sources(&content).with_context(|| format!("Invalid sources file: {}", path.display()))
}

/// Like [`read_sources`], but a missing argument means no sources.
pub fn read_optional_sources(path: Option<&Path>) -> Result<Vec<SourceRecord>> {
    match path {
        Some(p) => read_sources(p),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_array() {
        let records = parse_sources(r#"[{"id": "a", "source_content": "x"}]"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id.as_deref(), Some("a"));
    }

    #[test]
    fn test_parse_wrapped() {
        let records = parse_sources(r#"{"sources": []}"#).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_rejects_scalar() {
        assert!(parse_sources("42").is_err());
    }

    #[test]
    fn test_noisy_record_does_not_reject_batch() {
        let records = parse_sources(
            r#"[{"id":"a","source_content":"good source text here"},
                {"id":"b","source_content":"noisy","is_starred":null,"source_title":null,"word_count":523.0}]"#,
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].word_count, Some(523));
        assert!(!records[1].is_starred);
    }

    #[test]
    fn test_non_object_entries_skipped() {
        let records = parse_sources(r#"{"sources": [null, "text", {"id": "a"}]}"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id.as_deref(), Some("a"));
    }

    #[test]
    fn test_wrapped_sources_must_be_array() {
        let err = parse_sources(r#"{"sources": 3}"#).unwrap_err();
        assert!(err.to_string().contains("`sources` must be an array"));
    }

    #[test]
    fn test_missing_path_is_empty() {
        assert!(read_optional_sources(None).unwrap().is_empty());
    }

    #[test]
    fn test_read_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("web.json");
        std::fs::write(&path, r#"[{"source_content": "a"}, {"source_content": "b"}]"#).unwrap();
        assert_eq!(read_sources(&path).unwrap().len(), 2);
    }
}

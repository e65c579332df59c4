//! Reading extractor output: a JSON array, a single object, or JSON Lines.

use crate::record::RawAttributeRecord;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read extractor output: {0}")]
    Read(#[from] std::io::Error),
    #[error("extractor payload is not valid JSON even after repair: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("extractor payload must be an object or an array of objects, got {kind}")]
    UnexpectedTopLevel { kind: &'static str },
}

#[derive(Debug, Default)]
pub struct IngestedBatch {
    pub records: Vec<RawAttributeRecord>,
    /// Payloads that could not be parsed and were left out.
    pub skipped: usize,
}

/// Strips markdown code fences and truncates trailing garbage after the last
/// closing brace.
pub fn repair_extractor_json(text: &str) -> String {
    let mut repaired = text.trim().to_string();

    if repaired.starts_with("```json") {
        repaired = repaired
            .replace("```json", "")
            .replace("```", "")
            .trim()
            .to_string();
    } else if repaired.starts_with("```") {
        repaired = repaired.trim_matches('`').trim().to_string();
    }

    if !repaired.ends_with('}') {
        if let Some(last_brace) = repaired.rfind('}').filter(|index| *index > 0) {
            repaired.truncate(last_brace + 1);
        }
    }

    repaired
}

/// Parses one extractor response into records. An object yields one record;
/// an array yields one per object element.
pub fn parse_extractor_payload(text: &str) -> Result<Vec<RawAttributeRecord>, IngestError> {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(_) => serde_json::from_str(&repair_extractor_json(text))
            .map_err(IngestError::Malformed)?,
    };

    match value {
        Value::Object(_) => Ok(vec![record_from_value(value)?]),
        Value::Array(items) => items
            .into_iter()
            .filter(|item| !item.is_null())
            .map(record_from_value)
            .collect(),
        other => Err(IngestError::UnexpectedTopLevel {
            kind: json_kind(&other),
        }),
    }
}

fn record_from_value(value: Value) -> Result<RawAttributeRecord, IngestError> {
    if !value.is_object() {
        return Err(IngestError::UnexpectedTopLevel {
            kind: json_kind(&value),
        });
    }
    serde_json::from_value(value).map_err(IngestError::Malformed)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Reads a whole document, falling back to JSON Lines when it does not parse
/// as a single payload. A fenced or otherwise damaged single response is
/// repaired as a whole. Unparseable lines are skipped and counted.
pub fn read_records<R: Read>(mut reader: R) -> Result<IngestedBatch, IngestError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;

    if text.trim().is_empty() {
        return Ok(IngestedBatch::default());
    }

    if serde_json::from_str::<Value>(&text).is_ok() {
        return Ok(IngestedBatch {
            records: parse_extractor_payload(&text)?,
            skipped: 0,
        });
    }

    if text.trim_start().starts_with("```") {
        if let Ok(records) = parse_extractor_payload(&text) {
            return Ok(IngestedBatch {
                records,
                skipped: 0,
            });
        }
    }

    let batch = read_json_lines(&text);
    if !batch.records.is_empty() {
        return Ok(batch);
    }

    // Nothing parsed line by line; a pretty-printed response with trailing
    // garbage still repairs as one payload.
    match parse_extractor_payload(&text) {
        Ok(records) => Ok(IngestedBatch {
            records,
            skipped: 0,
        }),
        Err(_) => Ok(batch),
    }
}

fn read_json_lines(text: &str) -> IngestedBatch {
    let mut batch = IngestedBatch::default();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_extractor_payload(line) {
            Ok(records) => batch.records.extend(records),
            Err(err) => {
                warn!(line = index + 1, error = %err, "skipping extractor payload");
                batch.skipped += 1;
            }
        }
    }

    batch
}

pub fn read_records_from_path(path: impl AsRef<Path>) -> Result<IngestedBatch, IngestError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let batch = read_records(BufReader::new(file))?;

    info!(
        path = %path.display(),
        records = batch.records.len(),
        skipped = batch.skipped,
        "loaded extractor output"
    );
    Ok(batch)
}

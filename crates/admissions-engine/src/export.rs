//! Writers for canonical records.

use crate::record::CanonicalFeatureRecord;
use std::io::Write;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Csv,
    Jsonl,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to serialize record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

pub fn write_records<'a, W, I>(
    format: OutputFormat,
    records: I,
    writer: W,
) -> Result<(), ExportError>
where
    W: Write,
    I: IntoIterator<Item = &'a CanonicalFeatureRecord>,
{
    match format {
        OutputFormat::Csv => write_csv(records, writer),
        OutputFormat::Jsonl => write_jsonl(records, writer),
    }
}

/// One header row followed by one row per record. Undetermined values are
/// written as empty cells.
pub fn write_csv<'a, W, I>(records: I, writer: W) -> Result<(), ExportError>
where
    W: Write,
    I: IntoIterator<Item = &'a CanonicalFeatureRecord>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_jsonl<'a, W, I>(records: I, mut writer: W) -> Result<(), ExportError>
where
    W: Write,
    I: IntoIterator<Item = &'a CanonicalFeatureRecord>,
{
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::RecordNormalizer;
    use crate::record::RawAttributeRecord;
    use serde_json::{json, Value};

    fn sample() -> CanonicalFeatureRecord {
        let raw: RawAttributeRecord = serde_json::from_value(json!({
            "original_post_id": "p1",
            "undergrad_institution": "MIT",
            "schools_applied": ["Yale"],
        }))
        .expect("raw record deserializes");
        RecordNormalizer::bundled()
            .expect("bundled reference data loads")
            .normalize(&raw)
            .record
    }

    #[test]
    fn jsonl_keeps_every_key_including_nulls() {
        let mut buffer = Vec::new();
        write_jsonl([&sample()], &mut buffer).expect("jsonl writes");
        let text = String::from_utf8(buffer).expect("utf8 output");
        let value: Value = serde_json::from_str(text.trim_end()).expect("line parses");

        assert_eq!(value["undergrad_rank"], json!(1));
        assert_eq!(value["phd_outcome"], json!("no_offer"));
        assert!(value.get("phd_accepted_rank").is_some_and(Value::is_null));
        assert!(value.get("gre_quant_std").is_some_and(Value::is_null));
    }

    #[test]
    fn csv_has_header_and_empty_cells_for_nulls() {
        let mut buffer = Vec::new();
        write_records(OutputFormat::Csv, [&sample()], &mut buffer).expect("csv writes");
        let text = String::from_utf8(buffer).expect("utf8 output");
        let mut lines = text.lines();

        let header = lines.next().expect("header row");
        assert!(header.starts_with("source_id,undergrad_gpa_std,grad_gpa_std"));
        let row = lines.next().expect("data row");
        assert!(row.starts_with("p1,,,false"));
        assert!(row.contains("no_offer"));
    }
}

//! CSV persistence for graded records.
//!
//! Appends graded rows to CSV and reads `id,score[,weight]` score sheets.

use crate::error::Result;
use crate::model::GradeValue;
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::Path;
use tracing::debug;

/// One graded row as written to CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeRecord {
    pub timestamp: DateTime<Utc>,
    pub id: String,
    pub numeric_value: Decimal,
    pub text_value: String,
    pub grading_system: String,
    pub weight: Decimal,
}

impl GradeRecord {
    pub fn new(id: impl Into<String>, value: &GradeValue, weight: Decimal) -> Self {
        Self {
            timestamp: Utc::now(),
            id: id.into(),
            numeric_value: value.numeric_value(),
            text_value: value.text_value().to_string(),
            grading_system: value.grading_system().to_string(),
            weight,
        }
    }
}

/// An input row of `id,score[,weight]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoreRow {
    pub id: String,
    pub score: Decimal,
    #[serde(default = "default_weight")]
    pub weight: Decimal,
}

fn default_weight() -> Decimal {
    Decimal::ONE
}

/// Appends a [`GradeRecord`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: impl AsRef<Path>, record: &GradeRecord) -> Result<()> {
    append_records(path, std::slice::from_ref(record))
}

pub fn append_records(path: impl AsRef<Path>, records: &[GradeRecord]) -> Result<()> {
    let path = path.as_ref();
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, rows = records.len(), "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}

/// Reads `id,score[,weight]` rows from a headed CSV file.
pub fn read_score_rows(path: impl AsRef<Path>) -> Result<Vec<ScoreRow>> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_path(path.as_ref())?;

    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

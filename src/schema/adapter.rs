//! Batch parsing and validation of record rows
//!
//! Row exports arrive either as a JSON array or as NDJSON (one row per line).

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::warn;

use crate::error::TaxonomyError;
use crate::schema::record::{Record, RecordRow};

/// Adapter for converting record rows to typed records
pub struct RecordRowAdapter;

impl RecordRowAdapter {
    /// Parse a JSON string containing an array of rows
    pub fn parse_array(json: &str) -> Result<Vec<RecordRow>, TaxonomyError> {
        let rows: Vec<RecordRow> = serde_json::from_str(json)?;
        Ok(rows)
    }

    /// Parse NDJSON (newline-delimited JSON) containing rows
    pub fn parse_ndjson(ndjson: &str) -> Result<Vec<RecordRow>, TaxonomyError> {
        let mut rows = Vec::new();
        for (line_num, line) in ndjson.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<RecordRow>(trimmed) {
                Ok(row) => rows.push(row),
                Err(e) => {
                    return Err(TaxonomyError::Parse(format!(
                        "Failed to parse line {}: {}",
                        line_num + 1,
                        e
                    )));
                }
            }
        }
        Ok(rows)
    }

    /// Convert rows to records, failing on the first invalid row
    pub fn to_records(rows: Vec<RecordRow>) -> Result<Vec<Record>, TaxonomyError> {
        rows.into_iter()
            .map(|row| {
                let id = row.id;
                Record::try_from(row).map_err(|e| {
                    warn!(record_id = id, error = %e, "rejected record row");
                    e
                })
            })
            .collect()
    }

    /// Convert the valid rows and report the invalid ones
    pub fn partition(rows: Vec<RecordRow>) -> (Vec<Record>, Vec<RowValidation>) {
        let mut records = Vec::with_capacity(rows.len());
        let mut rejected = Vec::new();

        for (index, row) in rows.into_iter().enumerate() {
            let id = row.id;
            match Record::try_from(row) {
                Ok(record) => records.push(record),
                Err(error) => {
                    warn!(record_id = id, index, error = %error, "skipping record row");
                    rejected.push(RowValidation { index, id, error });
                }
            }
        }

        (records, rejected)
    }

    /// Validate a batch of rows, returning only the failures
    pub fn validate_rows(rows: &[RecordRow]) -> Vec<RowValidation> {
        rows.iter()
            .enumerate()
            .filter_map(|(index, row)| {
                Record::try_from(row.clone())
                    .err()
                    .map(|error| RowValidation {
                        index,
                        id: row.id,
                        error,
                    })
            })
            .collect()
    }
}

/// A row that failed validation
#[derive(Debug)]
pub struct RowValidation {
    /// Position of the row in its batch
    pub index: usize,
    pub id: i64,
    pub error: TaxonomyError,
}

// Serialized as `{index, id, code, message}`
impl Serialize for RowValidation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("RowValidation", 4)?;
        state.serialize_field("index", &self.index)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("code", self.error.code())?;
        state.serialize_field("message", &self.error.to_string())?;
        state.end()
    }
}

//! Persisted record rows and typed records

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TaxonomyError;
use crate::schema::attributes::AttributePayload;
use crate::types::RecordType;

/// Wire format of record dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Wire format of record times
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// A record row as delivered by the persistence layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordRow {
    pub id: i64,
    pub baby_profile_id: i64,
    /// Record type name, unchecked
    #[serde(rename = "type")]
    pub record_type: String,
    /// Start date (YYYY-MM-DD)
    pub date: String,
    /// Start time (HH:MM:SS)
    pub time: String,
    /// Untagged attribute JSON
    #[serde(default)]
    pub attributes: Value,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A validated record: known type, parsed start, payload matching the type's group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub id: i64,
    pub baby_profile_id: i64,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub attributes: AttributePayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Record {
    /// Build a record, checking the payload against the type's group
    pub fn new(
        id: i64,
        baby_profile_id: i64,
        record_type: RecordType,
        date: NaiveDate,
        time: NaiveTime,
        attributes: AttributePayload,
    ) -> Result<Self, TaxonomyError> {
        attributes.check_for(record_type)?;

        Ok(Self {
            id,
            baby_profile_id,
            record_type,
            date,
            time,
            attributes,
            notes: None,
        })
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Start of the record (its own date and time)
    pub fn start(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Convert back to the persisted row shape
    pub fn into_row(self) -> RecordRow {
        RecordRow {
            id: self.id,
            baby_profile_id: self.baby_profile_id,
            record_type: self.record_type.as_str().to_string(),
            date: self.date.format(DATE_FORMAT).to_string(),
            time: self.time.format(TIME_FORMAT).to_string(),
            attributes: self.attributes.to_json(),
            notes: self.notes,
        }
    }
}

impl TryFrom<RecordRow> for Record {
    type Error = TaxonomyError;

    fn try_from(row: RecordRow) -> Result<Self, Self::Error> {
        let record_type: RecordType = row.record_type.parse()?;
        let date = parse_date(&row.date)?;
        let time = parse_time(&row.time)?;
        let attributes = AttributePayload::for_type(record_type, &row.attributes)?;

        Ok(Record {
            id: row.id,
            baby_profile_id: row.baby_profile_id,
            record_type,
            date,
            time,
            attributes,
            notes: row.notes,
        })
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate, TaxonomyError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| TaxonomyError::DateParse(format!("invalid date '{}': {}", s, e)))
}

/// Parse a `HH:MM:SS` time; fractional seconds and bare `HH:MM` are accepted
pub fn parse_time(s: &str) -> Result<NaiveTime, TaxonomyError> {
    let trimmed = s.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|e| TaxonomyError::DateParse(format!("invalid time '{}': {}", s, e)))
}

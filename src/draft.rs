//! Record drafts for the record editor
//!
//! A draft holds the editable, not yet persisted state of a record. New
//! drafts start at the current date and time with the type's default
//! attributes; the form chosen for editing follows the type's group.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::TaxonomyError;
use crate::schema::{Record, RecordRow, DATE_FORMAT, TIME_FORMAT};
use crate::taxonomy::{group_of, info_of};
use crate::types::{RecordGroup, RecordType};

/// Editable state of a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDraft {
    pub baby_profile_id: i64,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub date: NaiveDate,
    pub time: NaiveTime,
    /// Attribute JSON as edited; checked when the draft becomes a record
    pub attributes: Value,
    #[serde(default)]
    pub notes: Option<String>,
}

impl RecordDraft {
    /// Seed a new record of `record_type` starting at `now`
    pub fn new(record_type: RecordType, baby_profile_id: i64, now: NaiveDateTime) -> Self {
        let time = now.time().with_nanosecond(0).unwrap_or_else(|| now.time());
        debug!(record_type = %record_type, baby_profile_id, "seeding record draft");

        Self {
            baby_profile_id,
            record_type,
            date: now.date(),
            time,
            attributes: info_of(record_type).attributes.to_json(),
            notes: None,
        }
    }

    /// Start editing an existing record
    pub fn from_record(record: &Record) -> Self {
        Self {
            baby_profile_id: record.baby_profile_id,
            record_type: record.record_type,
            date: record.date,
            time: record.time,
            attributes: record.attributes.to_json(),
            notes: record.notes.clone(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_attributes(mut self, attributes: Value) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_start(mut self, start: NaiveDateTime) -> Self {
        self.date = start.date();
        self.time = start.time();
        self
    }

    /// Which specialized form edits this draft
    pub fn form_group(&self) -> RecordGroup {
        group_of(self.record_type)
    }

    /// Persisted row shape under `id`
    pub fn into_row(self, id: i64) -> RecordRow {
        RecordRow {
            id,
            baby_profile_id: self.baby_profile_id,
            record_type: self.record_type.as_str().to_string(),
            date: self.date.format(DATE_FORMAT).to_string(),
            time: self.time.format(TIME_FORMAT).to_string(),
            attributes: self.attributes,
            notes: self.notes,
        }
    }

    /// Check the draft and turn it into a record stored under `id`
    pub fn into_record(self, id: i64) -> Result<Record, TaxonomyError> {
        Record::try_from(self.into_row(id))
    }
}

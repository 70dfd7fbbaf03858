//! Attribute summaries for record list items
//!
//! One line per record: growth records show their measurement, sleep records
//! their duration, every other group the `-` placeholder.

use chrono::{NaiveDate, NaiveTime};
use serde_json::Value;

use crate::display::format_measure;
use crate::error::TaxonomyError;
use crate::schema::{parse_date, parse_time, AttributePayload, Record};
use crate::taxonomy::group_of;
use crate::types::{RecordGroup, RecordType, SleepAttributes};

/// Summary for groups without a formatting rule
pub const NO_SUMMARY: &str = "-";

/// Format a typed payload for a record type.
///
/// `date` and `time` are the record's own start; only sleep records need them.
pub fn format_attributes(
    record_type: RecordType,
    attributes: &AttributePayload,
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
) -> Result<String, TaxonomyError> {
    attributes.check_for(record_type)?;

    match attributes {
        AttributePayload::Growth(measure) => Ok(format_measure(measure)),
        AttributePayload::Milestone => Ok(NO_SUMMARY.to_string()),
        AttributePayload::Sleep(sleep) => {
            let date = date.ok_or_else(|| TaxonomyError::MissingField("date".to_string()))?;
            let time = time.ok_or_else(|| TaxonomyError::MissingField("time".to_string()))?;
            Ok(format_sleep_duration(date, time, sleep))
        }
        AttributePayload::Feeding(_) | AttributePayload::Diaper(_) => Ok(NO_SUMMARY.to_string()),
    }
}

/// Format a validated record
pub fn format_record(record: &Record) -> Result<String, TaxonomyError> {
    format_attributes(
        record.record_type,
        &record.attributes,
        Some(record.date),
        Some(record.time),
    )
}

/// Format untyped input: a type name, raw attribute JSON and raw start strings
pub fn format_raw_attributes(
    record_type: &str,
    attributes: &Value,
    date: Option<&str>,
    time: Option<&str>,
) -> Result<String, TaxonomyError> {
    let record_type: RecordType = record_type.parse()?;
    let group = group_of(record_type);

    // Groups without a rule never look at the payload or the start
    if !matches!(group, RecordGroup::Growth | RecordGroup::Sleep) {
        return Ok(NO_SUMMARY.to_string());
    }

    let payload = AttributePayload::for_type(record_type, attributes)?;
    let date = date.map(parse_date).transpose()?;
    let time = time.map(parse_time).transpose()?;

    format_attributes(record_type, &payload, date, time)
}

/// Elapsed time from the record start to the sleep end.
///
/// Whole hours and minutes are truncated toward zero. Only values above one are
/// pluralized, so "0 minute" and "-3 hour" come out singular. Start and end are
/// wall-clock times without a zone: a sleep spanning a DST change reads one
/// hour off the elapsed real time.
fn format_sleep_duration(date: NaiveDate, time: NaiveTime, sleep: &SleepAttributes) -> String {
    let start = date.and_time(time);
    let end = sleep.end_date.and_time(sleep.end_time);
    let elapsed = end - start;

    let hours = elapsed.num_hours();
    if hours != 0 {
        return format!("Duration: {} hour{}", hours, plural(hours));
    }

    let minutes = elapsed.num_minutes();
    format!("Duration: {} minute{}", minutes, plural(minutes))
}

fn plural(n: i64) -> &'static str {
    if n > 1 {
        "s"
    } else {
        ""
    }
}

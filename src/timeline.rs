//! Records timeline
//!
//! Groups a profile's records into day sections for the records list, newest
//! first, with an optional record-type filter.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use tracing::debug;

use crate::display::format_pill_time;
use crate::error::TaxonomyError;
use crate::formatter::format_record;
use crate::schema::{Record, RecordRow, RecordRowAdapter, RowValidation};
use crate::taxonomy::info_of;
use crate::types::{ColorToken, Icon, RecordType};

/// Section date format for days before yesterday, e.g. `05 March 2024`
pub const SECTION_DATE_FORMAT: &str = "%d %B %Y";

/// Which records the timeline shows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    /// Only records of this profile; `None` keeps every profile
    #[serde(default)]
    pub baby_profile_id: Option<i64>,
    /// Only these record types; empty keeps every type
    #[serde(default)]
    pub record_types: Vec<RecordType>,
}

impl RecordFilter {
    pub fn for_profile(baby_profile_id: i64) -> Self {
        Self {
            baby_profile_id: Some(baby_profile_id),
            record_types: Vec::new(),
        }
    }

    pub fn with_types(mut self, record_types: impl IntoIterator<Item = RecordType>) -> Self {
        self.record_types = record_types.into_iter().collect();
        self
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.baby_profile_id
            .map_or(true, |id| record.baby_profile_id == id)
            && (self.record_types.is_empty() || self.record_types.contains(&record.record_type))
    }
}

/// Records of a single day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySection<'a> {
    pub date: NaiveDate,
    pub records: Vec<&'a Record>,
}

/// Group matching records by date.
///
/// Sections run newest date first; within a day records run newest time
/// first, ties broken by descending id.
pub fn group_by_date<'a>(records: &'a [Record], filter: &RecordFilter) -> Vec<DaySection<'a>> {
    let mut by_date: BTreeMap<Reverse<NaiveDate>, Vec<&'a Record>> = BTreeMap::new();

    for record in records.iter().filter(|r| filter.matches(r)) {
        by_date.entry(Reverse(record.date)).or_default().push(record);
    }

    by_date
        .into_iter()
        .map(|(Reverse(date), mut day)| {
            day.sort_by_key(|r| Reverse((r.time, r.id)));
            DaySection { date, records: day }
        })
        .collect()
}

/// Header for a day section relative to `today`
pub fn section_title(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if today.checked_sub_days(Days::new(1)) == Some(date) {
        "Yesterday".to_string()
    } else {
        date.format(SECTION_DATE_FORMAT).to_string()
    }
}

/// One list item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordCard {
    pub id: i64,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub title: &'static str,
    pub color: ColorToken,
    pub icon: Icon,
    /// Attribute summary, or `-`
    pub summary: String,
    /// Start time as `HH:MM`
    pub time: String,
}

impl RecordCard {
    pub fn from_record(record: &Record) -> Result<Self, TaxonomyError> {
        let info = info_of(record.record_type);
        Ok(Self {
            id: record.id,
            record_type: record.record_type,
            title: info.title,
            color: info.color,
            icon: info.icon,
            summary: format_record(record)?,
            time: format_pill_time(record.time),
        })
    }
}

/// A titled day of cards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineSection {
    pub title: String,
    pub date: NaiveDate,
    pub data: Vec<RecordCard>,
}

/// Build the records list: filtered, grouped by day, titled and summarized
pub fn build_timeline(
    records: &[Record],
    filter: &RecordFilter,
    today: NaiveDate,
) -> Result<Vec<TimelineSection>, TaxonomyError> {
    let sections = group_by_date(records, filter)
        .into_iter()
        .map(|section| {
            let data = section
                .records
                .iter()
                .map(|r| RecordCard::from_record(r))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(TimelineSection {
                title: section_title(section.date, today),
                date: section.date,
                data,
            })
        })
        .collect::<Result<Vec<_>, TaxonomyError>>()?;

    debug!(
        records = records.len(),
        sections = sections.len(),
        "built records timeline"
    );

    Ok(sections)
}

/// Timeline built from raw rows, with the rows that could not be shown
#[derive(Debug, Serialize)]
pub struct TimelineReport {
    pub sections: Vec<TimelineSection>,
    /// Invalid rows, left out of `sections`
    pub rejected: Vec<RowValidation>,
}

/// Convert persisted rows and build the timeline from the valid ones
pub fn timeline_from_rows(
    rows: Vec<RecordRow>,
    filter: &RecordFilter,
    today: NaiveDate,
) -> Result<TimelineReport, TaxonomyError> {
    let (records, rejected) = RecordRowAdapter::partition(rows);
    let sections = build_timeline(&records, filter, today)?;
    Ok(TimelineReport { sections, rejected })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::AttributePayload;
    use crate::types::{DiaperAttributes, MeasureData, SleepAttributes};
    use chrono::NaiveTime;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn weight(id: i64, profile: i64, d: NaiveDate, t: NaiveTime) -> Record {
        Record::new(
            id,
            profile,
            RecordType::Weight,
            d,
            t,
            AttributePayload::Growth(MeasureData::new(4.1, "kg")),
        )
        .unwrap()
    }

    fn diaper(id: i64, profile: i64, d: NaiveDate, t: NaiveTime) -> Record {
        Record::new(
            id,
            profile,
            RecordType::Diaper,
            d,
            t,
            AttributePayload::Diaper(DiaperAttributes::default()),
        )
        .unwrap()
    }

    fn nap(id: i64, d: NaiveDate, start: NaiveTime, end: NaiveTime) -> Record {
        Record::new(
            id,
            1,
            RecordType::SleepDay,
            d,
            start,
            AttributePayload::Sleep(SleepAttributes {
                end_date: d,
                end_time: end,
            }),
        )
        .unwrap()
    }

    fn sample() -> Vec<Record> {
        vec![
            weight(1, 1, date(2024, 3, 3), time(9, 0)),
            diaper(2, 1, date(2024, 3, 5), time(7, 30)),
            nap(3, date(2024, 3, 5), time(13, 0), time(14, 30)),
            diaper(4, 2, date(2024, 3, 5), time(8, 0)),
            diaper(5, 1, date(2024, 3, 4), time(22, 15)),
            diaper(6, 1, date(2024, 3, 5), time(7, 30)),
        ]
    }

    fn ids(section: &DaySection<'_>) -> Vec<i64> {
        section.records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_group_by_date_orders_newest_first() {
        let records = sample();
        let sections = group_by_date(&records, &RecordFilter::for_profile(1));

        assert_eq!(
            sections.iter().map(|s| s.date).collect::<Vec<_>>(),
            vec![date(2024, 3, 5), date(2024, 3, 4), date(2024, 3, 3)]
        );
        assert_eq!(ids(&sections[0]), vec![3, 6, 2]);
        assert_eq!(ids(&sections[1]), vec![5]);
        assert_eq!(ids(&sections[2]), vec![1]);
    }

    #[test]
    fn test_filter_by_type() {
        let records = sample();
        let filter = RecordFilter::for_profile(1).with_types([RecordType::Weight, RecordType::SleepDay]);
        let sections = group_by_date(&records, &filter);

        assert_eq!(sections.len(), 2);
        assert_eq!(ids(&sections[0]), vec![3]);
        assert_eq!(ids(&sections[1]), vec![1]);
    }

    #[test]
    fn test_default_filter_keeps_everything() {
        let records = sample();
        let sections = group_by_date(&records, &RecordFilter::default());
        let total: usize = sections.iter().map(|s| s.records.len()).sum();
        assert_eq!(total, records.len());
    }

    #[test]
    fn test_empty_input() {
        assert!(group_by_date(&[], &RecordFilter::default()).is_empty());
    }

    #[test]
    fn test_section_titles() {
        let today = date(2024, 3, 1);
        assert_eq!(section_title(today, today), "Today");
        assert_eq!(section_title(date(2024, 2, 29), today), "Yesterday");
        assert_eq!(section_title(date(2024, 2, 28), today), "28 February 2024");
        assert_eq!(section_title(date(2024, 3, 5), today), "05 March 2024");
    }

    #[test]
    fn test_build_timeline() {
        let records = sample();
        let timeline =
            build_timeline(&records, &RecordFilter::for_profile(1), date(2024, 3, 5)).unwrap();

        assert_eq!(
            timeline.iter().map(|s| s.title.as_str()).collect::<Vec<_>>(),
            vec!["Today", "Yesterday", "03 March 2024"]
        );

        let first = &timeline[0].data[0];
        assert_eq!(first.title, "Sleep - Day");
        assert_eq!(first.summary, "Duration: 1 hour");
        assert_eq!(first.time, "13:00");
        assert_eq!(first.icon, Icon::Day);

        assert_eq!(timeline[0].data[1].summary, "-");
        assert_eq!(timeline[2].data[0].summary, "4.1kg");
    }

    #[test]
    fn test_timeline_from_rows_reports_rejected_rows() {
        let rows = RecordRowAdapter::parse_array(
            r#"[
                {"id":1,"baby_profile_id":1,"type":"birthday","date":"2024-03-05","time":"00:00:00","attributes":{}},
                {"id":2,"baby_profile_id":1,"type":"weight","date":"2024-03-05","time":"09:00:00","attributes":{}},
                {"id":3,"baby_profile_id":1,"type":"diaper","date":"2024-03-04","time":"07:00:00","attributes":{"skinRash":"severe "}}
            ]"#,
        )
        .unwrap();

        let report = timeline_from_rows(rows, &RecordFilter::default(), date(2024, 3, 5)).unwrap();

        assert_eq!(report.sections.len(), 2);
        assert_eq!(report.sections[0].data[0].title, "Birthday");
        assert_eq!(report.sections[0].data[0].summary, "-");
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].id, 2);
        assert_eq!(report.rejected[0].error.code(), "ATTRIBUTE_SHAPE");
    }
}

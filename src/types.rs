//! Core types for baby-records
//!
//! This module defines the closed vocabularies of the record taxonomy (record
//! types, groups, color tokens, icons), the per-group attribute structures and
//! the static metadata attached to every record type.

use chrono::{NaiveDate, NaiveTime};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::TaxonomyError;

/// Specific kind of logged event
///
/// The set is closed: parsing any other string fails with
/// [`TaxonomyError::UnknownRecordType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "String")]
pub enum RecordType {
    Weight,
    Height,
    Head,
    Birthday,
    Growth,
    Diaper,
    Sleep,
    SleepDay,
    SleepNight,
    Feeding,
    BottleBreast,
    BottleFormula,
    BreastFeedingLeft,
    BreastFeedingRight,
    PumpingLeft,
    PumpingRight,
}

impl RecordType {
    /// Number of record types; the taxonomy tables are sized by it
    pub const COUNT: usize = 16;

    /// Every record type, in declaration order
    pub const ALL: [RecordType; RecordType::COUNT] = [
        RecordType::Weight,
        RecordType::Height,
        RecordType::Head,
        RecordType::Birthday,
        RecordType::Growth,
        RecordType::Diaper,
        RecordType::Sleep,
        RecordType::SleepDay,
        RecordType::SleepNight,
        RecordType::Feeding,
        RecordType::BottleBreast,
        RecordType::BottleFormula,
        RecordType::BreastFeedingLeft,
        RecordType::BreastFeedingRight,
        RecordType::PumpingLeft,
        RecordType::PumpingRight,
    ];

    /// Position of this type in [`RecordType::ALL`] and in the info table
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Weight => "weight",
            RecordType::Height => "height",
            RecordType::Head => "head",
            RecordType::Birthday => "birthday",
            RecordType::Growth => "growth",
            RecordType::Diaper => "diaper",
            RecordType::Sleep => "sleep",
            RecordType::SleepDay => "sleepDay",
            RecordType::SleepNight => "sleepNight",
            RecordType::Feeding => "feeding",
            RecordType::BottleBreast => "bottleBreast",
            RecordType::BottleFormula => "bottleFormula",
            RecordType::BreastFeedingLeft => "breastFeedingLeft",
            RecordType::BreastFeedingRight => "breastFeedingRight",
            RecordType::PumpingLeft => "pumpingLeft",
            RecordType::PumpingRight => "pumpingRight",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = TaxonomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| TaxonomyError::UnknownRecordType(s.to_string()))
    }
}

impl TryFrom<String> for RecordType {
    type Error = TaxonomyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Coarse category a record type belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordGroup {
    Growth,
    Sleep,
    Feeding,
    Diaper,
}

impl RecordGroup {
    pub const ALL: [RecordGroup; 4] = [
        RecordGroup::Feeding,
        RecordGroup::Sleep,
        RecordGroup::Diaper,
        RecordGroup::Growth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordGroup::Growth => "growth",
            RecordGroup::Sleep => "sleep",
            RecordGroup::Feeding => "feeding",
            RecordGroup::Diaper => "diaper",
        }
    }
}

impl fmt::Display for RecordGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic color token from the app theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorToken {
    #[serde(rename = "custom.yellow1")]
    Yellow1,
    #[serde(rename = "custom.green4")]
    Green4,
    #[serde(rename = "custom.blue4")]
    Blue4,
    #[serde(rename = "custom.pink1")]
    Pink1,
}

impl ColorToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorToken::Yellow1 => "custom.yellow1",
            ColorToken::Green4 => "custom.green4",
            ColorToken::Blue4 => "custom.blue4",
            ColorToken::Pink1 => "custom.pink1",
        }
    }
}

/// Image asset shown next to a record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Icon {
    #[serde(rename = "assets/icon-growth.png")]
    Growth,
    #[serde(rename = "assets/icon-weight.png")]
    Weight,
    #[serde(rename = "assets/icon-height.png")]
    Height,
    #[serde(rename = "assets/icon-head-circ.png")]
    HeadCircumference,
    #[serde(rename = "assets/icon-diaper.png")]
    Diaper,
    #[serde(rename = "assets/icon-day.png")]
    Day,
    #[serde(rename = "assets/icon-night.png")]
    Night,
    #[serde(rename = "assets/icon-bottle.png")]
    Bottle,
    #[serde(rename = "assets/icon-bra-left.png")]
    BraLeft,
    #[serde(rename = "assets/icon-bra-right.png")]
    BraRight,
    #[serde(rename = "assets/icon-pumping-left.png")]
    PumpingLeft,
    #[serde(rename = "assets/icon-pumping-right.png")]
    PumpingRight,
}

impl Icon {
    pub fn asset_path(&self) -> &'static str {
        match self {
            Icon::Growth => "assets/icon-growth.png",
            Icon::Weight => "assets/icon-weight.png",
            Icon::Height => "assets/icon-height.png",
            Icon::HeadCircumference => "assets/icon-head-circ.png",
            Icon::Diaper => "assets/icon-diaper.png",
            Icon::Day => "assets/icon-day.png",
            Icon::Night => "assets/icon-night.png",
            Icon::Bottle => "assets/icon-bottle.png",
            Icon::BraLeft => "assets/icon-bra-left.png",
            Icon::BraRight => "assets/icon-bra-right.png",
            Icon::PumpingLeft => "assets/icon-pumping-left.png",
            Icon::PumpingRight => "assets/icon-pumping-right.png",
        }
    }
}

/// A numeric measurement with its unit (growth values, feeding amounts)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureData {
    pub value: f64,
    pub unit: String,
}

impl MeasureData {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }
}

/// Sleep attributes; the start is the record's own date/time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepAttributes {
    pub end_date: NaiveDate,
    pub end_time: NaiveTime,
}

/// Feeding attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedingAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<MeasureData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
}

/// Diaper attributes; both fields stay unset until picked in the form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaperAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consistency: Option<Consistency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin_rash: Option<SkinRash>,
}

/// Stool consistency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Consistency {
    Loose,
    Soft,
    Hard,
}

impl Consistency {
    pub const ALL: [Consistency; 3] = [Consistency::Loose, Consistency::Soft, Consistency::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Consistency::Loose => "loose",
            Consistency::Soft => "soft",
            Consistency::Hard => "hard",
        }
    }
}

impl FromStr for Consistency {
    type Err = TaxonomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Consistency::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == trimmed)
            .ok_or_else(|| TaxonomyError::AttributeShape {
                group: RecordGroup::Diaper,
                message: format!("unknown consistency '{}'", s),
            })
    }
}

impl TryFrom<String> for Consistency {
    type Error = TaxonomyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Skin rash severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum SkinRash {
    None,
    Mild,
    Severe,
}

impl SkinRash {
    pub const ALL: [SkinRash; 3] = [SkinRash::None, SkinRash::Mild, SkinRash::Severe];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkinRash::None => "none",
            SkinRash::Mild => "mild",
            SkinRash::Severe => "severe",
        }
    }
}

impl FromStr for SkinRash {
    type Err = TaxonomyError;

    // Older clients stored "severe " with a trailing space.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        SkinRash::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == trimmed)
            .ok_or_else(|| TaxonomyError::AttributeShape {
                group: RecordGroup::Diaper,
                message: format!("unknown skin rash '{}'", s),
            })
    }
}

impl TryFrom<String> for SkinRash {
    type Error = TaxonomyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Default attribute payload used to seed a new record
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultAttributes {
    /// No defaults; serialized as `{}`
    Empty,
    /// A preset measurement (growth types)
    Measure { value: f64, unit: &'static str },
}

impl DefaultAttributes {
    pub fn as_measure(&self) -> Option<MeasureData> {
        match self {
            DefaultAttributes::Empty => None,
            DefaultAttributes::Measure { value, unit } => Some(MeasureData::new(*value, *unit)),
        }
    }

    /// Raw JSON form, as stored in a draft
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            DefaultAttributes::Empty => serde_json::Value::Object(serde_json::Map::new()),
            DefaultAttributes::Measure { value, unit } => {
                serde_json::json!({ "unit": unit, "value": value })
            }
        }
    }
}

impl Serialize for DefaultAttributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DefaultAttributes::Empty => serializer.serialize_map(Some(0))?.end(),
            DefaultAttributes::Measure { value, unit } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("unit", unit)?;
                map.serialize_entry("value", value)?;
                map.end()
            }
        }
    }
}

/// Immutable metadata for one record type
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecordTypeInfo {
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub title: &'static str,
    pub color: ColorToken,
    pub icon: Icon,
    /// Seed payload for a new record of this type
    pub attributes: DefaultAttributes,
    /// Whether the type picker offers this type
    pub pickable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_record_type_round_trips_through_str() {
        for t in RecordType::ALL {
            assert_eq!(t.as_str().parse::<RecordType>().unwrap(), t);
        }
    }

    #[test]
    fn test_all_is_in_index_order() {
        for (i, t) in RecordType::ALL.iter().enumerate() {
            assert_eq!(t.index(), i);
        }
    }

    #[test]
    fn test_unknown_record_type() {
        let err = "nap".parse::<RecordType>().unwrap_err();
        assert!(matches!(err, TaxonomyError::UnknownRecordType(ref s) if s == "nap"));

        let err = serde_json::from_str::<RecordType>("\"Weight\"").unwrap_err();
        assert!(err.to_string().contains("Unknown record type"));
    }

    #[test]
    fn test_record_type_serde_uses_camel_case() {
        let json = serde_json::to_string(&RecordType::BreastFeedingLeft).unwrap();
        assert_eq!(json, "\"breastFeedingLeft\"");

        let parsed: RecordType = serde_json::from_str("\"sleepNight\"").unwrap();
        assert_eq!(parsed, RecordType::SleepNight);
    }

    #[test]
    fn test_skin_rash_accepts_trailing_space() {
        let rash: SkinRash = serde_json::from_str("\"severe \"").unwrap();
        assert_eq!(rash, SkinRash::Severe);
        assert!("scaly".parse::<SkinRash>().is_err());
    }

    #[test]
    fn test_default_attributes_serialization() {
        assert_eq!(serde_json::to_string(&DefaultAttributes::Empty).unwrap(), "{}");

        let weight = DefaultAttributes::Measure {
            value: 3.5,
            unit: "kg",
        };
        assert_eq!(
            serde_json::to_value(weight).unwrap(),
            serde_json::json!({ "unit": "kg", "value": 3.5 })
        );
        assert_eq!(weight.to_json(), serde_json::to_value(weight).unwrap());
        assert_eq!(weight.as_measure(), Some(MeasureData::new(3.5, "kg")));
    }

    #[test]
    fn test_color_and_icon_serialize_as_references() {
        assert_eq!(
            serde_json::to_string(&ColorToken::Pink1).unwrap(),
            format!("\"{}\"", ColorToken::Pink1.as_str())
        );
        assert_eq!(
            serde_json::to_string(&Icon::HeadCircumference).unwrap(),
            format!("\"{}\"", Icon::HeadCircumference.asset_path())
        );
    }
}

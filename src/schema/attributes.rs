//! Group-tagged attribute payloads
//!
//! Raw attribute JSON carries no tag of its own: its shape is implied by the
//! group of the record type. [`AttributePayload::from_json`] is the checked
//! conversion that turns untagged JSON into the variant the group requires.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::TaxonomyError;
use crate::taxonomy::{group_of, info_of};
use crate::types::{
    DefaultAttributes, DiaperAttributes, FeedingAttributes, MeasureData, RecordGroup, RecordType,
    SleepAttributes,
};

/// Attribute payload of a record, one variant per [`RecordGroup`]
#[derive(Debug, Clone, PartialEq)]
pub enum AttributePayload {
    Growth(MeasureData),
    /// Growth-group entry without a measurement (`birthday`, `growth`); stored as `{}`
    Milestone,
    Sleep(SleepAttributes),
    Feeding(FeedingAttributes),
    Diaper(DiaperAttributes),
}

impl Serialize for AttributePayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AttributePayload::Growth(measure) => measure.serialize(serializer),
            AttributePayload::Milestone => serializer.serialize_map(Some(0))?.end(),
            AttributePayload::Sleep(sleep) => sleep.serialize(serializer),
            AttributePayload::Feeding(feeding) => feeding.serialize(serializer),
            AttributePayload::Diaper(diaper) => diaper.serialize(serializer),
        }
    }
}

/// Whether records of this type carry a value and unit
pub fn is_measured(record_type: RecordType) -> bool {
    group_of(record_type) == RecordGroup::Growth
        && info_of(record_type).attributes != DefaultAttributes::Empty
}

impl AttributePayload {
    /// Group whose shape this payload has
    pub fn group(&self) -> RecordGroup {
        match self {
            AttributePayload::Growth(_) | AttributePayload::Milestone => RecordGroup::Growth,
            AttributePayload::Sleep(_) => RecordGroup::Sleep,
            AttributePayload::Feeding(_) => RecordGroup::Feeding,
            AttributePayload::Diaper(_) => RecordGroup::Diaper,
        }
    }

    /// Interpret raw attribute JSON as the shape `group` requires.
    ///
    /// `null` is read as an empty object. Unknown extra fields are ignored.
    pub fn from_json(group: RecordGroup, value: &Value) -> Result<Self, TaxonomyError> {
        let object = match value {
            Value::Null => Value::Object(serde_json::Map::new()),
            Value::Object(_) => value.clone(),
            other => {
                return Err(TaxonomyError::AttributeShape {
                    group,
                    message: format!("expected an object, got {}", json_kind(other)),
                })
            }
        };

        let shape_error = |e: serde_json::Error| TaxonomyError::AttributeShape {
            group,
            message: e.to_string(),
        };

        match group {
            RecordGroup::Growth => serde_json::from_value(object)
                .map(AttributePayload::Growth)
                .map_err(shape_error),
            RecordGroup::Sleep => serde_json::from_value(object)
                .map(AttributePayload::Sleep)
                .map_err(shape_error),
            RecordGroup::Feeding => serde_json::from_value(object)
                .map(AttributePayload::Feeding)
                .map_err(shape_error),
            RecordGroup::Diaper => serde_json::from_value(object)
                .map(AttributePayload::Diaper)
                .map_err(shape_error),
        }
    }

    /// Interpret raw attribute JSON for a record of `record_type`.
    ///
    /// Same as [`AttributePayload::from_json`] for the type's group, except that
    /// growth types without a measurement read attributes lacking a `value`
    /// as [`AttributePayload::Milestone`].
    pub fn for_type(record_type: RecordType, value: &Value) -> Result<Self, TaxonomyError> {
        let group = group_of(record_type);
        if group == RecordGroup::Growth && !is_measured(record_type) {
            match value {
                Value::Null => return Ok(AttributePayload::Milestone),
                Value::Object(map) if !map.contains_key("value") => {
                    return Ok(AttributePayload::Milestone)
                }
                _ => {}
            }
        }
        Self::from_json(group, value)
    }

    /// Check that a record of `record_type` may carry this payload
    pub fn check_for(&self, record_type: RecordType) -> Result<(), TaxonomyError> {
        let group = group_of(record_type);
        if self.group() != group {
            return Err(TaxonomyError::AttributeShape {
                group,
                message: format!("{} record carries {} attributes", record_type, self.group()),
            });
        }
        if *self == AttributePayload::Milestone && is_measured(record_type) {
            return Err(TaxonomyError::AttributeShape {
                group,
                message: format!("{} record needs a value and unit", record_type),
            });
        }
        Ok(())
    }

    /// Raw JSON form, as persisted.
    ///
    /// Cannot fail: every variant is a struct with string keys, and
    /// `serde_json` maps non-finite floats to `null`. Measure values always
    /// come back as floats, so a stored `50` reads back as `50.0`.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn as_measure(&self) -> Option<&MeasureData> {
        match self {
            AttributePayload::Growth(measure) => Some(measure),
            AttributePayload::Feeding(feeding) => feeding.amount.as_ref(),
            _ => None,
        }
    }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Consistency, SkinRash};
    use chrono::{NaiveDate, NaiveTime};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_growth_payload() {
        let payload =
            AttributePayload::from_json(RecordGroup::Growth, &json!({ "value": 3.5, "unit": "kg" }))
                .unwrap();
        assert_eq!(payload, AttributePayload::Growth(MeasureData::new(3.5, "kg")));
        assert_eq!(payload.group(), RecordGroup::Growth);
    }

    #[test]
    fn test_growth_requires_value_and_unit() {
        let err = AttributePayload::from_json(RecordGroup::Growth, &json!({})).unwrap_err();
        assert!(matches!(
            err,
            TaxonomyError::AttributeShape {
                group: RecordGroup::Growth,
                ..
            }
        ));

        let err =
            AttributePayload::from_json(RecordGroup::Growth, &json!({ "value": "3.5", "unit": "kg" }))
                .unwrap_err();
        assert!(matches!(err, TaxonomyError::AttributeShape { .. }));
    }

    #[test]
    fn test_milestone_payload_for_unmeasured_growth_types() {
        let payload = AttributePayload::for_type(RecordType::Birthday, &json!({})).unwrap();
        assert_eq!(payload, AttributePayload::Milestone);
        assert_eq!(payload.group(), RecordGroup::Growth);
        assert_eq!(payload.to_json(), json!({}));

        assert_eq!(
            AttributePayload::for_type(RecordType::Growth, &Value::Null).unwrap(),
            AttributePayload::Milestone
        );

        // A measurement is still read when one is given
        assert_eq!(
            AttributePayload::for_type(RecordType::Birthday, &json!({ "value": 4.0, "unit": "kg" }))
                .unwrap(),
            AttributePayload::Growth(MeasureData::new(4.0, "kg"))
        );
    }

    #[test]
    fn test_measured_types_need_a_measurement() {
        assert!(AttributePayload::for_type(RecordType::Weight, &json!({})).is_err());

        let err = AttributePayload::Milestone.check_for(RecordType::Head).unwrap_err();
        assert!(matches!(
            err,
            TaxonomyError::AttributeShape {
                group: RecordGroup::Growth,
                ..
            }
        ));
        assert!(AttributePayload::Milestone.check_for(RecordType::Birthday).is_ok());
        assert!(AttributePayload::Milestone.check_for(RecordType::Sleep).is_err());
    }

    #[test]
    fn test_to_json_widens_integral_values() {
        let payload =
            AttributePayload::from_json(RecordGroup::Growth, &json!({ "value": 50, "unit": "cm" }))
                .unwrap();
        assert_eq!(payload.to_json(), json!({ "value": 50.0, "unit": "cm" }));
    }

    #[test]
    fn test_sleep_payload() {
        let payload = AttributePayload::from_json(
            RecordGroup::Sleep,
            &json!({ "endDate": "2024-01-02", "endTime": "05:00:00" }),
        )
        .unwrap();

        assert_eq!(
            payload,
            AttributePayload::Sleep(SleepAttributes {
                end_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                end_time: NaiveTime::from_hms_opt(5, 0, 0).unwrap(),
            })
        );
        assert_eq!(
            payload.to_json(),
            json!({ "endDate": "2024-01-02", "endTime": "05:00:00" })
        );
    }

    #[test]
    fn test_sleep_requires_end() {
        assert!(AttributePayload::from_json(RecordGroup::Sleep, &json!({})).is_err());
        assert!(AttributePayload::from_json(
            RecordGroup::Sleep,
            &json!({ "endDate": "yesterday", "endTime": "05:00:00" })
        )
        .is_err());
    }

    #[test]
    fn test_feeding_fields_are_optional() {
        let empty = AttributePayload::from_json(RecordGroup::Feeding, &json!({})).unwrap();
        assert_eq!(empty, AttributePayload::Feeding(FeedingAttributes::default()));
        assert_eq!(empty.to_json(), json!({}));

        let bottle = AttributePayload::from_json(
            RecordGroup::Feeding,
            &json!({ "amount": { "value": 120, "unit": "ml" }, "endDate": "2024-01-01", "endTime": "08:15:00" }),
        )
        .unwrap();
        assert_eq!(bottle.as_measure(), Some(&MeasureData::new(120.0, "ml")));
    }

    #[test]
    fn test_diaper_payload() {
        let payload = AttributePayload::from_json(
            RecordGroup::Diaper,
            &json!({ "consistency": "soft", "skinRash": "severe " }),
        )
        .unwrap();
        assert_eq!(
            payload,
            AttributePayload::Diaper(DiaperAttributes {
                consistency: Some(Consistency::Soft),
                skin_rash: Some(SkinRash::Severe),
            })
        );

        assert!(AttributePayload::from_json(
            RecordGroup::Diaper,
            &json!({ "consistency": "runny" })
        )
        .is_err());
    }

    #[test]
    fn test_null_reads_as_empty_object() {
        let payload = AttributePayload::from_json(RecordGroup::Diaper, &Value::Null).unwrap();
        assert_eq!(payload, AttributePayload::Diaper(DiaperAttributes::default()));
    }

    #[test]
    fn test_non_object_is_rejected() {
        let err = AttributePayload::from_json(RecordGroup::Feeding, &json!([1, 2])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Attributes do not match the feeding shape: expected an object, got an array"
        );
    }
}

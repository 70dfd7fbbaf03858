//! Record taxonomy tables
//!
//! Two explicit, append-only tables drive every lookup:
//! - [`RECORD_TYPE_GROUPS`]: the ordered partition of record types into groups
//! - [`RECORD_TYPE_INFO`]: display metadata and default attributes per type
//!
//! Adding a record type means adding the enum variant, one entry in each table
//! and nothing else. The partition is checked during const evaluation, so a
//! type listed twice or not at all fails the build.

use crate::error::TaxonomyError;
use crate::types::{ColorToken, DefaultAttributes, Icon, RecordGroup, RecordType, RecordTypeInfo};

/// Ordered `(group, types)` partition; group order is the picker order
pub const RECORD_TYPE_GROUPS: &[(RecordGroup, &[RecordType])] = &[
    (
        RecordGroup::Feeding,
        &[
            RecordType::BottleBreast,
            RecordType::BottleFormula,
            RecordType::BreastFeedingLeft,
            RecordType::BreastFeedingRight,
            RecordType::PumpingLeft,
            RecordType::PumpingRight,
            RecordType::Feeding,
        ],
    ),
    (
        RecordGroup::Sleep,
        &[RecordType::SleepDay, RecordType::SleepNight, RecordType::Sleep],
    ),
    (RecordGroup::Diaper, &[RecordType::Diaper]),
    (
        RecordGroup::Growth,
        &[
            RecordType::Weight,
            RecordType::Height,
            RecordType::Head,
            RecordType::Growth,
            RecordType::Birthday,
        ],
    ),
];

pub const DEFAULT_WEIGHT: DefaultAttributes = DefaultAttributes::Measure {
    value: 3.5,
    unit: "kg",
};

pub const DEFAULT_HEIGHT: DefaultAttributes = DefaultAttributes::Measure {
    value: 50.0,
    unit: "cm",
};

pub const DEFAULT_HEAD_CIRCUMFERENCE: DefaultAttributes = DefaultAttributes::Measure {
    value: 30.0,
    unit: "cm",
};

const fn info(
    record_type: RecordType,
    title: &'static str,
    color: ColorToken,
    icon: Icon,
    attributes: DefaultAttributes,
    pickable: bool,
) -> RecordTypeInfo {
    RecordTypeInfo {
        record_type,
        title,
        color,
        icon,
        attributes,
        pickable,
    }
}

/// Per-type metadata, indexed by [`RecordType::index`]
pub static RECORD_TYPE_INFO: [RecordTypeInfo; RecordType::COUNT] = [
    info(RecordType::Weight, "Weight", ColorToken::Yellow1, Icon::Weight, DEFAULT_WEIGHT, true),
    info(RecordType::Height, "Height", ColorToken::Yellow1, Icon::Height, DEFAULT_HEIGHT, true),
    info(
        RecordType::Head,
        "Head Circumference",
        ColorToken::Yellow1,
        Icon::HeadCircumference,
        DEFAULT_HEAD_CIRCUMFERENCE,
        true,
    ),
    info(RecordType::Birthday, "Birthday", ColorToken::Yellow1, Icon::Growth, DefaultAttributes::Empty, false),
    info(RecordType::Growth, "Growth", ColorToken::Yellow1, Icon::Growth, DefaultAttributes::Empty, false),
    info(RecordType::Diaper, "Diaper", ColorToken::Green4, Icon::Diaper, DefaultAttributes::Empty, true),
    info(RecordType::Sleep, "Sleep", ColorToken::Blue4, Icon::Night, DefaultAttributes::Empty, false),
    info(RecordType::SleepDay, "Sleep - Day", ColorToken::Blue4, Icon::Day, DefaultAttributes::Empty, true),
    info(RecordType::SleepNight, "Sleep - Night", ColorToken::Blue4, Icon::Night, DefaultAttributes::Empty, true),
    info(RecordType::Feeding, "Feeding", ColorToken::Pink1, Icon::Bottle, DefaultAttributes::Empty, false),
    info(
        RecordType::BottleBreast,
        "Bottle - Breast",
        ColorToken::Pink1,
        Icon::Bottle,
        DefaultAttributes::Empty,
        true,
    ),
    info(
        RecordType::BottleFormula,
        "Bottle - Formula",
        ColorToken::Pink1,
        Icon::Bottle,
        DefaultAttributes::Empty,
        true,
    ),
    info(
        RecordType::BreastFeedingLeft,
        "Breast Feeding - Left",
        ColorToken::Pink1,
        Icon::BraLeft,
        DefaultAttributes::Empty,
        true,
    ),
    info(
        RecordType::BreastFeedingRight,
        "Breast Feeding - Right",
        ColorToken::Pink1,
        Icon::BraRight,
        DefaultAttributes::Empty,
        true,
    ),
    info(
        RecordType::PumpingLeft,
        "Pumping - Left",
        ColorToken::Pink1,
        Icon::PumpingLeft,
        DefaultAttributes::Empty,
        true,
    ),
    info(
        RecordType::PumpingRight,
        "Pumping - Right",
        ColorToken::Pink1,
        Icon::PumpingRight,
        DefaultAttributes::Empty,
        true,
    ),
];

/// Reverse index of [`RECORD_TYPE_GROUPS`], built during const evaluation
static GROUP_INDEX: [RecordGroup; RecordType::COUNT] = build_group_index(RECORD_TYPE_GROUPS);

const fn build_group_index(
    groups: &[(RecordGroup, &[RecordType])],
) -> [RecordGroup; RecordType::COUNT] {
    let mut slots: [Option<RecordGroup>; RecordType::COUNT] = [None; RecordType::COUNT];

    let mut g = 0;
    while g < groups.len() {
        let (group, types) = groups[g];
        let mut t = 0;
        while t < types.len() {
            let idx = types[t] as usize;
            if slots[idx].is_some() {
                panic!("record type listed in more than one group");
            }
            slots[idx] = Some(group);
            t += 1;
        }
        g += 1;
    }

    let mut index = [RecordGroup::Growth; RecordType::COUNT];
    let mut i = 0;
    while i < RecordType::COUNT {
        match slots[i] {
            Some(group) => index[i] = group,
            None => panic!("record type missing from the group table"),
        }
        i += 1;
    }
    index
}

/// Group a record type belongs to
pub fn group_of(record_type: RecordType) -> RecordGroup {
    GROUP_INDEX[record_type.index()]
}

/// Metadata for a record type
pub fn info_of(record_type: RecordType) -> &'static RecordTypeInfo {
    let info = &RECORD_TYPE_INFO[record_type.index()];
    debug_assert_eq!(info.record_type, record_type, "info table out of order");
    info
}

/// Metadata lookup from an untyped type name
pub fn info_of_name(name: &str) -> Result<&'static RecordTypeInfo, TaxonomyError> {
    let record_type: RecordType = name.parse()?;
    Ok(info_of(record_type))
}

/// Record types of a group, in table order
pub fn types_in(group: RecordGroup) -> &'static [RecordType] {
    RECORD_TYPE_GROUPS
        .iter()
        .find(|(g, _)| *g == group)
        .map(|(_, types)| *types)
        .unwrap_or(&[])
}

/// Record types the picker offers for a group
pub fn pickable_types(group: RecordGroup) -> Vec<RecordType> {
    types_in(group)
        .iter()
        .copied()
        .filter(|t| info_of(*t).pickable)
        .collect()
}

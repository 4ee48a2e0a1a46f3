use serde_json::Value;

use crate::models::RawEntity;

pub const CHILDREN_RESOLUTION_KEY: &str = "children";

const DATETIME_V2_PREFIX: &str = "builtin.datetimeV2.";
const DATETIME_V1_PREFIX: &str = "builtin.datetime.";

const UNIT_ENTITY_PREFIXES: &[&str] = &[
    "builtin.age",
    "builtin.currency",
    "builtin.dimension",
    "builtin.temperature",
];

const SCALAR_ENTITY_TYPES: &[&str] = &[
    "builtin.number",
    "builtin.ordinal",
    "builtin.percentage",
];

/// Shape of one raw entity record, driving how its canonical value is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityShape {
    /// One value per occurrence, taken from the resolution or the surface text.
    Simple,
    /// One group of synonymous variant values per occurrence.
    List,
    /// Named sub-entities only, no top-level scalar of its own.
    Composite,
    /// Temporal resolution records merged into one timex set per occurrence.
    PrebuiltDatetime,
    /// Legacy temporal resolution, passed through as-is.
    PrebuiltDatetimeV1,
    /// `{number, units}` object per occurrence (age, currency, ...).
    PrebuiltUnit,
    /// Numeric scalar per occurrence (number, ordinal, percentage).
    PrebuiltScalar,
    /// Unrecognized resolution, passed through without interpretation.
    Opaque,
}

impl EntityShape {
    pub fn of(entity: &RawEntity) -> EntityShape {
        // A child-entity list always wins over any sibling resolution fields.
        if children_records(entity).is_some() {
            return EntityShape::Composite;
        }
        let resolution = match entity.resolution {
            Some(ref resolution) => resolution,
            None => return EntityShape::Simple,
        };
        if entity.entity_type.starts_with(DATETIME_V2_PREFIX) {
            return EntityShape::PrebuiltDatetime;
        }
        if entity.entity_type.starts_with(DATETIME_V1_PREFIX) {
            return EntityShape::PrebuiltDatetimeV1;
        }
        if UNIT_ENTITY_PREFIXES
            .iter()
            .any(|prefix| entity.entity_type.starts_with(prefix))
        {
            return EntityShape::PrebuiltUnit;
        }
        if SCALAR_ENTITY_TYPES.contains(&&*entity.entity_type) {
            return EntityShape::PrebuiltScalar;
        }
        if resolution
            .get("values")
            .map(Value::is_array)
            .unwrap_or(false)
        {
            return EntityShape::List;
        }
        match resolution.get("value") {
            Some(value) if !value.is_array() && !value.is_object() => EntityShape::Simple,
            _ => EntityShape::Opaque,
        }
    }
}

/// Sub-entity records of a composite occurrence, when the record has any.
pub fn children_records(entity: &RawEntity) -> Option<&Vec<Value>> {
    entity
        .resolution
        .as_ref()
        .and_then(|resolution| resolution.get(CHILDREN_RESOLUTION_KEY))
        .and_then(Value::as_array)
}

pub mod entity_shape;

use indexmap::IndexMap;
use itertools::Itertools;
use serde_json::{Map, Value};

use crate::application::PredictionOptions;
use crate::errors::*;
use crate::models::{RawEntity, RawResponse};
use crate::ontology::{IntentScore, RecognizerResult};
use crate::utils::{EntityName, IntentName};

pub use self::entity_shape::EntityShape;
use self::entity_shape::children_records;

/// Reserved entity-tree key holding positional metadata records.
pub const INSTANCE_KEY: &str = "$instance";

const BUILTIN_PREFIX: &str = "builtin.";
const DATETIME_V2_PREFIX: &str = "builtin.datetimeV2.";
const CURRENCY_PREFIX: &str = "builtin.currency";
const PERCENTAGE_TYPE: &str = "builtin.percentage";

/// Normalizes a raw service document into the canonical recognition result.
///
/// Fails with `InvalidResponse` when the document violates the minimal
/// contract (missing `query`, non-array `intents`/`entities`, malformed
/// entity records). Unknown entity types never fail: they pass through
/// opaquely.
pub fn normalize_value(raw: &Value, options: &PredictionOptions) -> Result<RecognizerResult> {
    let response = RawResponse::from_value(raw)?;
    normalize_response(&response, options)
}

/// Same as [`normalize_value`], over an already-deserialized response.
pub fn normalize_response(
    response: &RawResponse,
    options: &PredictionOptions,
) -> Result<RecognizerResult> {
    let altered_text = response
        .altered_query
        .as_ref()
        .filter(|altered| altered.as_str() != response.query)
        .cloned();
    let entities = build_entity_tree(
        response
            .entities
            .as_ref()
            .map(Vec::as_slice)
            .unwrap_or(&[]),
        options,
    )?;
    Ok(RecognizerResult {
        text: response.query.clone(),
        altered_text,
        intents: extract_intents(response, options),
        entities,
        sentiment: response.sentiment_analysis.clone(),
    })
}

fn extract_intents(
    response: &RawResponse,
    options: &PredictionOptions,
) -> IndexMap<IntentName, IntentScore> {
    let mut intents = IndexMap::new();
    if options.include_all_intents {
        if let Some(ref all_intents) = response.intents {
            for raw_intent in all_intents {
                intents.insert(
                    normalized_intent_name(&raw_intent.intent),
                    IntentScore {
                        score: raw_intent.score.unwrap_or(0.0),
                    },
                );
            }
            return intents;
        }
    }
    if let Some(ref top_intent) = response.top_scoring_intent {
        intents.insert(
            normalized_intent_name(&top_intent.intent),
            IntentScore {
                score: top_intent.score.unwrap_or(0.0),
            },
        );
    }
    intents
}

fn normalized_intent_name(intent: &str) -> IntentName {
    intent.replace('.', "_").replace(' ', "_")
}

/// Builds the keyed entity tree plus its `$instance` sibling from one flat
/// entity list. Composite occurrences recurse through the same function for
/// their sub-entities, one nesting level per occurrence.
fn build_entity_tree(entities: &[RawEntity], options: &PredictionOptions) -> Result<Value> {
    let composite_spans: Vec<(i64, i64)> = entities
        .iter()
        .filter(|entity| EntityShape::of(entity) == EntityShape::Composite)
        .map(|entity| (entity.start_index, entity.end_index))
        .collect();

    let mut values = Map::new();
    let mut instances = Map::new();
    for entity in entities {
        let shape = EntityShape::of(entity);
        if shape != EntityShape::Composite && is_absorbed(entity, &composite_spans) {
            continue;
        }
        let name = normalized_entity_name(entity);
        let value = entity_value(entity, entities, options)?;
        push_to_array(&mut values, &name, value);
        push_to_array(&mut instances, &name, entity_metadata(entity));
    }
    if options.verbose {
        values.insert(INSTANCE_KEY.to_string(), Value::Object(instances));
    }
    Ok(Value::Object(values))
}

// Sub-entities covered by a composite occurrence never surface as top-level
// keys; a name is top-level only if some occurrence lies outside every
// composite span.
fn is_absorbed(entity: &RawEntity, composite_spans: &[(i64, i64)]) -> bool {
    composite_spans
        .iter()
        .any(|&(start, end)| entity.start_index >= start && entity.end_index <= end)
}

fn entity_value(
    entity: &RawEntity,
    siblings: &[RawEntity],
    options: &PredictionOptions,
) -> Result<Value> {
    let resolution = entity.resolution.as_ref();
    Ok(match EntityShape::of(entity) {
        EntityShape::Composite => composite_value(entity, siblings, options)?,
        EntityShape::Simple => resolution
            .and_then(|resolution| resolution.get("value"))
            .cloned()
            .unwrap_or_else(|| Value::String(entity.entity.clone())),
        EntityShape::List => resolution
            .and_then(|resolution| resolution.get("values"))
            .cloned()
            .unwrap_or_else(|| Value::Array(vec![])),
        EntityShape::PrebuiltScalar => scalar_value(entity),
        EntityShape::PrebuiltUnit => unit_value(resolution),
        EntityShape::PrebuiltDatetime => datetime_value(resolution),
        EntityShape::PrebuiltDatetimeV1 | EntityShape::Opaque => resolution
            .cloned()
            .unwrap_or_else(|| Value::String(entity.entity.clone())),
    })
}

fn composite_value(
    composite: &RawEntity,
    siblings: &[RawEntity],
    options: &PredictionOptions,
) -> Result<Value> {
    let children = composite_children(composite, siblings)?;
    build_entity_tree(&children, options)
}

fn composite_children(
    composite: &RawEntity,
    siblings: &[RawEntity],
) -> Result<Vec<RawEntity>> {
    let mut children: Vec<RawEntity> = Vec::new();
    if let Some(records) = children_records(composite) {
        for record in records {
            let child: RawEntity = serde_json::from_value(record.clone()).map_err(|err| {
                NluRecognizerError::InvalidResponse(format!(
                    "malformed sub-entity of composite '{}': {}",
                    composite.entity_type, err
                ))
            })?;
            children.push(child);
        }
    }
    // Services may redundantly list sub-entities in the flat array as well.
    for sibling in siblings {
        if same_record(sibling, composite)
            || EntityShape::of(sibling) == EntityShape::Composite
            || sibling.start_index < composite.start_index
            || sibling.end_index > composite.end_index
            || children.iter().any(|child| same_record(child, sibling))
        {
            continue;
        }
        children.push(sibling.clone());
    }
    let parent_prefix = format!("{}.", composite.entity_type);
    for child in &mut children {
        if child.entity_type.starts_with(&parent_prefix) {
            child.entity_type = child.entity_type[parent_prefix.len()..].to_string();
        }
    }
    Ok(children)
}

fn same_record(left: &RawEntity, right: &RawEntity) -> bool {
    left.entity_type == right.entity_type
        && left.start_index == right.start_index
        && left.end_index == right.end_index
        && left.entity == right.entity
}

fn normalized_entity_name(entity: &RawEntity) -> EntityName {
    let type_name = entity
        .entity_type
        .split(':')
        .last()
        .unwrap_or(&entity.entity_type);
    let mut name = if type_name.starts_with(DATETIME_V2_PREFIX) {
        "datetime".to_string()
    } else if type_name.starts_with(CURRENCY_PREFIX) {
        "money".to_string()
    } else if type_name.starts_with(BUILTIN_PREFIX) {
        type_name[BUILTIN_PREFIX.len()..].to_string()
    } else {
        type_name.to_string()
    };
    if let Some(ref role) = entity.role {
        if !role.trim().is_empty() {
            name = role.clone();
        }
    }
    name.replace('.', "_").replace(' ', "_")
}

fn scalar_value(entity: &RawEntity) -> Value {
    let resolved = entity
        .resolution
        .as_ref()
        .and_then(|resolution| resolution.get("value"));
    match resolved {
        Some(value) if entity.entity_type == PERCENTAGE_TYPE => percentage_token(value),
        Some(value) => number_token(value),
        None => Value::String(entity.entity.clone()),
    }
}

fn unit_value(resolution: Option<&Value>) -> Value {
    let mut unit_object = Map::new();
    if let Some(resolution) = resolution {
        if let Some(value) = resolution.get("value") {
            unit_object.insert("number".to_string(), number_token(value));
        }
        unit_object.insert(
            "units".to_string(),
            resolution.get("unit").cloned().unwrap_or(Value::Null),
        );
    }
    Value::Object(unit_object)
}

// One canonical record per recognized span: the type of the first resolution
// record plus every distinct timex expression, in first-seen order. Records
// with different expressions are never merged away.
fn datetime_value(resolution: Option<&Value>) -> Value {
    let resolution = match resolution {
        Some(resolution) => resolution,
        None => return Value::Null,
    };
    let records = match resolution.get("values").and_then(Value::as_array) {
        Some(records) if !records.is_empty() => records,
        _ => return resolution.clone(),
    };
    let value_type = records[0].get("type").cloned().unwrap_or(Value::Null);
    let timexes: Vec<String> = records
        .iter()
        .filter_map(|record| record.get("timex"))
        .flat_map(|timex| match timex {
            Value::String(expression) => vec![expression.clone()],
            Value::Array(expressions) => expressions
                .iter()
                .filter_map(|expression| expression.as_str().map(str::to_string))
                .collect(),
            _ => vec![],
        })
        .unique()
        .collect();
    let mut datetime_object = Map::new();
    datetime_object.insert("type".to_string(), value_type);
    datetime_object.insert(
        "timex".to_string(),
        Value::Array(timexes.into_iter().map(Value::String).collect()),
    );
    Value::Object(datetime_object)
}

fn percentage_token(value: &Value) -> Value {
    match value {
        Value::String(text) => {
            number_token(&Value::String(text.trim_end_matches('%').to_string()))
        }
        other => number_token(other),
    }
}

fn number_token(value: &Value) -> Value {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            if let Ok(integer) = trimmed.parse::<i64>() {
                Value::from(integer)
            } else if let Ok(float) = trimmed.parse::<f64>() {
                if float.fract() == 0.0 && float.abs() < 9_007_199_254_740_992.0 {
                    Value::from(float as i64)
                } else {
                    Value::from(float)
                }
            } else {
                value.clone()
            }
        }
        other => other.clone(),
    }
}

// Span indices are copied as given: offset sanity is the service's business,
// and slicing against them is the caller's.
fn entity_metadata(entity: &RawEntity) -> Value {
    let mut metadata = Map::new();
    metadata.insert("startIndex".to_string(), Value::from(entity.start_index));
    metadata.insert("endIndex".to_string(), Value::from(entity.end_index));
    metadata.insert("text".to_string(), Value::String(entity.entity.clone()));
    if let Some(score) = entity.score {
        metadata.insert("score".to_string(), Value::from(score));
    }
    metadata.insert(
        "type".to_string(),
        Value::String(entity.entity_type.clone()),
    );
    Value::Object(metadata)
}

fn push_to_array(map: &mut Map<String, Value>, key: &str, value: Value) {
    match map.get_mut(key) {
        Some(Value::Array(ref mut items)) => items.push(value),
        _ => {
            map.insert(key.to_string(), Value::Array(vec![value]));
        }
    }
}

use serde_derive::Deserialize;
use serde_json::Value;

use crate::errors::*;

/// Raw document returned by the recognition service for one utterance.
///
/// Only the minimal contract is enforced here: `query` must be present and
/// `intents`/`entities`, when present, must be arrays of well-formed records.
/// Everything else is carried through untouched so that the normalizer can
/// tolerate service extensions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResponse {
    pub query: String,
    #[serde(default)]
    pub altered_query: Option<String>,
    #[serde(default)]
    pub top_scoring_intent: Option<RawIntent>,
    #[serde(default)]
    pub intents: Option<Vec<RawIntent>>,
    #[serde(default)]
    pub entities: Option<Vec<RawEntity>>,
    #[serde(default)]
    pub sentiment_analysis: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawIntent {
    pub intent: String,
    #[serde(default)]
    pub score: Option<f64>,
}

/// One record of the service's flat entity list.
///
/// Composite entities carry their sub-entities as RawEntity-shaped records
/// under `resolution["children"]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntity {
    pub entity: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub start_index: i64,
    pub end_index: i64,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub resolution: Option<Value>,
    #[serde(default)]
    pub role: Option<String>,
}

impl RawResponse {
    pub fn from_value(raw: &Value) -> Result<Self> {
        serde_json::from_value(raw.clone())
            .map_err(|err| NluRecognizerError::InvalidResponse(err.to_string()).into())
    }
}

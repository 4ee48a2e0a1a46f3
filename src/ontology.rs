use indexmap::IndexMap;
use serde_derive::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::IntentName;

/// Confidence score attached to one recognized intent, always in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntentScore {
    pub score: f64,
}

/// Canonical recognition result built once per recognition call.
///
/// `intents` preserves the order in which the service reported intents, which
/// makes top-intent tie-breaking deterministic. `entities` is the canonical
/// entity tree: for every top-level key `K` holding N occurrences, the
/// reserved `$instance` sibling holds N matching metadata records, and the
/// same pairing repeats inside each composite occurrence. The result is never
/// mutated after construction, so it can be read concurrently by trace and
/// telemetry consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizerResult {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altered_text: Option<String>,
    pub intents: IndexMap<IntentName, IntentScore>,
    pub entities: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Value>,
}

/// Caller-supplied view of the conversation turn being recognized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnContext {
    pub text: String,
    pub from_id: Option<String>,
    pub conversation_id: Option<String>,
}

impl TurnContext {
    pub fn new<T: Into<String>>(text: T) -> Self {
        Self {
            text: text.into(),
            from_id: None,
            conversation_id: None,
        }
    }

    pub fn with_from_id<T: Into<String>>(mut self, from_id: T) -> Self {
        self.from_id = Some(from_id.into());
        self
    }

    pub fn with_conversation_id<T: Into<String>>(mut self, conversation_id: T) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }
}

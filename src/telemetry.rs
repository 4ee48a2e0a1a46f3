use std::collections::HashMap;

use crate::application::{Application, PredictionOptions};
use crate::intent_utils::{top_intent, DEFAULT_INTENT_NAME};
use crate::ontology::{RecognizerResult, TurnContext};
use crate::utils::insert_if_absent;

pub const RECOGNIZER_RESULT_EVENT: &str = "RecognizerResult";

pub const APPLICATION_ID_PROPERTY: &str = "applicationId";
pub const INTENT_PROPERTY: &str = "intent";
pub const INTENT_SCORE_PROPERTY: &str = "intentScore";
pub const FROM_ID_PROPERTY: &str = "fromId";
pub const QUESTION_PROPERTY: &str = "question";
pub const ENTITIES_PROPERTY: &str = "entities";
pub const SENTIMENT_LABEL_PROPERTY: &str = "sentimentLabel";
pub const SENTIMENT_SCORE_PROPERTY: &str = "sentimentScore";

/// Sink for telemetry events.
///
/// Emission is best effort: implementations must swallow transport failures
/// instead of surfacing them, so that telemetry can never fail a recognition
/// call.
pub trait TelemetryClient: Send + Sync {
    fn track_event(
        &self,
        name: &str,
        properties: HashMap<String, String>,
        metrics: HashMap<String, f64>,
    );
}

/// Discards every event.
pub struct NullTelemetryClient;

impl TelemetryClient for NullTelemetryClient {
    fn track_event(
        &self,
        _name: &str,
        _properties: HashMap<String, String>,
        _metrics: HashMap<String, f64>,
    ) {
    }
}

/// Everything one recognition call exposes to event enrichment.
pub struct RecognitionEvent<'a> {
    pub result: &'a RecognizerResult,
    pub turn: &'a TurnContext,
    pub application: &'a Application,
    pub options: &'a PredictionOptions,
    pub properties: Option<&'a HashMap<String, String>>,
    pub metrics: Option<&'a HashMap<String, f64>>,
}

/// Strategy invoked once per recognition call, after the result is built.
///
/// The default implementation fills the standard properties and emits one
/// [`RECOGNIZER_RESULT_EVENT`]. A custom strategy may replace that behavior
/// entirely, or call [`fill_event_properties`] first and augment the maps
/// before emitting; either way it decides how many events to send, including
/// none.
pub trait EventHandler: Send + Sync {
    fn on_recognizer_result(&self, event: &RecognitionEvent, client: &dyn TelemetryClient);
}

/// Adapts a closure into an [`EventHandler`] strategy.
pub struct EventHandlerFn<F>(pub F);

impl<F> EventHandler for EventHandlerFn<F>
where
    F: Fn(&RecognitionEvent, &dyn TelemetryClient) + Send + Sync,
{
    fn on_recognizer_result(&self, event: &RecognitionEvent, client: &dyn TelemetryClient) {
        (self.0)(event, client)
    }
}

pub struct DefaultEventHandler;

impl EventHandler for DefaultEventHandler {
    fn on_recognizer_result(&self, event: &RecognitionEvent, client: &dyn TelemetryClient) {
        let properties = fill_event_properties(event);
        let metrics = event.metrics.cloned().unwrap_or_default();
        client.track_event(RECOGNIZER_RESULT_EVENT, properties, metrics);
    }
}

/// Builds the default event properties and merges caller-supplied ones.
///
/// Caller pairs are merged with insert-if-absent semantics: a caller key
/// equal to a default key does not override the default. The utterance is
/// only included when the options allow logging personal information.
pub fn fill_event_properties(event: &RecognitionEvent) -> HashMap<String, String> {
    let top_intent_name = top_intent(Some(event.result), None, None)
        .unwrap_or_else(|_| DEFAULT_INTENT_NAME.to_string());
    let top_intent_score = event
        .result
        .intents
        .get(&top_intent_name)
        .map(|intent| intent.score)
        .unwrap_or(0.0);

    let mut properties = HashMap::new();
    properties.insert(
        APPLICATION_ID_PROPERTY.to_string(),
        event.application.application_id.clone(),
    );
    properties.insert(INTENT_PROPERTY.to_string(), top_intent_name);
    properties.insert(
        INTENT_SCORE_PROPERTY.to_string(),
        format!("{:.2}", top_intent_score),
    );
    properties.insert(
        FROM_ID_PROPERTY.to_string(),
        event.turn.from_id.clone().unwrap_or_default(),
    );
    if let Some(ref sentiment) = event.result.sentiment {
        if let Some(label) = sentiment.get("label").and_then(|label| label.as_str()) {
            properties.insert(SENTIMENT_LABEL_PROPERTY.to_string(), label.to_string());
        }
        if let Some(score) = sentiment.get("score") {
            properties.insert(SENTIMENT_SCORE_PROPERTY.to_string(), score.to_string());
        }
    }
    properties.insert(
        ENTITIES_PROPERTY.to_string(),
        serde_json::to_string(&event.result.entities).unwrap_or_default(),
    );
    if event.options.log_personal_information && !event.turn.text.is_empty() {
        properties.insert(QUESTION_PROPERTY.to_string(), event.turn.text.clone());
    }
    if let Some(additional_properties) = event.properties {
        insert_if_absent(&mut properties, additional_properties);
    }
    properties
}

mod application;
pub mod errors;
mod intent_utils;
pub mod models;
mod normalizer;
mod ontology;
mod recognizer;
mod telemetry;
#[cfg(test)]
mod testutils;
mod utils;

pub use crate::application::{Application, PredictionOptions};
pub use crate::errors::*;
pub use crate::intent_utils::{top_intent, DEFAULT_INTENT_NAME};
pub use crate::models::{RawEntity, RawIntent, RawResponse};
pub use crate::normalizer::{normalize_response, normalize_value, EntityShape, INSTANCE_KEY};
pub use crate::ontology::{IntentScore, RecognizerResult, TurnContext};
pub use crate::recognizer::{NluRecognizer, RecognitionService};
pub use crate::telemetry::{
    fill_event_properties, DefaultEventHandler, EventHandler, EventHandlerFn,
    NullTelemetryClient, RecognitionEvent, TelemetryClient, APPLICATION_ID_PROPERTY,
    ENTITIES_PROPERTY, FROM_ID_PROPERTY, INTENT_PROPERTY, INTENT_SCORE_PROPERTY,
    QUESTION_PROPERTY, RECOGNIZER_RESULT_EVENT, SENTIMENT_LABEL_PROPERTY,
    SENTIMENT_SCORE_PROPERTY,
};
pub use crate::utils::{insert_if_absent, EntityName, IntentName};

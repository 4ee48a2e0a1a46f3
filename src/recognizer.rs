use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, warn};
use serde_derive::Serialize;
use serde_json::Value;

use crate::application::{Application, PredictionOptions};
use crate::errors::*;
use crate::intent_utils;
use crate::models::RawResponse;
use crate::normalizer::normalize_response;
use crate::ontology::{RecognizerResult, TurnContext};
use crate::telemetry::{
    DefaultEventHandler, EventHandler, NullTelemetryClient, RecognitionEvent, TelemetryClient,
};

/// Transport seam to the recognition service.
///
/// Implementations own everything network related (URL construction, retry,
/// timeouts) and hand back the raw JSON document of an already-successful
/// call.
pub trait RecognitionService: Send + Sync {
    fn recognize(&self, utterance: &str, options: &PredictionOptions) -> Result<Value>;
}

/// Recognizes utterances through an external intent/entity recognition
/// service and normalizes its responses into [`RecognizerResult`]s.
pub struct NluRecognizer {
    application: Application,
    options: PredictionOptions,
    service: Box<dyn RecognitionService>,
    telemetry_client: Arc<dyn TelemetryClient>,
    event_handler: Box<dyn EventHandler>,
}

impl NluRecognizer {
    pub fn new(
        application: Application,
        options: PredictionOptions,
        service: Box<dyn RecognitionService>,
    ) -> Self {
        Self {
            application,
            options,
            service,
            telemetry_client: Arc::new(NullTelemetryClient),
            event_handler: Box::new(DefaultEventHandler),
        }
    }

    pub fn with_telemetry_client(mut self, telemetry_client: Arc<dyn TelemetryClient>) -> Self {
        self.telemetry_client = telemetry_client;
        self
    }

    pub fn with_event_handler(mut self, event_handler: Box<dyn EventHandler>) -> Self {
        self.event_handler = event_handler;
        self
    }

    pub fn options(&self) -> &PredictionOptions {
        &self.options
    }

    /// Runs one recognition call and returns the canonical result.
    ///
    /// Caller-supplied telemetry properties/metrics are forwarded to the
    /// event handler. Event emission and trace logging happen after the
    /// result is built and can never fail the call.
    pub fn recognize(
        &self,
        turn: &TurnContext,
        properties: Option<&HashMap<String, String>>,
        metrics: Option<&HashMap<String, f64>>,
    ) -> Result<RecognizerResult> {
        debug!(
            "Recognizing utterance with application '{}'",
            self.application.application_id
        );
        let raw = self.service.recognize(&turn.text, &self.options)?;
        let response = RawResponse::from_value(&raw)?;
        let result = normalize_response(&response, &self.options)?;

        let event = RecognitionEvent {
            result: &result,
            turn,
            application: &self.application,
            options: &self.options,
            properties,
            metrics,
        };
        self.event_handler
            .on_recognizer_result(&event, self.telemetry_client.as_ref());
        self.log_trace(&raw, &result);
        Ok(result)
    }

    /// Winning intent of a result, under this recognizer's threshold/default
    /// policy.
    pub fn top_intent(&self, result: &RecognizerResult) -> Result<String> {
        intent_utils::top_intent(
            Some(result),
            Some(&self.options.default_intent_name),
            self.options.min_score_threshold,
        )
    }

    fn log_trace(&self, raw: &Value, result: &RecognizerResult) {
        let trace_info = RecognitionTraceInfo {
            recognizer_result: result,
            raw_response: raw,
            options: &self.options,
            model_id: &self.application.application_id,
        };
        match serde_json::to_string(&trace_info) {
            Ok(payload) => debug!("Recognition trace: {}", payload),
            Err(err) => warn!("Could not serialize recognition trace: {}", err),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionTraceInfo<'a> {
    recognizer_result: &'a RecognizerResult,
    raw_response: &'a Value,
    options: &'a PredictionOptions,
    model_id: &'a str,
}

use std::collections::HashMap;
use std::iter::FromIterator;
use std::sync::Mutex;

use failure::format_err;
use serde_json::Value;

use crate::application::PredictionOptions;
use crate::errors::*;
use crate::recognizer::RecognitionService;
use crate::telemetry::TelemetryClient;

#[derive(Default)]
pub struct MockedRecognitionService {
    pub mocked_outputs: HashMap<String, Value>,
}

impl RecognitionService for MockedRecognitionService {
    fn recognize(&self, utterance: &str, _options: &PredictionOptions) -> Result<Value> {
        self.mocked_outputs
            .get(utterance)
            .cloned()
            .ok_or_else(|| format_err!("No mocked response for '{}'", utterance))
    }
}

impl FromIterator<(String, Value)> for MockedRecognitionService {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            mocked_outputs: HashMap::from_iter(iter),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackedEvent {
    pub name: String,
    pub properties: HashMap<String, String>,
    pub metrics: HashMap<String, f64>,
}

#[derive(Default)]
pub struct CollectingTelemetryClient {
    events: Mutex<Vec<TrackedEvent>>,
}

impl TelemetryClient for CollectingTelemetryClient {
    fn track_event(
        &self,
        name: &str,
        properties: HashMap<String, String>,
        metrics: HashMap<String, f64>,
    ) {
        self.events.lock().unwrap().push(TrackedEvent {
            name: name.to_string(),
            properties,
            metrics,
        });
    }
}

impl CollectingTelemetryClient {
    pub fn tracked_events(&self) -> Vec<TrackedEvent> {
        self.events.lock().unwrap().clone()
    }
}

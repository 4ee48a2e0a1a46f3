use failure::bail;
use serde_derive::Serialize;

use crate::errors::*;

/// Connection settings of one recognition application.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: String,
    pub endpoint: String,
    // The key must never leak into trace payloads.
    #[serde(skip_serializing)]
    pub endpoint_key: String,
}

impl Application {
    pub fn new<I, E, K>(application_id: I, endpoint: E, endpoint_key: K) -> Result<Self>
    where
        I: Into<String>,
        E: Into<String>,
        K: Into<String>,
    {
        let application = Self {
            application_id: application_id.into(),
            endpoint: endpoint.into(),
            endpoint_key: endpoint_key.into(),
        };
        if application.application_id.is_empty() {
            bail!(NluRecognizerError::InvalidApplication(
                "application id is empty".to_string()
            ));
        }
        if application.endpoint.is_empty() {
            bail!(NluRecognizerError::InvalidApplication(
                "endpoint is empty".to_string()
            ));
        }
        if application.endpoint_key.is_empty() {
            bail!(NluRecognizerError::InvalidApplication(
                "endpoint key is empty".to_string()
            ));
        }
        Ok(application)
    }
}

/// Options of one recognition call, immutable once the call starts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionOptions {
    pub include_all_intents: bool,
    /// Controls `$instance` metadata tracking at every nesting level.
    pub verbose: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone_offset_minutes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staging: Option<bool>,
    pub log_personal_information: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score_threshold: Option<f64>,
    pub default_intent_name: String,
}

impl Default for PredictionOptions {
    fn default() -> Self {
        Self {
            include_all_intents: false,
            verbose: true,
            timezone_offset_minutes: None,
            staging: None,
            log_personal_information: false,
            min_score_threshold: None,
            default_intent_name: crate::intent_utils::DEFAULT_INTENT_NAME.to_string(),
        }
    }
}

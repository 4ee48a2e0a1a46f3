use crate::errors::*;
use crate::ontology::RecognizerResult;

pub const DEFAULT_INTENT_NAME: &str = "None";

/// Picks the winning intent name of a recognition result.
///
/// Returns `default_intent` ("None" unless given) when the result holds no
/// intents or when the best score is strictly below `min_score`; a score
/// equal to `min_score` is accepted. Exact ties keep the first intent in the
/// map's iteration order, which the normalizer guarantees to be the order
/// the service reported. Fails only when `result` itself is absent.
pub fn top_intent(
    result: Option<&RecognizerResult>,
    default_intent: Option<&str>,
    min_score: Option<f64>,
) -> Result<String> {
    let result = result.ok_or(NluRecognizerError::MissingResult)?;
    let default_intent = default_intent.unwrap_or(DEFAULT_INTENT_NAME);
    let min_score = min_score.unwrap_or(0.0);
    let mut top_name: Option<&str> = None;
    let mut top_score = ::std::f64::NEG_INFINITY;
    for (name, intent) in &result.intents {
        if intent.score > top_score {
            top_name = Some(name);
            top_score = intent.score;
        }
    }
    Ok(top_name
        .filter(|_| top_score >= min_score)
        .unwrap_or(default_intent)
        .to_string())
}

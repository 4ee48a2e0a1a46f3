use std::collections::HashMap;

pub type IntentName = String;
pub type EntityName = String;

/// Merges `additional` into `target` without overwriting existing keys.
///
/// Keys already present in `target` keep their value; only missing keys are
/// inserted. Telemetry enrichment relies on this asymmetry to keep default
/// event properties authoritative over caller-supplied ones.
pub fn insert_if_absent<V: Clone>(
    target: &mut HashMap<String, V>,
    additional: &HashMap<String, V>,
) {
    for (key, value) in additional {
        target.entry(key.clone()).or_insert_with(|| value.clone());
    }
}

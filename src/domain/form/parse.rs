//! Best-effort parsing of model responses.
//!
//! The model's output shape is the real source of ambiguity here, so both
//! parsers degrade instead of failing: an absent marker is a "no", an
//! unparseable fragment is an empty record. Upgrading to a strict parser
//! would require changing the prompt contract first.

use serde_json::{Map, Value};

/// Returns true when the literal "true" appears, in any case, before the
/// first code fence of the response (or anywhere, when no fence exists).
///
/// The boolean prompts prime an open fenced fragment, so everything before
/// the first ``` in the response is the model's answer.
pub fn affirmation(response: &str) -> bool {
    let pre_fence = match response.find("```") {
        Some(fence) => &response[..fence],
        None => response,
    };
    pre_fence.to_lowercase().contains("true")
}

/// Extracts the record fragment from an extraction response: the substring
/// from the start through the first closing brace, parsed as a JSON object.
///
/// Assumes the flat record the extraction prompt requests; a nested object
/// truncates early and degrades like any other malformed payload. Anything
/// unparseable yields an empty map and a warning, never an error.
pub fn extract_fragment(response: &str) -> Map<String, Value> {
    let candidate = match response.find('}') {
        Some(end) => &response[..=end],
        None => {
            tracing::warn!("discarding extraction response without closing brace");
            return Map::new();
        }
    };

    match serde_json::from_str::<Map<String, Value>>(candidate.trim()) {
        Ok(fragment) => fragment,
        Err(err) => {
            tracing::warn!("discarding unparseable extraction response: {}", err);
            Map::new()
        }
    }
}

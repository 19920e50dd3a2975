//! Parsing and normalization of raw model output.

use serde_json::{Map, Value};

use crate::error::ResolveError;
use crate::matcher::Candidate;

/// Strip a leading ```` ```json ```` (or bare ```` ``` ````) fence and a
/// trailing ```` ``` ```` fence.
pub fn strip_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```JSON") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    text = text.trim();
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Lowercase and trim an operation name; inner spaces and hyphens become `_`.
pub fn normalize_operation(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Turn raw model output into a normalized [`Candidate`].
///
/// The output must be one JSON object with a string `operation`. Entries of a
/// nested `parameters` object are merged in, with top-level keys winning.
/// Values are left as the model wrote them; typing them is up to validation,
/// which knows which keys are booleans.
pub fn parse_candidate(raw: &str) -> Result<Candidate, ResolveError> {
    let body = strip_fences(raw);
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ResolveError::Parse(format!("not valid JSON: {}", e)))?;

    let Value::Object(mut object) = value else {
        return Err(ResolveError::Parse("expected a JSON object".to_string()));
    };

    let operation = match object.remove("operation") {
        Some(Value::String(op)) => normalize_operation(&op),
        Some(_) => {
            return Err(ResolveError::Parse(
                "\"operation\" must be a string".to_string(),
            ))
        }
        None => return Err(ResolveError::Parse("missing \"operation\" key".to_string())),
    };

    let mut parameters = match object.remove("parameters") {
        Some(Value::Object(nested)) => nested,
        Some(other) => {
            // Not an object: treat it as an ordinary key.
            object.insert("parameters".to_string(), other);
            Map::new()
        }
        None => Map::new(),
    };
    parameters.extend(object);

    Ok(Candidate {
        operation,
        parameters,
    })
}

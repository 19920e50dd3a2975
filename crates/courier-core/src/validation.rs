//! Parameter validation and coercion against an [`OperationSpec`].

use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::types::{OperationSpec, ParamType, ParamValue, Parameters};

/// Outcome of coercing one raw JSON value to a declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coerced {
    Value(ParamValue),
    /// Null, or a blank string.
    Absent,
    Invalid,
}

/// Coerce a raw JSON value to `kind`.
///
/// Strings are trimmed. Numbers and booleans render to text for string
/// parameters; `"true"`/`"false"` (any case) become booleans; integer
/// strings become ints.
pub fn coerce(kind: ParamType, value: &Value) -> Coerced {
    match value {
        Value::Null => return Coerced::Absent,
        Value::String(s) if s.trim().is_empty() => return Coerced::Absent,
        _ => {}
    }

    match kind {
        ParamType::String => match value {
            Value::String(s) => Coerced::Value(ParamValue::String(s.trim().to_string())),
            Value::Number(n) => Coerced::Value(ParamValue::String(n.to_string())),
            Value::Bool(b) => Coerced::Value(ParamValue::String(b.to_string())),
            _ => Coerced::Invalid,
        },
        ParamType::Bool => match value {
            Value::Bool(b) => Coerced::Value(ParamValue::Bool(*b)),
            Value::String(s) => match parse_bool(s) {
                Some(b) => Coerced::Value(ParamValue::Bool(b)),
                None => Coerced::Invalid,
            },
            _ => Coerced::Invalid,
        },
        ParamType::Int => match value {
            Value::Number(n) => match n.as_i64() {
                Some(i) => Coerced::Value(ParamValue::Int(i)),
                None => Coerced::Invalid,
            },
            Value::String(s) => match s.trim().parse::<i64>() {
                Ok(i) => Coerced::Value(ParamValue::Int(i)),
                Err(_) => Coerced::Invalid,
            },
            _ => Coerced::Invalid,
        },
    }
}

/// Parse `"true"`/`"false"` case-insensitively.
pub fn parse_bool(s: &str) -> Option<bool> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Check `raw` against `spec` and produce the typed parameter map.
///
/// The first missing required key (in declaration order) is reported before
/// any type errors. Optional values that fail coercion fall back to their
/// default. Undeclared keys are dropped.
pub(crate) fn validate_parameters(
    spec: &OperationSpec,
    raw: &Map<String, Value>,
) -> Result<Parameters, ValidationError> {
    let required: Vec<(&str, ParamType, Coerced)> = spec
        .required
        .iter()
        .map(|p| {
            let coerced = raw
                .get(&p.key)
                .map_or(Coerced::Absent, |v| coerce(p.kind, v));
            (p.key.as_str(), p.kind, coerced)
        })
        .collect();

    if let Some((key, _, _)) = required.iter().find(|(_, _, c)| *c == Coerced::Absent) {
        return Err(ValidationError::MissingParameter(key.to_string()));
    }

    let mut parameters = Parameters::new();
    for (key, kind, coerced) in required {
        match coerced {
            Coerced::Value(v) => {
                parameters.insert(key.to_string(), v);
            }
            _ => {
                return Err(ValidationError::InvalidParameter {
                    key: key.to_string(),
                    expected: kind,
                })
            }
        }
    }

    for param in &spec.optional {
        let coerced = raw
            .get(&param.key)
            .map_or(Coerced::Absent, |v| coerce(param.kind, v));
        let value = match coerced {
            Coerced::Value(v) => Some(v),
            Coerced::Absent => param.default.clone(),
            Coerced::Invalid => {
                tracing::warn!(
                    operation = %spec.name,
                    key = %param.key,
                    expected = %param.kind,
                    "Optional parameter has the wrong type, using default"
                );
                param.default.clone()
            }
        };
        if let Some(v) = value {
            parameters.insert(param.key.clone(), v);
        }
    }

    for key in raw.keys().filter(|k| !spec.declares(k)) {
        tracing::debug!(operation = %spec.name, key = %key, "Dropping undeclared parameter");
    }

    Ok(parameters)
}

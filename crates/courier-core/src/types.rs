//! Core types: parameter schemas, operation specs and validated instructions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// Parameter schema
// =============================================================================

/// Declared type of an operation parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    String,
    Bool,
    Int,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::String => write!(f, "string"),
            ParamType::Bool => write!(f, "bool"),
            ParamType::Int => write!(f, "int"),
        }
    }
}

impl std::str::FromStr for ParamType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(ParamType::String),
            "bool" => Ok(ParamType::Bool),
            "int" => Ok(ParamType::Int),
            _ => Err(format!("Unknown parameter type: {}", s)),
        }
    }
}

/// A typed parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    String(String),
}

impl ParamValue {
    /// The type this value belongs to.
    pub fn param_type(&self) -> ParamType {
        match self {
            ParamValue::String(_) => ParamType::String,
            ParamValue::Bool(_) => ParamType::Bool,
            ParamValue::Int(_) => ParamType::Int,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::String(s) => write!(f, "{}", s),
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Int(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::String(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::String(s)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        ParamValue::Int(i)
    }
}

/// Schema for a single operation parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: ParamType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<ParamValue>,
}

impl ParamSpec {
    pub fn new(key: impl Into<String>, kind: ParamType) -> Self {
        Self {
            key: key.into(),
            kind,
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<ParamValue>) -> Self {
        self.default = Some(default.into());
        self
    }
}

// =============================================================================
// OperationSpec
// =============================================================================

/// Schema describing one supported operation.
///
/// Required and optional parameters keep their declaration order; validation
/// reports the first missing required key in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: Vec<ParamSpec>,
    #[serde(default)]
    pub optional: Vec<ParamSpec>,
}

impl OperationSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            required: Vec::new(),
            optional: Vec::new(),
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn required(mut self, key: impl Into<String>, kind: ParamType) -> Self {
        self.required.push(ParamSpec::new(key, kind));
        self
    }

    pub fn optional(mut self, key: impl Into<String>, kind: ParamType) -> Self {
        self.optional.push(ParamSpec::new(key, kind));
        self
    }

    pub fn optional_with_default(
        mut self,
        key: impl Into<String>,
        kind: ParamType,
        default: impl Into<ParamValue>,
    ) -> Self {
        self.optional.push(ParamSpec::new(key, kind).with_default(default));
        self
    }

    /// All parameter specs, required first.
    pub fn params(&self) -> impl Iterator<Item = &ParamSpec> {
        self.required.iter().chain(self.optional.iter())
    }

    /// Whether `key` is declared by this operation.
    pub fn declares(&self, key: &str) -> bool {
        self.params().any(|p| p.key == key)
    }

    /// One-line signature used in prompts and listings.
    ///
    /// `create_repository(name: string, [description: string = "", add_readme: bool = false])`
    pub fn signature(&self) -> String {
        let mut parts: Vec<String> = self
            .required
            .iter()
            .map(|p| format!("{}: {}", p.key, p.kind))
            .collect();
        if !self.optional.is_empty() {
            let optional: Vec<String> = self
                .optional
                .iter()
                .map(|p| match &p.default {
                    Some(ParamValue::String(s)) => format!("{}: {} = \"{}\"", p.key, p.kind, s),
                    Some(v) => format!("{}: {} = {}", p.key, p.kind, v),
                    None => format!("{}: {}", p.key, p.kind),
                })
                .collect();
            parts.push(format!("[{}]", optional.join(", ")));
        }
        format!("{}({})", self.name, parts.join(", "))
    }
}

// =============================================================================
// Instruction
// =============================================================================

/// Validated parameter mapping, ordered by key.
pub type Parameters = BTreeMap<String, ParamValue>;

/// A validated request to run one registered operation.
///
/// Only [`OperationRegistry::validate`](crate::OperationRegistry::validate)
/// constructs these, so holding one means the operation exists and every
/// required parameter is present with its declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instruction {
    operation: String,
    parameters: Parameters,
}

impl Instruction {
    pub(crate) fn new(operation: String, parameters: Parameters) -> Self {
        Self {
            operation,
            parameters,
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.parameters.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ParamValue::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(ParamValue::as_bool)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(ParamValue::as_int)
    }

    /// Split into the operation name and its parameters.
    pub fn into_parts(self) -> (String, Parameters) {
        (self.operation, self.parameters)
    }
}

// =============================================================================
// Tests
// =============================================================================

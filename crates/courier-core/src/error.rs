use thiserror::Error;

use crate::types::ParamType;

/// Top-level error type for the Courier system.
///
/// Subsystem crates define their own error types; the variants here cover
/// configuration, I/O and registry construction at process start.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CourierError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

impl From<toml::de::Error> for CourierError {
    fn from(err: toml::de::Error) -> Self {
        CourierError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for CourierError {
    fn from(err: toml::ser::Error) -> Self {
        CourierError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for CourierError {
    fn from(err: serde_json::Error) -> Self {
        CourierError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Courier operations.
pub type Result<T> = std::result::Result<T, CourierError>;

/// Errors raised while building an [`OperationRegistry`](crate::OperationRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("duplicate operation: {0}")]
    DuplicateOperation(String),

    #[error("duplicate parameter '{key}' in operation {operation}")]
    DuplicateParameter { operation: String, key: String },

    #[error("default for '{key}' in operation {operation} is not of type {expected}")]
    DefaultTypeMismatch {
        operation: String,
        key: String,
        expected: ParamType,
    },

    #[error("unknown catalog: {0}")]
    UnknownCatalog(String),
}

/// Errors from validating a candidate operation against the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("missing required parameter: {0}")]
    MissingParameter(String),

    #[error("parameter '{key}' must be of type {expected}")]
    InvalidParameter { key: String, expected: ParamType },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CourierError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CourierError = io_err.into();
        assert!(matches!(err, CourierError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("not = {{ valid").unwrap_err();
        let err: CourierError = toml_err.into();
        assert!(matches!(err, CourierError::Config(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: CourierError = json_err.into();
        assert!(matches!(err, CourierError::Serialization(_)));
    }

    #[test]
    fn test_registry_error_conversion() {
        let err: CourierError = RegistryError::DuplicateOperation("list_photos".into()).into();
        assert!(matches!(err, CourierError::Registry(_)));
        assert_eq!(
            err.to_string(),
            "Registry error: duplicate operation: list_photos"
        );
    }

    #[test]
    fn test_registry_error_display() {
        let err = RegistryError::DuplicateParameter {
            operation: "star_repository".into(),
            key: "owner".into(),
        };
        assert_eq!(
            err.to_string(),
            "duplicate parameter 'owner' in operation star_repository"
        );

        let err = RegistryError::DefaultTypeMismatch {
            operation: "create_repository".into(),
            key: "add_readme".into(),
            expected: ParamType::Bool,
        };
        assert_eq!(
            err.to_string(),
            "default for 'add_readme' in operation create_repository is not of type bool"
        );

        let err = RegistryError::UnknownCatalog("fax".into());
        assert_eq!(err.to_string(), "unknown catalog: fax");
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::UnknownOperation("launch_rocket".into());
        assert_eq!(err.to_string(), "unknown operation: launch_rocket");

        let err = ValidationError::MissingParameter("name".into());
        assert_eq!(err.to_string(), "missing required parameter: name");

        let err = ValidationError::InvalidParameter {
            key: "add_readme".into(),
            expected: ParamType::Bool,
        };
        assert_eq!(err.to_string(), "parameter 'add_readme' must be of type bool");
    }
}

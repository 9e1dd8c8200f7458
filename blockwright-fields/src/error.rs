//! Error types for schemas and coercion

use std::path::PathBuf;

use blockwright_common::{ErrorSeverity, Severity};
use thiserror::Error;

/// Result type for fields operations
pub type Result<T> = std::result::Result<T, FieldsError>;

/// Errors that can occur in schema lookup and value coercion
#[derive(Debug, Error)]
pub enum FieldsError {
    /// Type name is not registered with the schema provider
    #[error("unknown type: {name}")]
    UnknownType { name: String },

    /// Two type definitions share a name
    #[error("duplicate type name: {name}")]
    DuplicateType { name: String },

    /// Raw value does not match any shape the field kind accepts
    #[error("invalid {kind} value: {message}")]
    InvalidFieldValue { kind: &'static str, message: String },

    /// Reference lists need child records created, which the pure coercer never does
    #[error("{kind} fields must be materialized, not coerced")]
    NotScalar { kind: &'static str },

    /// Schema directory not found
    #[error("schema directory not found: {path}")]
    NotInitialized { path: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl FieldsError {
    /// Create an invalid value error for the given kind
    pub fn invalid(kind: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidFieldValue {
            kind,
            message: message.into(),
        }
    }
}

impl Severity for FieldsError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            FieldsError::Io(_) | FieldsError::NotInitialized { .. } => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }
}

//! Error types for the materialization engine

use blockwright_common::{ErrorSeverity, Severity};
use blockwright_fields::FieldsError;
use thiserror::Error;

use crate::ids::NodeId;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while materializing blocks or assembling layouts
///
/// Variants that point into the input carry a dotted `path`
/// (`sections[0].content[1].accordion.items[2].title`) built up as the error
/// propagates through each enclosing level.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Raw value does not match the shapes accepted by the field kind
    #[error("invalid value{}: {message}", at(.path))]
    InvalidFieldValue { path: String, message: String },

    /// Type name absent from the schema provider
    #[error("unknown type '{name}'{}", at(.path))]
    UnknownType { name: String, path: String },

    /// Target node lacks a layout field
    #[error("node {node} has no layout field")]
    NoLayoutField { node: NodeId },

    /// The persistence collaborator failed
    #[error("storage error: {message}")]
    Storage { message: String },

    /// Malformed block or section spec
    #[error("configuration error{}: {message}", at(.path))]
    Configuration { path: String, message: String },

    /// Referenced record does not exist
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    /// Create a configuration error
    pub fn configuration(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidFieldValue {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Translate a schema or coercion failure at `path`.
    pub fn from_fields(err: FieldsError, path: &str) -> Self {
        match err {
            FieldsError::UnknownType { name } => Self::UnknownType {
                name,
                path: path.to_string(),
            },
            FieldsError::InvalidFieldValue { .. } | FieldsError::NotScalar { .. } => {
                Self::invalid_value(path, err.to_string())
            }
            other => Self::storage(other.to_string()),
        }
    }

    /// Prefix the diagnostic path with an enclosing segment.
    pub fn nested(self, prefix: &str) -> Self {
        match self {
            Self::InvalidFieldValue { path, message } => Self::InvalidFieldValue {
                path: join_path(prefix, &path),
                message,
            },
            Self::UnknownType { name, path } => Self::UnknownType {
                name,
                path: join_path(prefix, &path),
            },
            Self::Configuration { path, message } => Self::Configuration {
                path: join_path(prefix, &path),
                message,
            },
            other => other,
        }
    }

    /// The diagnostic path, for variants that carry one
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::InvalidFieldValue { path, .. }
            | Self::UnknownType { path, .. }
            | Self::Configuration { path, .. } => Some(path),
            _ => None,
        }
    }
}

fn at(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" at {path}")
    }
}

/// Join two path segments with a dot, unless the tail is an index or empty.
pub(crate) fn join_path(head: &str, tail: &str) -> String {
    if head.is_empty() {
        tail.to_string()
    } else if tail.is_empty() {
        head.to_string()
    } else if tail.starts_with('[') {
        format!("{head}{tail}")
    } else {
        format!("{head}.{tail}")
    }
}

impl Severity for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            EngineError::NoLayoutField { .. } => ErrorSeverity::Warning,
            EngineError::Storage { .. } | EngineError::Io(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }
}

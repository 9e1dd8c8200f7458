//! Error type for CLI commands

use std::path::PathBuf;

use blockwright_common::{ErrorSeverity, Severity};
use blockwright_config::ConfigError;
use blockwright_engine::EngineError;
use blockwright_fields::FieldsError;
use thiserror::Error;

/// Result type for CLI commands
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fields(#[from] FieldsError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Workspace directory has not been initialized
    #[error("{} is not a blockwright workspace (run `blockwright init`)", .root.display())]
    NotInitialized { root: PathBuf },

    /// Some rows of an import failed
    #[error("{failed} block(s) failed to import")]
    ImportFailed { failed: usize },
}

impl Severity for CliError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            CliError::Config(e) => e.severity(),
            CliError::Fields(e) => e.severity(),
            CliError::Engine(e) => e.severity(),
            CliError::NotInitialized { .. } | CliError::ImportFailed { .. } => ErrorSeverity::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockwright_engine::NodeId;

    #[test]
    fn test_engine_severity_passes_through() {
        let err = CliError::from(EngineError::NoLayoutField { node: NodeId(2) });
        assert_eq!(err.severity(), ErrorSeverity::Warning);
        assert_eq!(err.to_string(), "node 2 has no layout field");
    }

    #[test]
    fn test_not_initialized_message() {
        let err = CliError::NotInitialized {
            root: PathBuf::from("/tmp/site"),
        };
        assert!(err.to_string().contains("blockwright init"));
    }
}

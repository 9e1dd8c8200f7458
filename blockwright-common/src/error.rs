//! Severity classification for Blockwright errors
//!
//! Each crate owns its own `thiserror` enum. This module only provides the
//! shared vocabulary for how bad a given failure is, so callers (batch
//! importers, the CLI) can decide whether to skip an item or abort a run.

/// Severity levels for error classification
///
/// - **Warning**: the item cannot be processed but the run can continue without
///   the caller treating it as a failure (e.g. a node without a layout field).
/// - **Error**: the current item failed; other items are unaffected.
/// - **Critical**: the backing store failed and later items are unlikely to succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Recoverable, the caller may skip the item
    Warning,
    /// The current item failed
    Error,
    /// Persistence or infrastructure failure
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Trait for error types that have severity levels
///
/// ```rust
/// use blockwright_common::{ErrorSeverity, Severity};
///
/// #[derive(Debug)]
/// enum StoreError {
///     Corrupted,
///     Missing,
/// }
///
/// impl Severity for StoreError {
///     fn severity(&self) -> ErrorSeverity {
///         match self {
///             StoreError::Corrupted => ErrorSeverity::Critical,
///             StoreError::Missing => ErrorSeverity::Warning,
///         }
///     }
/// }
///
/// assert_eq!(StoreError::Missing.severity(), ErrorSeverity::Warning);
/// ```
pub trait Severity {
    /// Get the severity level of this error
    fn severity(&self) -> ErrorSeverity;
}

/// Emit a `tracing` event for `err` at the level matching its severity.
pub fn log_error<E>(err: &E)
where
    E: Severity + std::fmt::Display,
{
    match err.severity() {
        ErrorSeverity::Warning => tracing::warn!(error = %err, "skipped"),
        ErrorSeverity::Error => tracing::error!(error = %err, "failed"),
        ErrorSeverity::Critical => tracing::error!(error = %err, critical = true, "failed"),
    }
}

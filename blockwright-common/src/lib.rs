//! # Blockwright Common
//!
//! Foundational pieces shared by every Blockwright crate.
//!
//! - [`error`] - Severity classification for domain error types
//! - [`logging`] - Helpers for rendering values inside `tracing` events

pub mod error;
pub mod logging;

pub use error::{log_error, ErrorSeverity, Severity};
pub use logging::Pretty;

//! Core error types for formwire.
//!
//! [`FormwireError`] is the umbrella error shared by every crate in the
//! workspace. Crate-local errors (the controller's `FormError`, the
//! transport's `TransportError`) convert into it so applications can use a
//! single `?`-friendly type at their boundaries.

use indexmap::IndexMap;
use thiserror::Error;

/// Field-scoped error messages, keyed by field name.
///
/// Insertion order is preserved so renderers display errors in the order
/// the server reported them.
pub type FieldErrors = IndexMap<String, String>;

/// The primary error type for formwire.
#[derive(Error, Debug)]
pub enum FormwireError {
    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Requests ─────────────────────────────────────────────────────

    /// The transport failed outside of the request lifecycle.
    #[error("Transport error: {0}")]
    TransportError(String),

    // ── Misuse ───────────────────────────────────────────────────────

    /// A form controller was used in a way its contract forbids.
    #[error("Form misuse: {0}")]
    FormMisuse(String),

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FormwireError {
    /// Returns `true` for errors caused by the caller rather than the environment.
    pub const fn is_misuse(&self) -> bool {
        matches!(self, Self::FormMisuse(_))
    }
}

impl From<serde_json::Error> for FormwireError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// A convenience type alias for `Result<T, FormwireError>`.
pub type FormwireResult<T> = Result<T, FormwireError>;

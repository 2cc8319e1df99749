//! Errors raised by misusing a [`FormController`](crate::FormController).
//!
//! Transport failures never surface here: they become form state. These
//! errors only report calls the controller cannot honor.

use thiserror::Error;

use formwire_core::FormwireError;
use formwire_http::UnsupportedMethod;

/// A call the controller refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// A mutator or submission was called after [`dispose`](crate::FormController::dispose).
    #[error("`{operation}` called on a disposed form")]
    Disposed { operation: &'static str },

    /// The method string is not one of get, post, put, patch or delete.
    #[error(transparent)]
    UnsupportedMethod(#[from] UnsupportedMethod),

    /// The submission target was empty.
    #[error("cannot submit a form to an empty URL")]
    EmptyUrl,

    /// A header name or value could not be used.
    #[error("invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    /// A previous panic poisoned the form state.
    #[error("form state lock poisoned while {0}")]
    StatePoisoned(&'static str),

    /// Submissions must be started from inside a tokio runtime.
    #[error("`{0}` requires a running tokio runtime")]
    NoRuntime(&'static str),
}

impl From<FormError> for FormwireError {
    fn from(err: FormError) -> Self {
        Self::FormMisuse(err.to_string())
    }
}

/// A convenience type alias for `Result<T, FormError>`.
pub type FormResult<T> = Result<T, FormError>;

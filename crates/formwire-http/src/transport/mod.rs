//! The contract between form controllers and the network.
//!
//! A [`Transport`] takes one fully-built [`TransportRequest`] and resolves
//! it to a [`TransportResponse`] or one of three failures:
//!
//! - [`TransportError::Cancelled`] when the request's [`AbortSignal`] fired,
//! - [`TransportError::Validation`] for a 422 carrying field errors,
//! - [`TransportError::Other`] for everything else.
//!
//! [`RouterTransport`] is an in-process implementation over an axum router.

pub mod abort;
pub mod router;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use thiserror::Error;

use formwire_core::{FieldErrors, FormwireError};

use crate::method::Method;
use crate::multipart::MultipartForm;
use crate::payload::Payload;
use crate::query::QueryParams;

pub use abort::{AbortController, AbortSignal};
pub use router::RouterTransport;

/// Receives upload progress reports while a request is in flight.
pub type ProgressSink = Arc<dyn Fn(UploadProgress) + Send + Sync>;

/// A snapshot of upload progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UploadProgress {
    /// Bytes sent so far.
    pub loaded: u64,
    /// Total bytes to send, when known.
    pub total: Option<u64>,
    /// Completion in `0.0..=1.0`, when known.
    pub fraction: Option<f64>,
    /// `round(fraction * 100)`, or 0 when the fraction is unknown.
    pub percentage: u8,
}

impl UploadProgress {
    /// Builds a snapshot, deriving the fraction from `total` when it is non-zero.
    #[allow(clippy::cast_precision_loss)]
    pub fn new(loaded: u64, total: Option<u64>) -> Self {
        let fraction = total
            .filter(|t| *t > 0)
            .map(|t| loaded as f64 / t as f64);
        Self::with_fraction(loaded, total, fraction)
    }

    /// Builds a snapshot from an explicit completion fraction.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn with_fraction(loaded: u64, total: Option<u64>, fraction: Option<f64>) -> Self {
        let percentage = fraction.map_or(0, |f| (f * 100.0).round().clamp(0.0, 100.0) as u8);
        Self {
            loaded,
            total,
            fraction,
            percentage,
        }
    }
}

/// The body of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// No body; GET submissions carry their data in the query string.
    Empty,
    /// `application/x-www-form-urlencoded` pairs.
    Form(QueryParams),
    /// `multipart/form-data` parts.
    Multipart(MultipartForm),
}

impl RequestBody {
    /// Returns `true` for [`RequestBody::Empty`].
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl From<Payload> for RequestBody {
    fn from(payload: Payload) -> Self {
        match payload {
            Payload::Plain(params) => Self::Form(params),
            Payload::Multipart(form) => Self::Multipart(form),
        }
    }
}

/// A request ready to be sent.
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub query: QueryParams,
    pub body: RequestBody,
    pub abort: AbortSignal,
    pub progress: ProgressSink,
}

impl TransportRequest {
    /// Forwards an upload progress report to the submitter.
    pub fn report_progress(&self, progress: UploadProgress) {
        (self.progress)(progress);
    }
}

impl fmt::Debug for TransportRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("query", &self.query)
            .field("body", &self.body)
            .field("aborted", &self.abort.is_aborted())
            .finish_non_exhaustive()
    }
}

/// A successful response.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TransportResponse {
    /// Creates a response with no headers.
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Returns the body as (lossy) UTF-8 text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parses the body as JSON.
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Details of a failure that is neither a cancellation nor a validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureDetail {
    /// The HTTP status, absent for network-level failures.
    pub status: Option<u16>,
    /// A human-readable summary.
    pub message: String,
    /// The response body, when it was JSON.
    pub body: Option<serde_json::Value>,
}

impl FailureDetail {
    /// A failure that never produced a response.
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            body: None,
        }
    }

    /// A failure response with the given status.
    pub fn status(status: StatusCode, body: Option<serde_json::Value>) -> Self {
        let message = body
            .as_ref()
            .and_then(|b| b.get("message"))
            .and_then(serde_json::Value::as_str)
            .map_or_else(
                || {
                    format!(
                        "Request failed with status code {}",
                        status.as_u16()
                    )
                },
                str::to_string,
            );
        Self {
            status: Some(status.as_u16()),
            message,
            body,
        }
    }
}

impl fmt::Display for FailureDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} ({status})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Why a request did not succeed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The request's abort signal fired.
    #[error("request cancelled")]
    Cancelled,

    /// The server rejected the input with field-level messages (HTTP 422).
    #[error("validation failed for {} field(s)", .errors.len())]
    Validation { errors: FieldErrors },

    /// Any other failure: network errors and non-422 error statuses.
    #[error("request failed: {0}")]
    Other(FailureDetail),
}

impl TransportError {
    /// Returns `true` for [`TransportError::Cancelled`].
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Classifies an error response.
    ///
    /// A 422 whose JSON body has an `errors` object with at least one
    /// message becomes [`TransportError::Validation`]; anything else
    /// becomes [`TransportError::Other`].
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let json = serde_json::from_slice::<serde_json::Value>(body).ok();
        if status == StatusCode::UNPROCESSABLE_ENTITY {
            let errors = json
                .as_ref()
                .and_then(parse_validation_errors)
                .filter(|errors| !errors.is_empty());
            if let Some(errors) = errors {
                return Self::Validation { errors };
            }
        }
        Self::Other(FailureDetail::status(status, json))
    }
}

impl From<TransportError> for FormwireError {
    fn from(err: TransportError) -> Self {
        Self::TransportError(err.to_string())
    }
}

/// Extracts field errors from a `{"errors": {...}}` body.
///
/// A field mapped to a list keeps only its first message; non-string
/// messages are rendered as JSON.
pub fn parse_validation_errors(body: &serde_json::Value) -> Option<FieldErrors> {
    let errors = body.get("errors")?.as_object()?;
    let parsed = errors
        .iter()
        .filter_map(|(field, value)| {
            let message = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Array(items) => match items.first()? {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                },
                other => other.to_string(),
            };
            Some((field.clone(), message))
        })
        .collect();
    Some(parsed)
}

/// Sends requests on behalf of form controllers.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request and waits for it to settle.
    ///
    /// Implementations should resolve with [`TransportError::Cancelled`]
    /// promptly once `request.abort` fires.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_progress_percentage() {
        assert_eq!(UploadProgress::new(50, Some(200)).percentage, 25);
        assert_eq!(UploadProgress::new(1, Some(3)).percentage, 33);
        assert_eq!(UploadProgress::new(2, Some(3)).percentage, 67);
        assert_eq!(UploadProgress::new(10, None).percentage, 0);
        assert_eq!(UploadProgress::new(0, Some(0)).fraction, None);
        assert_eq!(UploadProgress::with_fraction(5, None, Some(1.2)).percentage, 100);
    }

    #[test]
    fn test_from_response_validation() {
        let body = json!({"message": "invalid", "errors": {"name": ["required", "too short"], "email": "taken"}});
        let err = TransportError::from_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            body.to_string().as_bytes(),
        );
        let TransportError::Validation { errors } = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.get("name").map(String::as_str), Some("required"));
        assert_eq!(errors.get("email").map(String::as_str), Some("taken"));
    }

    #[test]
    fn test_from_response_422_without_errors_is_other() {
        let err = TransportError::from_response(StatusCode::UNPROCESSABLE_ENTITY, b"nope");
        assert!(matches!(err, TransportError::Other(ref d) if d.status == Some(422)));
    }

    #[test]
    fn test_from_response_422_with_no_messages_is_other() {
        for body in [json!({"errors": {}}), json!({"message": "bad", "errors": {"name": []}})] {
            let err = TransportError::from_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                body.to_string().as_bytes(),
            );
            assert!(matches!(err, TransportError::Other(ref d) if d.status == Some(422)));
        }
    }

    #[test]
    fn test_from_response_server_error() {
        let err = TransportError::from_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            br#"{"message": "Server Error"}"#,
        );
        let TransportError::Other(detail) = err else {
            panic!("expected other error");
        };
        assert_eq!(detail.status, Some(500));
        assert_eq!(detail.message, "Server Error");
        assert_eq!(detail.to_string(), "Server Error (500)");
    }

    #[test]
    fn test_failure_detail_default_message() {
        let detail = FailureDetail::status(StatusCode::NOT_FOUND, None);
        assert_eq!(detail.message, "Request failed with status code 404");
        assert_eq!(FailureDetail::network("connection reset").to_string(), "connection reset");
    }

    #[test]
    fn test_parse_validation_errors_skips_empty_lists() {
        let errors = parse_validation_errors(&json!({"errors": {"a": [], "b": ["x"]}})).unwrap();
        assert_eq!(errors.len(), 1);
        assert!(parse_validation_errors(&json!({"message": "x"})).is_none());
    }

    #[test]
    fn test_transport_error_display() {
        assert_eq!(TransportError::Cancelled.to_string(), "request cancelled");
        let mut errors = FieldErrors::new();
        errors.insert("name".into(), "required".into());
        assert_eq!(
            TransportError::Validation { errors }.to_string(),
            "validation failed for 1 field(s)"
        );
        assert!(TransportError::Cancelled.is_cancelled());
    }

    #[test]
    fn test_request_body_from_payload() {
        let body: RequestBody = Payload::Plain(QueryParams::new()).into();
        assert!(matches!(body, RequestBody::Form(_)));
        assert!(RequestBody::Empty.is_empty());
    }

    #[test]
    fn test_response_helpers() {
        let response = TransportResponse::new(StatusCode::OK, r#"{"ok":true}"#);
        assert_eq!(response.text(), r#"{"ok":true}"#);
        assert_eq!(response.json().unwrap(), json!({"ok": true}));
    }
}

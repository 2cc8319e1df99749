//! # formwire-http
//!
//! HTTP plumbing for formwire. Provides the form value model, the payload
//! builder that flattens nested data into bracket-notation pairs or a
//! multipart form, and the [`Transport`](transport::Transport) contract
//! controllers send requests through.
//!
//! ## Modules
//!
//! - [`value`] - `FormValue`, `FormData`, and `FileBlob`
//! - [`payload`] - `build_payload` and bracket-notation flattening
//! - [`query`] - Ordered query/urlencoded pairs
//! - [`multipart`] - `multipart/form-data` encoding
//! - [`method`] - The five supported verbs
//! - [`transport`] - The transport trait, cancellation, and an axum-backed transport

pub mod method;
pub mod multipart;
pub mod payload;
pub mod query;
pub mod transport;
pub mod value;

pub use method::{Method, UnsupportedMethod};
pub use multipart::MultipartForm;
pub use payload::{build_payload, Payload};
pub use query::QueryParams;
pub use transport::{
    AbortController, AbortSignal, FailureDetail, RequestBody, Transport, TransportError,
    TransportRequest, TransportResponse, UploadProgress,
};
pub use value::{FileBlob, FormData, FormValue};

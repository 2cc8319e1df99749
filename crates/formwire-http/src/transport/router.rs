//! An in-process [`Transport`] that dispatches to an axum [`Router`].
//!
//! Requests never touch a socket: each one is built as an
//! `http::Request` and driven through the router with
//! [`tower::ServiceExt::oneshot`]. Useful for embedding a backend in the
//! same process and for end-to-end tests.
//!
//! ```rust,no_run
//! use axum::routing::post;
//! use axum::Router;
//! use formwire_http::transport::RouterTransport;
//!
//! let app = Router::new().route("/profile", post(|| async { "saved" }));
//! let transport = RouterTransport::new(app);
//! ```

use async_trait::async_trait;
use axum::body::Body;
use axum::Router;
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Request};
use http_body_util::BodyExt;
use tower::ServiceExt;
use url::Url;

use formwire_core::{FormwireError, FormwireResult, SETTINGS};

use super::{
    FailureDetail, RequestBody, Transport, TransportError, TransportRequest, TransportResponse,
    UploadProgress,
};
use crate::multipart::MultipartForm;
use crate::query::QueryParams;

/// Fallback origin when the configured base URL does not parse.
const FALLBACK_BASE_URL: &str = "http://localhost";

/// Sends form submissions straight into an axum router.
#[derive(Clone)]
pub struct RouterTransport {
    router: Router,
    base_url: Url,
}

impl RouterTransport {
    /// Wraps a router, resolving relative URLs against the configured `base_url`.
    pub fn new(router: Router) -> Self {
        let configured = SETTINGS.get_or_default().base_url;
        let base_url = Url::parse(&configured).unwrap_or_else(|_| {
            Url::parse(FALLBACK_BASE_URL).expect("fallback base URL should parse")
        });
        Self { router, base_url }
    }

    /// Wraps a router with an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns [`FormwireError::ConfigurationError`] if `base_url` does not parse.
    pub fn with_base_url(router: Router, base_url: &str) -> FormwireResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            FormwireError::ConfigurationError(format!("Invalid base URL '{base_url}': {e}"))
        })?;
        Ok(Self { router, base_url })
    }

    /// Resolves `url` and appends `query`, returning the path-and-query target.
    ///
    /// Query parameters already present in `url` are kept ahead of `query`.
    pub fn request_target(&self, url: &str, query: &QueryParams) -> Result<String, TransportError> {
        let mut resolved = self.base_url.join(url).map_err(|e| {
            TransportError::Other(FailureDetail::network(format!("Invalid URL '{url}': {e}")))
        })?;

        if !query.is_empty() {
            resolved.query_pairs_mut().extend_pairs(query.iter());
        }

        Ok(match resolved.query() {
            Some(q) => format!("{}?{q}", resolved.path()),
            None => resolved.path().to_string(),
        })
    }

    fn encode_body(body: RequestBody) -> (Option<String>, Bytes) {
        match body {
            RequestBody::Empty => (None, Bytes::new()),
            RequestBody::Form(params) => (
                Some(mime::APPLICATION_WWW_FORM_URLENCODED.to_string()),
                Bytes::from(params.urlencode()),
            ),
            RequestBody::Multipart(form) => {
                let boundary = MultipartForm::generate_boundary();
                (
                    Some(MultipartForm::content_type(&boundary)),
                    form.encode(&boundary),
                )
            }
        }
    }
}

#[async_trait]
impl Transport for RouterTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        if request.abort.is_aborted() {
            return Err(TransportError::Cancelled);
        }

        let target = self.request_target(&request.url, &request.query)?;
        let TransportRequest {
            method,
            headers,
            body,
            abort,
            progress,
            ..
        } = request;
        let (content_type, body) = Self::encode_body(body);

        let mut builder = Request::builder().method(http::Method::from(method)).uri(&target);
        if let Some(map) = builder.headers_mut() {
            map.extend(headers);
            if let Some(ct) = content_type {
                if !map.contains_key(CONTENT_TYPE) {
                    let value = HeaderValue::from_str(&ct).map_err(|e| {
                        TransportError::Other(FailureDetail::network(e.to_string()))
                    })?;
                    map.insert(CONTENT_TYPE, value);
                }
            }
        }

        let body_len = body.len() as u64;
        let http_request = builder
            .body(Body::from(body))
            .map_err(|e| TransportError::Other(FailureDetail::network(e.to_string())))?;

        if body_len > 0 {
            progress(UploadProgress::new(body_len, Some(body_len)));
        }

        tracing::debug!(method = %method, target = %target, bytes = body_len, "dispatching to router");

        let response = tokio::select! {
            biased;
            () = abort.aborted() => return Err(TransportError::Cancelled),
            result = self.router.clone().oneshot(http_request) => match result {
                Ok(response) => response,
                Err(never) => match never {},
            },
        };

        let status = response.status();
        let headers = response.headers().clone();
        let body = tokio::select! {
            biased;
            () = abort.aborted() => return Err(TransportError::Cancelled),
            collected = response.into_body().collect() => collected
                .map_err(|e| TransportError::Other(FailureDetail::network(e.to_string())))?
                .to_bytes(),
        };

        if status.is_success() {
            Ok(TransportResponse {
                status,
                headers,
                body,
            })
        } else {
            Err(TransportError::from_response(status, &body))
        }
    }
}

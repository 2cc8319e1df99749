//! A scripted [`Transport`] for tests.
//!
//! [`StubTransport`] answers requests from a queue of [`StubReply`]s, falling
//! back to a default reply once the queue is empty. Every request is
//! recorded for later inspection.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use formwire_test::stub::{StubReply, StubTransport};
//!
//! let transport = StubTransport::new();
//! transport.push(StubReply::validation(&[("email", "The email has already been taken.")]));
//! transport.push(StubReply::ok(r#"{"saved":true}"#).after(Duration::from_millis(50)));
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, StatusCode};

use formwire_core::FieldErrors;
use formwire_http::{
    FailureDetail, Method, QueryParams, RequestBody, Transport, TransportError, TransportRequest,
    TransportResponse, UploadProgress,
};

/// One scripted answer.
#[derive(Debug, Clone)]
pub struct StubReply {
    result: Result<TransportResponse, TransportError>,
    delay: Duration,
    progress: Vec<UploadProgress>,
    hang: bool,
}

impl StubReply {
    /// A `200 OK` with the given body.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::from_result(Ok(TransportResponse::new(StatusCode::OK, body)))
    }

    /// A response with an arbitrary status, classified the way real
    /// transports classify it.
    pub fn status(status: StatusCode, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        if status.is_success() {
            Self::from_result(Ok(TransportResponse::new(status, body)))
        } else {
            Self::from_result(Err(TransportError::from_response(status, &body)))
        }
    }

    /// A response with a JSON body.
    pub fn json(status: StatusCode, body: &serde_json::Value) -> Self {
        Self::status(status, body.to_string())
    }

    /// A 422 carrying the given field errors.
    pub fn validation(errors: &[(&str, &str)]) -> Self {
        let errors: FieldErrors = errors
            .iter()
            .map(|(field, message)| ((*field).to_string(), (*message).to_string()))
            .collect();
        Self::from_result(Err(TransportError::Validation { errors }))
    }

    /// A non-validation failure.
    pub fn failure(detail: FailureDetail) -> Self {
        Self::from_result(Err(TransportError::Other(detail)))
    }

    /// A failure that never reached a server.
    pub fn network_error(message: impl Into<String>) -> Self {
        Self::failure(FailureDetail::network(message))
    }

    /// A request that never settles on its own.
    pub fn hang() -> Self {
        Self {
            hang: true,
            ..Self::ok(Bytes::new())
        }
    }

    fn from_result(result: Result<TransportResponse, TransportError>) -> Self {
        Self {
            result,
            delay: Duration::ZERO,
            progress: Vec::new(),
            hang: false,
        }
    }

    /// Waits `delay` before answering.
    #[must_use]
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Reports `progress` before waiting.
    #[must_use]
    pub fn with_progress(mut self, progress: UploadProgress) -> Self {
        self.progress.push(progress);
        self
    }
}

/// A request as the transport saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub query: QueryParams,
    pub body: RequestBody,
}

impl RecordedRequest {
    /// Reads a header as text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Debug)]
struct StubInner {
    queue: VecDeque<StubReply>,
    fallback: StubReply,
    requests: Vec<RecordedRequest>,
}

/// A scripted, recording transport.
///
/// Clones share the same script and log.
#[derive(Debug, Clone)]
pub struct StubTransport {
    inner: Arc<Mutex<StubInner>>,
    honor_abort: bool,
}

impl Default for StubTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl StubTransport {
    /// Creates a transport that answers `200 OK` with `{}` unless scripted otherwise.
    pub fn new() -> Self {
        Self::with_default(StubReply::ok("{}"))
    }

    /// Creates a transport whose unscripted requests get `fallback`.
    pub fn with_default(fallback: StubReply) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StubInner {
                queue: VecDeque::new(),
                fallback,
                requests: Vec::new(),
            })),
            honor_abort: true,
        }
    }

    /// Stops the transport from watching the abort signal, simulating a
    /// transport that does not cooperate with cancellation.
    #[must_use]
    pub fn ignoring_abort(mut self) -> Self {
        self.honor_abort = false;
        self
    }

    /// Queues a reply for the next unanswered request.
    pub fn push(&self, reply: StubReply) -> &Self {
        self.inner
            .lock()
            .expect("StubTransport lock poisoned")
            .queue
            .push_back(reply);
        self
    }

    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner
            .lock()
            .expect("StubTransport lock poisoned")
            .requests
            .clone()
    }

    /// Returns the number of requests received.
    pub fn request_count(&self) -> usize {
        self.inner
            .lock()
            .expect("StubTransport lock poisoned")
            .requests
            .len()
    }

    /// Returns the most recent request, if any.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.inner
            .lock()
            .expect("StubTransport lock poisoned")
            .requests
            .last()
            .cloned()
    }

    /// Wraps the transport for use with a controller.
    pub fn shared(&self) -> Arc<dyn Transport> {
        Arc::new(self.clone())
    }

    fn next_reply(&self, request: &TransportRequest) -> StubReply {
        let mut inner = self.inner.lock().expect("StubTransport lock poisoned");
        inner.requests.push(RecordedRequest {
            method: request.method,
            url: request.url.clone(),
            headers: request.headers.clone(),
            query: request.query.clone(),
            body: request.body.clone(),
        });
        match inner.queue.pop_front() {
            Some(reply) => reply,
            None => inner.fallback.clone(),
        }
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let reply = self.next_reply(&request);
        for progress in &reply.progress {
            request.report_progress(*progress);
        }

        let hang = reply.hang;
        let delay = reply.delay;
        let wait = async move {
            if hang {
                std::future::pending::<()>().await;
            } else if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        };

        if self.honor_abort {
            tokio::select! {
                biased;
                () = request.abort.aborted() => return Err(TransportError::Cancelled),
                () = wait => {}
            }
        } else {
            wait.await;
        }
        reply.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwire_http::AbortController;

    fn request(abort: &AbortController) -> TransportRequest {
        TransportRequest {
            method: Method::Post,
            url: "/x".into(),
            headers: HeaderMap::new(),
            query: QueryParams::new(),
            body: RequestBody::Empty,
            abort: abort.signal(),
            progress: Arc::new(|_| {}),
        }
    }

    #[tokio::test]
    async fn test_replies_in_order_then_fallback() {
        let transport = StubTransport::new();
        transport
            .push(StubReply::validation(&[("name", "required")]))
            .push(StubReply::network_error("offline"));
        let abort = AbortController::new();

        assert!(matches!(
            transport.send(request(&abort)).await,
            Err(TransportError::Validation { .. })
        ));
        assert!(matches!(
            transport.send(request(&abort)).await,
            Err(TransportError::Other(_))
        ));
        let response = transport.send(request(&abort)).await.unwrap();
        assert_eq!(response.text(), "{}");
        assert_eq!(transport.request_count(), 3);
    }

    #[tokio::test]
    async fn test_status_classifies_like_a_server() {
        let transport = StubTransport::with_default(StubReply::json(
            StatusCode::UNPROCESSABLE_ENTITY,
            &serde_json::json!({"errors": {"email": ["taken"]}}),
        ));
        let err = transport
            .send(request(&AbortController::new()))
            .await
            .unwrap_err();
        let TransportError::Validation { errors } = err else {
            panic!("expected validation");
        };
        assert_eq!(errors["email"], "taken");
    }

    #[tokio::test(start_paused = true)]
    async fn test_hang_honors_abort() {
        let transport = StubTransport::with_default(StubReply::hang());
        let abort = AbortController::new();
        let req = request(&abort);
        let task = tokio::spawn({
            let transport = transport.clone();
            async move { transport.send(req).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        abort.abort();
        assert_eq!(task.await.unwrap().unwrap_err(), TransportError::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_is_respected() {
        let transport = StubTransport::with_default(StubReply::ok("late").after(Duration::from_secs(5)));
        let started = tokio::time::Instant::now();
        transport.send(request(&AbortController::new())).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_records_requests() {
        let transport = StubTransport::new();
        let abort = AbortController::new();
        let mut req = request(&abort);
        req.headers.insert("x-token", "abc".parse().unwrap());
        transport.send(req).await.unwrap();

        let recorded = transport.last_request().unwrap();
        assert_eq!(recorded.method, Method::Post);
        assert_eq!(recorded.url, "/x");
        assert_eq!(recorded.header("x-token"), Some("abc"));
    }
}

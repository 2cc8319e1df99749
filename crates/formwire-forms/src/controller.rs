//! The form controller.
//!
//! A [`FormController`] owns one form's data, defaults, errors and request
//! lifecycle. It is a cheap `Clone` handle: clones share the same form, and
//! the form is torn down when the last handle is dropped or when
//! [`FormController::dispose`] is called.
//!
//! Submissions run as spawned tokio tasks. The controller's lock is never
//! held while a callback runs, so callbacks may read and mutate the form.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use http::header::{HeaderName, HeaderValue};
use http::HeaderMap;
use indexmap::IndexMap;
use tracing::Instrument;

use formwire_core::logging::submission_span;
use formwire_core::{FieldErrors, FormSettings, SETTINGS};
use formwire_http::payload::{build_payload, flatten_to_params};
use formwire_http::transport::ProgressSink;
use formwire_http::{
    AbortController, AbortSignal, FormData, FormValue, Method, QueryParams, RequestBody,
    Transport, TransportError, TransportRequest, TransportResponse, UploadProgress,
};

use crate::error::{FormError, FormResult};
use crate::options::SubmitOptions;
use crate::state::{FormErrors, FormState};
use crate::submission::{Outcome, Submission};
use crate::timer::SuccessTimer;

/// Rewrites form data right before it is serialized.
pub type Transform = Arc<dyn Fn(FormData) -> FormData + Send + Sync>;

struct ActiveRequest {
    id: u64,
    abort: AbortController,
}

struct Inner {
    state: FormState,
    transform: Option<Transform>,
    active: Option<ActiveRequest>,
    /// Id of the most recent submission.
    latest: u64,
    /// Bumped on every write to `state.data`.
    data_version: u64,
    timer: SuccessTimer,
    disposed: bool,
}

impl Inner {
    fn new(data: FormData) -> Self {
        Self {
            state: FormState::new(data),
            transform: None,
            active: None,
            latest: 0,
            data_version: 0,
            timer: SuccessTimer::default(),
            disposed: false,
        }
    }

    /// Whether a settle of submission `id` may write state.
    const fn accepts(&self, id: u64, cancel_on_resubmit: bool) -> bool {
        !self.disposed && (self.latest == id || !cancel_on_resubmit)
    }

    fn data_mut(&mut self) -> &mut FormData {
        self.data_version += 1;
        &mut self.state.data
    }

    fn release(&mut self, id: u64) {
        if self.active.as_ref().is_some_and(|active| active.id == id) {
            self.active = None;
        }
    }

    fn teardown(&mut self) {
        if let Some(active) = &self.active {
            active.abort.abort();
        }
        self.timer.cancel();
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn lock_recovering(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Controls one form.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use axum::Router;
/// use formwire_forms::{FormController, SubmitOptions};
/// use formwire_http::transport::RouterTransport;
/// use formwire_http::value::form_data_from_json;
///
/// # async fn demo(app: Router) -> Result<(), Box<dyn std::error::Error>> {
/// let form = FormController::new(
///     form_data_from_json(serde_json::json!({"email": "", "remember": false})),
///     Arc::new(RouterTransport::new(app)),
/// );
/// form.set_field("email", "ada@example.com")?;
/// let outcome = form.post("/login", SubmitOptions::new())?.settled().await;
/// assert!(outcome.is_success() || form.has_errors());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct FormController {
    inner: Arc<Mutex<Inner>>,
    transport: Arc<dyn Transport>,
    settings: Arc<FormSettings>,
}

impl FormController {
    /// Creates a controller using the globally configured form settings.
    ///
    /// `initial` becomes both the data and the defaults.
    pub fn new(initial: FormData, transport: Arc<dyn Transport>) -> Self {
        Self::with_settings(initial, transport, SETTINGS.get_or_default().forms)
    }

    /// Creates a controller with explicit form settings.
    pub fn with_settings(
        initial: FormData,
        transport: Arc<dyn Transport>,
        settings: FormSettings,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::new(initial))),
            transport,
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &FormSettings {
        &self.settings
    }

    fn lock_live(&self, operation: &'static str) -> FormResult<MutexGuard<'_, Inner>> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| FormError::StatePoisoned(operation))?;
        if guard.disposed {
            return Err(FormError::Disposed { operation });
        }
        Ok(guard)
    }

    fn read(&self) -> MutexGuard<'_, Inner> {
        lock_recovering(&self.inner)
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// A snapshot of the whole form.
    pub fn state(&self) -> FormState {
        self.read().state.clone()
    }

    pub fn data(&self) -> FormData {
        self.read().state.data.clone()
    }

    pub fn defaults(&self) -> FormData {
        self.read().state.defaults.clone()
    }

    /// Reads one field.
    pub fn field(&self, name: &str) -> Option<FormValue> {
        self.read().state.data.get(name).cloned()
    }

    pub fn errors(&self) -> FormErrors {
        self.read().state.errors.clone()
    }

    /// The error message for one field, if any.
    pub fn error(&self, field: &str) -> Option<String> {
        self.read().state.errors.get(field).map(str::to_string)
    }

    pub fn has_errors(&self) -> bool {
        self.read().state.has_errors
    }

    pub fn processing(&self) -> bool {
        self.read().state.processing
    }

    pub fn progress(&self) -> Option<UploadProgress> {
        self.read().state.progress
    }

    pub fn was_successful(&self) -> bool {
        self.read().state.was_successful
    }

    pub fn recently_successful(&self) -> bool {
        self.read().state.recently_successful
    }

    pub fn is_disposed(&self) -> bool {
        self.read().disposed
    }

    // ── Data and defaults ───────────────────────────────────────────

    /// Replaces one field, leaving the others untouched.
    pub fn set_field(&self, name: impl Into<String>, value: impl Into<FormValue>) -> FormResult<()> {
        self.lock_live("set_field")?
            .data_mut()
            .insert(name.into(), value.into());
        Ok(())
    }

    /// Replaces all data.
    pub fn set_data(&self, data: FormData) -> FormResult<()> {
        *self.lock_live("set_data")?.data_mut() = data;
        Ok(())
    }

    /// Replaces all data with `update(current)`.
    ///
    /// The updater runs without the lock held. If the data is written
    /// through another handle meanwhile, the updater runs again on the
    /// fresh data, so it must not write form data itself.
    pub fn update_data(&self, mut update: impl FnMut(FormData) -> FormData) -> FormResult<()> {
        loop {
            let (current, version) = {
                let inner = self.lock_live("update_data")?;
                (inner.state.data.clone(), inner.data_version)
            };
            let next = update(current);
            let mut inner = self.lock_live("update_data")?;
            if inner.data_version == version {
                *inner.data_mut() = next;
                return Ok(());
            }
            tracing::trace!("form data changed during update; retrying");
        }
    }

    /// Makes the current data the new defaults.
    pub fn set_defaults(&self) -> FormResult<()> {
        let mut inner = self.lock_live("set_defaults")?;
        inner.state.defaults = inner.state.data.clone();
        Ok(())
    }

    /// Sets one default value.
    pub fn set_default(&self, name: impl Into<String>, value: impl Into<FormValue>) -> FormResult<()> {
        self.lock_live("set_default")?
            .state
            .defaults
            .insert(name.into(), value.into());
        Ok(())
    }

    /// Merges `values` into the defaults.
    pub fn merge_defaults(&self, values: FormData) -> FormResult<()> {
        self.lock_live("merge_defaults")?.state.defaults.extend(values);
        Ok(())
    }

    /// Restores every field from the defaults.
    pub fn reset(&self) -> FormResult<()> {
        let mut inner = self.lock_live("reset")?;
        let defaults = inner.state.defaults.clone();
        *inner.data_mut() = defaults;
        Ok(())
    }

    /// Restores the listed fields. Fields without a default are left as they are.
    pub fn reset_fields(&self, fields: &[&str]) -> FormResult<()> {
        let mut inner = self.lock_live("reset_fields")?;
        let restored: Vec<(String, FormValue)> = fields
            .iter()
            .filter_map(|name| {
                inner
                    .state
                    .defaults
                    .get(*name)
                    .map(|value| ((*name).to_string(), value.clone()))
            })
            .collect();
        inner.data_mut().extend(restored);
        Ok(())
    }

    // ── Errors ──────────────────────────────────────────────────────

    /// Attaches an error to one field.
    pub fn set_error(&self, field: impl Into<String>, message: impl Into<String>) -> FormResult<()> {
        let mut errors = FieldErrors::new();
        errors.insert(field.into(), message.into());
        self.merge_errors("set_error", errors)
    }

    /// Attaches several field errors.
    pub fn set_errors(&self, errors: FieldErrors) -> FormResult<()> {
        self.merge_errors("set_errors", errors)
    }

    fn merge_errors(&self, operation: &'static str, errors: FieldErrors) -> FormResult<()> {
        let mut inner = self.lock_live(operation)?;
        inner.state.errors.merge(errors);
        inner.state.sync_has_errors();
        Ok(())
    }

    /// Removes all errors.
    pub fn clear_errors(&self) -> FormResult<()> {
        self.lock_live("clear_errors")?
            .state
            .set_errors(FormErrors::default());
        Ok(())
    }

    /// Removes the errors of the listed fields.
    ///
    /// An opaque failure is not field-scoped and stays in place.
    pub fn clear_errors_for(&self, fields: &[&str]) -> FormResult<()> {
        let mut inner = self.lock_live("clear_errors_for")?;
        inner.state.errors.remove_fields(fields);
        inner.state.sync_has_errors();
        Ok(())
    }

    /// Registers a function applied to a copy of the data before every
    /// future submission is serialized. Replaces any earlier transform.
    pub fn transform(
        &self,
        transform: impl Fn(FormData) -> FormData + Send + Sync + 'static,
    ) -> FormResult<()> {
        self.lock_live("transform")?.transform = Some(Arc::new(transform));
        Ok(())
    }

    // ── Submission ──────────────────────────────────────────────────

    /// Submits the form.
    ///
    /// GET requests carry the data as query parameters; the other verbs
    /// carry it as an urlencoded or multipart body. The request runs on
    /// the current tokio runtime; the returned [`Submission`] resolves to
    /// its [`Outcome`]. Transport failures become form state, never `Err`.
    pub fn submit(&self, method: Method, url: &str, options: SubmitOptions) -> FormResult<Submission> {
        if url.trim().is_empty() {
            return Err(FormError::EmptyUrl);
        }
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| FormError::NoRuntime("submit"))?;
        let headers = self.request_headers(&options.headers)?;

        let (data, transform) = {
            let inner = self.lock_live("submit")?;
            (inner.state.data.clone(), inner.transform.clone())
        };
        let data = match transform {
            Some(transform) => transform(data),
            None => data,
        };
        let (query, body) = if method.sends_query() {
            (flatten_to_params(&data), RequestBody::Empty)
        } else {
            (QueryParams::new(), RequestBody::from(build_payload(&data)))
        };

        let (id, signal) = self.begin(method)?;
        let span = submission_span(id, method.as_str(), url);
        span.in_scope(|| tracing::debug!("submission started"));

        options.start();

        let request = TransportRequest {
            method,
            url: url.to_string(),
            headers,
            query,
            body,
            abort: signal.clone(),
            progress: self.progress_sink(id, &options),
        };
        let settle = Settle {
            id,
            inner: Arc::downgrade(&self.inner),
            settings: Arc::clone(&self.settings),
            options,
        };
        let handle = runtime.spawn(
            settle
                .run(Arc::clone(&self.transport), request, signal)
                .instrument(span),
        );
        Ok(Submission::new(id, handle))
    }

    /// Submits the form with a method given by name, e.g. `"patch"`.
    pub fn submit_named(&self, method: &str, url: &str, options: SubmitOptions) -> FormResult<Submission> {
        let method: Method = method.parse()?;
        self.submit(method, url, options)
    }

    pub fn get(&self, url: &str, options: SubmitOptions) -> FormResult<Submission> {
        self.submit(Method::Get, url, options)
    }

    pub fn post(&self, url: &str, options: SubmitOptions) -> FormResult<Submission> {
        self.submit(Method::Post, url, options)
    }

    pub fn put(&self, url: &str, options: SubmitOptions) -> FormResult<Submission> {
        self.submit(Method::Put, url, options)
    }

    pub fn patch(&self, url: &str, options: SubmitOptions) -> FormResult<Submission> {
        self.submit(Method::Patch, url, options)
    }

    pub fn delete(&self, url: &str, options: SubmitOptions) -> FormResult<Submission> {
        self.submit(Method::Delete, url, options)
    }

    /// Records a new in-flight submission and returns its id and abort signal.
    fn begin(&self, method: Method) -> FormResult<(u64, AbortSignal)> {
        let mut inner = self.lock_live("submit")?;
        let id = inner.latest + 1;
        let abort = AbortController::new();
        let signal = abort.signal();

        if let Some(previous) = inner.active.replace(ActiveRequest { id, abort }) {
            if self.settings.cancel_on_resubmit {
                tracing::debug!(superseded = previous.id, by = id, %method, "cancelling superseded submission");
                previous.abort.abort();
            }
        }
        inner.latest = id;
        inner.timer.cancel();

        let state = &mut inner.state;
        state.was_successful = false;
        state.recently_successful = false;
        state.processing = true;
        state.progress = None;
        Ok((id, signal))
    }

    fn request_headers(&self, extra: &IndexMap<String, String>) -> FormResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (name, value) in self.settings.default_headers.iter().chain(extra) {
            let invalid = |reason: String| FormError::InvalidHeader {
                name: name.clone(),
                reason,
            };
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
            let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
            headers.insert(header_name, header_value);
        }
        Ok(headers)
    }

    fn progress_sink(&self, id: u64, options: &SubmitOptions) -> ProgressSink {
        let inner = Arc::downgrade(&self.inner);
        let cancel_on_resubmit = self.settings.cancel_on_resubmit;
        let options = options.clone();
        Arc::new(move |progress: UploadProgress| {
            if let Some(inner) = inner.upgrade() {
                let mut guard = lock_recovering(&inner);
                if guard.accepts(id, cancel_on_resubmit) {
                    guard.state.progress = Some(progress);
                }
            }
            options.progress(&progress);
        })
    }

    /// Aborts the in-flight submission, if any. It settles as cancelled.
    ///
    /// Returns `true` when there was a submission to abort.
    pub fn cancel(&self) -> bool {
        let inner = self.read();
        match &inner.active {
            Some(active) => {
                tracing::debug!(id = active.id, "cancel requested");
                active.abort.abort();
                true
            }
            None => false,
        }
    }

    /// Tears the form down: aborts the in-flight submission and the success
    /// timer. Later mutators fail with [`FormError::Disposed`]; settling
    /// submissions still run their callbacks but no longer write state.
    pub fn dispose(&self) {
        let mut inner = self.read();
        if inner.disposed {
            return;
        }
        inner.disposed = true;
        inner.teardown();
        tracing::debug!("form disposed");
    }
}

impl fmt::Debug for FormController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormController")
            .field("state", &self.state())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// The settling half of one submission, run on the spawned task.
struct Settle {
    id: u64,
    inner: Weak<Mutex<Inner>>,
    settings: Arc<FormSettings>,
    options: SubmitOptions,
}

impl Settle {
    async fn run(
        self,
        transport: Arc<dyn Transport>,
        request: TransportRequest,
        signal: AbortSignal,
    ) -> Outcome {
        let result = tokio::select! {
            biased;
            () = signal.aborted() => Err(TransportError::Cancelled),
            result = transport.send(request) => result,
        };

        match &result {
            Ok(response) => tracing::debug!(status = response.status.as_u16(), "submission succeeded"),
            Err(TransportError::Cancelled) => tracing::debug!("submission cancelled"),
            Err(err) => tracing::warn!(error = %err, "submission failed"),
        }

        self.record(&result);
        match &result {
            Ok(response) => self.options.success(response),
            Err(TransportError::Cancelled) => self.options.cancel(),
            Err(err) => self.options.error(err),
        }
        self.finish();
        Outcome::from(result)
    }

    fn record(&self, result: &Result<TransportResponse, TransportError>) {
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        let mut guard = lock_recovering(&inner);
        if !guard.accepts(self.id, self.settings.cancel_on_resubmit) {
            tracing::debug!("form superseded or disposed; state left untouched");
            return;
        }

        let Inner { state, timer, .. } = &mut *guard;
        state.processing = false;
        state.progress = None;
        match result {
            Ok(_) => {
                state.set_errors(FormErrors::default());
                state.was_successful = true;
                state.recently_successful = true;
                let weak = Weak::clone(&self.inner);
                timer.arm(self.settings.success_window(), move |generation| {
                    expire_success(&weak, generation);
                });
            }
            Err(TransportError::Cancelled) => {}
            Err(TransportError::Validation { errors }) => {
                state.set_errors(FormErrors::Fields(errors.clone()));
            }
            Err(TransportError::Other(detail)) => {
                state.set_errors(FormErrors::Opaque(detail.clone()));
            }
        }
    }

    fn finish(&self) {
        if let Some(inner) = self.inner.upgrade() {
            let mut guard = lock_recovering(&inner);
            if guard.accepts(self.id, self.settings.cancel_on_resubmit) {
                guard.state.processing = false;
                guard.state.progress = None;
            }
            guard.release(self.id);
        }
        self.options.finish();
    }
}

fn expire_success(inner: &Weak<Mutex<Inner>>, generation: u64) {
    if let Some(inner) = inner.upgrade() {
        let mut guard = lock_recovering(&inner);
        if !guard.disposed && guard.timer.finish(generation) {
            guard.state.recently_successful = false;
            tracing::debug!("success window elapsed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use formwire_http::value::form_data_from_json;
    use serde_json::json;

    struct PendingTransport;

    #[async_trait]
    impl Transport for PendingTransport {
        async fn send(&self, _request: TransportRequest) -> Result<TransportResponse, TransportError> {
            std::future::pending().await
        }
    }

    fn form(data: serde_json::Value) -> FormController {
        FormController::with_settings(
            form_data_from_json(data),
            Arc::new(PendingTransport),
            FormSettings::default(),
        )
    }

    #[test]
    fn test_set_field_changes_only_that_field() {
        let form = form(json!({"name": "Ada", "email": "ada@example.com"}));
        form.set_field("name", "Grace").unwrap();
        assert_eq!(form.field("name"), Some(FormValue::from("Grace")));
        assert_eq!(form.field("email"), Some(FormValue::from("ada@example.com")));
        assert_eq!(form.data().len(), 2);
    }

    #[test]
    fn test_update_data_receives_current() {
        let form = form(json!({"count": 1}));
        form.update_data(|mut data| {
            data.insert("count".into(), FormValue::from(2));
            data
        })
        .unwrap();
        assert_eq!(form.field("count"), Some(FormValue::from(2)));
    }

    #[test]
    fn test_update_data_retries_after_concurrent_write() {
        let form = form(json!({"a": 1}));
        let other = form.clone();
        let mut calls = 0;
        form.update_data(|mut data| {
            calls += 1;
            if calls == 1 {
                other.set_field("b", 2).unwrap();
            }
            data.insert("c".into(), FormValue::from(3));
            data
        })
        .unwrap();

        assert_eq!(calls, 2);
        assert_eq!(form.field("b"), Some(FormValue::from(2)));
        assert_eq!(form.field("c"), Some(FormValue::from(3)));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let form = form(json!({"name": "Ada", "tags": ["a"]}));
        form.set_data(form_data_from_json(json!({"name": "Grace", "extra": true})))
            .unwrap();
        form.reset().unwrap();
        assert_eq!(form.data(), form.defaults());
        assert!(form.field("extra").is_none());
    }

    #[test]
    fn test_reset_fields_only_listed_fields_with_defaults() {
        let form = form(json!({"a": 1, "b": 2}));
        form.set_data(form_data_from_json(json!({"a": 10, "b": 20, "c": 30})))
            .unwrap();
        form.reset_fields(&["a", "c"]).unwrap();
        assert_eq!(form.field("a"), Some(FormValue::from(1)));
        assert_eq!(form.field("b"), Some(FormValue::from(20)));
        assert_eq!(form.field("c"), Some(FormValue::from(30)));
    }

    #[test]
    fn test_defaults_mutators() {
        let form = form(json!({"a": 1}));
        form.set_field("a", 5).unwrap();
        form.set_defaults().unwrap();
        assert_eq!(form.defaults().get("a"), Some(&FormValue::from(5)));

        form.set_default("b", "x").unwrap();
        form.merge_defaults(form_data_from_json(json!({"c": true}))).unwrap();
        let defaults = form.defaults();
        assert_eq!(defaults.len(), 3);
        assert_eq!(defaults.get("c"), Some(&FormValue::Bool(true)));
        // data is untouched until reset
        assert!(form.field("b").is_none());
    }

    #[test]
    fn test_errors_and_has_errors_stay_consistent() {
        let form = form(json!({}));
        form.set_error("name", "required").unwrap();
        assert!(form.has_errors());
        assert_eq!(form.error("name").as_deref(), Some("required"));

        let mut more = FieldErrors::new();
        more.insert("email".into(), "taken".into());
        form.set_errors(more).unwrap();
        assert_eq!(form.errors().len(), 2);

        form.clear_errors_for(&["name"]).unwrap();
        assert!(form.error("name").is_none());
        assert!(form.has_errors());

        form.clear_errors_for(&["email"]).unwrap();
        assert!(!form.has_errors());

        form.set_error("name", "required").unwrap();
        form.clear_errors().unwrap();
        assert!(!form.has_errors());
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_submit_requires_runtime() {
        let form = form(json!({}));
        let err = form.post("/x", SubmitOptions::new()).unwrap_err();
        assert_eq!(err, FormError::NoRuntime("submit"));
        assert!(!form.processing());
    }

    #[tokio::test]
    async fn test_submit_rejects_empty_url() {
        let form = form(json!({}));
        assert_eq!(form.post("  ", SubmitOptions::new()).unwrap_err(), FormError::EmptyUrl);
        assert!(!form.processing());
    }

    #[tokio::test]
    async fn test_submit_named_rejects_unknown_method() {
        let form = form(json!({}));
        let err = form.submit_named("trace", "/x", SubmitOptions::new()).unwrap_err();
        assert!(matches!(err, FormError::UnsupportedMethod(_)));
    }

    #[tokio::test]
    async fn test_invalid_header_fails_fast() {
        let form = form(json!({}));
        let options = SubmitOptions::new().header("bad header", "x");
        let err = form.post("/x", options).unwrap_err();
        assert!(matches!(err, FormError::InvalidHeader { ref name, .. } if name == "bad header"));
        assert!(!form.processing());
    }

    #[tokio::test]
    async fn test_submit_marks_processing_and_cancel_settles() {
        let form = form(json!({"name": "Ada"}));
        let submission = form.post("/x", SubmitOptions::new()).unwrap();
        assert!(form.processing());

        assert!(form.cancel());
        assert!(submission.settled().await.is_cancelled());
        assert!(!form.processing());
        assert!(!form.cancel());
    }

    #[tokio::test]
    async fn test_mutators_fail_after_dispose() {
        let form = form(json!({"name": "Ada"}));
        form.dispose();
        form.dispose();
        assert!(form.is_disposed());
        assert_eq!(
            form.set_field("name", "x").unwrap_err(),
            FormError::Disposed {
                operation: "set_field"
            }
        );
        assert!(matches!(
            form.post("/x", SubmitOptions::new()),
            Err(FormError::Disposed { operation: "submit" })
        ));
        // reads still work
        assert_eq!(form.field("name"), Some(FormValue::from("Ada")));
    }

    #[test]
    fn test_debug_shows_state() {
        let form = form(json!({"name": "Ada"}));
        let debug = format!("{form:?}");
        assert!(debug.contains("FormController"));
        assert!(debug.contains("processing: false"));
    }
}

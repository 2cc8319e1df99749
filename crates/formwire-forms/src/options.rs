//! Per-submission options: extra headers and lifecycle callbacks.
//!
//! Every callback is optional; an unset callback is a no-op. Callbacks run
//! outside the controller's lock, so they may freely read or mutate the
//! form they belong to.
//!
//! ```
//! use formwire_forms::SubmitOptions;
//!
//! let options = SubmitOptions::new()
//!     .header("x-requested-with", "formwire")
//!     .on_success(|response| println!("saved: {}", response.status))
//!     .on_finish(|| println!("done"));
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use formwire_http::{TransportError, TransportResponse, UploadProgress};

/// A callback with no arguments.
pub type Hook = Arc<dyn Fn() + Send + Sync>;
/// Receives upload progress.
pub type ProgressHook = Arc<dyn Fn(&UploadProgress) + Send + Sync>;
/// Receives the successful response.
pub type SuccessHook = Arc<dyn Fn(&TransportResponse) + Send + Sync>;
/// Receives a validation or other failure.
pub type ErrorHook = Arc<dyn Fn(&TransportError) + Send + Sync>;

/// Options for one submission.
#[derive(Clone, Default)]
pub struct SubmitOptions {
    /// Headers merged over the configured defaults.
    pub headers: IndexMap<String, String>,
    on_start: Option<Hook>,
    on_progress: Option<ProgressHook>,
    on_success: Option<SuccessHook>,
    on_error: Option<ErrorHook>,
    on_cancel: Option<Hook>,
    on_finish: Option<Hook>,
}

impl SubmitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a request header, replacing an earlier one with the same name.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Runs synchronously inside `submit`, before the request is sent.
    #[must_use]
    pub fn on_start(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_start = Some(Arc::new(f));
        self
    }

    /// Runs for every upload progress report.
    #[must_use]
    pub fn on_progress(mut self, f: impl Fn(&UploadProgress) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Arc::new(f));
        self
    }

    /// Runs when the request succeeds.
    #[must_use]
    pub fn on_success(mut self, f: impl Fn(&TransportResponse) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(f));
        self
    }

    /// Runs when the request fails for any reason other than cancellation.
    #[must_use]
    pub fn on_error(mut self, f: impl Fn(&TransportError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(f));
        self
    }

    /// Runs when the request is cancelled.
    #[must_use]
    pub fn on_cancel(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_cancel = Some(Arc::new(f));
        self
    }

    /// Runs last, once per submission, whatever the outcome.
    #[must_use]
    pub fn on_finish(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_finish = Some(Arc::new(f));
        self
    }

    pub(crate) fn start(&self) {
        if let Some(f) = &self.on_start {
            f();
        }
    }

    pub(crate) fn progress(&self, progress: &UploadProgress) {
        if let Some(f) = &self.on_progress {
            f(progress);
        }
    }

    pub(crate) fn success(&self, response: &TransportResponse) {
        if let Some(f) = &self.on_success {
            f(response);
        }
    }

    pub(crate) fn error(&self, error: &TransportError) {
        if let Some(f) = &self.on_error {
            f(error);
        }
    }

    pub(crate) fn cancel(&self) {
        if let Some(f) = &self.on_cancel {
            f();
        }
    }

    pub(crate) fn finish(&self) {
        if let Some(f) = &self.on_finish {
            f();
        }
    }
}

impl fmt::Debug for SubmitOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmitOptions")
            .field("headers", &self.headers)
            .field("on_start", &self.on_start.is_some())
            .field("on_progress", &self.on_progress.is_some())
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_cancel", &self.on_cancel.is_some())
            .field("on_finish", &self.on_finish.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_unset_callbacks_are_noops() {
        let options = SubmitOptions::new();
        options.start();
        options.progress(&UploadProgress::new(1, Some(2)));
        options.error(&TransportError::Cancelled);
        options.cancel();
        options.finish();
    }

    #[test]
    fn test_callbacks_fire() {
        let count = Arc::new(AtomicUsize::new(0));
        let (a, b) = (Arc::clone(&count), Arc::clone(&count));
        let options = SubmitOptions::new()
            .on_start(move || {
                a.fetch_add(1, Ordering::SeqCst);
            })
            .on_finish(move || {
                b.fetch_add(10, Ordering::SeqCst);
            });
        options.start();
        options.finish();
        assert_eq!(count.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn test_headers_replace_by_name() {
        let options = SubmitOptions::new()
            .header("x-token", "one")
            .header("x-token", "two");
        assert_eq!(options.headers.len(), 1);
        assert_eq!(options.headers["x-token"], "two");
    }

    #[test]
    fn test_debug_hides_closures() {
        let options = SubmitOptions::new().on_cancel(|| {});
        let debug = format!("{options:?}");
        assert!(debug.contains("on_cancel: true"));
        assert!(debug.contains("on_start: false"));
    }
}

//! Records the callbacks a submission fires.
//!
//! ```rust,no_run
//! use formwire_test::recorder::CallbackRecorder;
//!
//! let recorder = CallbackRecorder::new();
//! let options = recorder.options();
//! // ... submit with `options` and wait for it to settle ...
//! recorder.assert_sequence(&["start", "success", "finish"]);
//! ```

use std::sync::{Arc, Mutex};

use formwire_forms::SubmitOptions;
use formwire_http::TransportError;

/// One callback invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackEvent {
    Start,
    /// Upload progress, as a percentage.
    Progress(u8),
    /// The HTTP status of the successful response.
    Success(u16),
    Error(TransportError),
    Cancel,
    Finish,
}

impl CallbackEvent {
    /// Short lowercase name, e.g. `"start"` or `"error"`.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Progress(_) => "progress",
            Self::Success(_) => "success",
            Self::Error(_) => "error",
            Self::Cancel => "cancel",
            Self::Finish => "finish",
        }
    }
}

/// Collects callback invocations in the order they happen.
#[derive(Debug, Clone, Default)]
pub struct CallbackRecorder {
    events: Arc<Mutex<Vec<CallbackEvent>>>,
}

impl CallbackRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh options with every callback wired to this recorder.
    pub fn options(&self) -> SubmitOptions {
        self.attach(SubmitOptions::new())
    }

    /// Wires every callback of `options` to this recorder, replacing any
    /// callbacks already set. Headers are kept.
    pub fn attach(&self, options: SubmitOptions) -> SubmitOptions {
        let (start, progress, success, error, cancel, finish) = (
            self.clone(),
            self.clone(),
            self.clone(),
            self.clone(),
            self.clone(),
            self.clone(),
        );
        options
            .on_start(move || start.push(CallbackEvent::Start))
            .on_progress(move |p| progress.push(CallbackEvent::Progress(p.percentage)))
            .on_success(move |r| success.push(CallbackEvent::Success(r.status.as_u16())))
            .on_error(move |e| error.push(CallbackEvent::Error(e.clone())))
            .on_cancel(move || cancel.push(CallbackEvent::Cancel))
            .on_finish(move || finish.push(CallbackEvent::Finish))
    }

    fn push(&self, event: CallbackEvent) {
        self.events
            .lock()
            .expect("CallbackRecorder lock poisoned")
            .push(event);
    }

    /// Returns every recorded event.
    pub fn events(&self) -> Vec<CallbackEvent> {
        self.events
            .lock()
            .expect("CallbackRecorder lock poisoned")
            .clone()
    }

    /// Returns the names of the recorded events.
    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(CallbackEvent::name).collect()
    }

    /// Returns how many times the named callback fired.
    pub fn count(&self, name: &str) -> usize {
        self.events().iter().filter(|e| e.name() == name).count()
    }

    /// Returns the most recent error, if any.
    pub fn last_error(&self) -> Option<TransportError> {
        self.events().into_iter().rev().find_map(|e| match e {
            CallbackEvent::Error(err) => Some(err),
            _ => None,
        })
    }

    /// Forgets every recorded event.
    pub fn clear(&self) {
        self.events
            .lock()
            .expect("CallbackRecorder lock poisoned")
            .clear();
    }

    /// Asserts the exact sequence of callback names.
    ///
    /// # Panics
    ///
    /// Panics if the recorded sequence differs from `expected`.
    pub fn assert_sequence(&self, expected: &[&str]) {
        let actual = self.names();
        assert_eq!(
            actual, expected,
            "Expected callbacks {expected:?}, but got {actual:?}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwire_http::FailureDetail;

    #[test]
    fn test_event_names() {
        assert_eq!(CallbackEvent::Start.name(), "start");
        assert_eq!(CallbackEvent::Progress(50).name(), "progress");
        assert_eq!(CallbackEvent::Cancel.name(), "cancel");
    }

    #[test]
    fn test_clones_share_events() {
        let recorder = CallbackRecorder::new();
        let clone = recorder.clone();
        clone.push(CallbackEvent::Start);
        recorder.push(CallbackEvent::Finish);
        recorder.assert_sequence(&["start", "finish"]);
        recorder.clear();
        assert!(clone.events().is_empty());
    }

    #[test]
    fn test_last_error_and_count() {
        let recorder = CallbackRecorder::new();
        recorder.push(CallbackEvent::Error(TransportError::Cancelled));
        recorder.push(CallbackEvent::Progress(10));
        recorder.push(CallbackEvent::Progress(90));
        recorder.push(CallbackEvent::Error(TransportError::Other(
            FailureDetail::network("offline"),
        )));
        assert_eq!(recorder.count("progress"), 2);
        assert!(matches!(recorder.last_error(), Some(TransportError::Other(_))));
    }
}

//! Logging integration for formwire.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and for creating per-submission spans.

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The log level is read from `settings.log_level` (e.g. "debug", "info",
/// "warn", "error"). In debug mode a pretty, human-readable format is used;
/// otherwise a structured JSON format is used. Installing a second subscriber
/// is a no-op.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for one form submission.
///
/// Every log entry emitted while the submission is in flight carries the
/// submission id, HTTP method and target URL.
///
/// # Examples
///
/// ```
/// use formwire_core::logging::submission_span;
///
/// let span = submission_span(7, "POST", "/profile");
/// let _guard = span.enter();
/// tracing::debug!("submitting");
/// ```
pub fn submission_span(id: u64, method: &str, url: &str) -> tracing::Span {
    tracing::debug_span!("submission", id, method, url)
}

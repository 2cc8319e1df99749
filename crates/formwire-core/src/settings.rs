//! Settings system for formwire.
//!
//! This module provides the [`Settings`] struct, which holds all library
//! configuration, and [`LazySettings`], a globally-accessible,
//! lazily-initialized settings instance.

use std::collections::HashMap;
use std::sync::OnceLock;
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Default length of the "recently successful" window, in milliseconds.
pub const DEFAULT_SUCCESS_WINDOW_MS: u64 = 2000;

/// Behavior of every form controller created from these settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSettings {
    /// How long `recently_successful` stays set after a successful submission.
    pub success_window_ms: u64,
    /// Abort the in-flight request when a new submission starts.
    ///
    /// When `false`, the previous request keeps running and only its
    /// cancellation handle is replaced; both requests may settle and write
    /// state, the later one winning.
    pub cancel_on_resubmit: bool,
    /// Headers sent with every submission. Per-submission headers override these.
    pub default_headers: IndexMap<String, String>,
}

impl FormSettings {
    /// Returns the success window as a [`Duration`].
    pub const fn success_window(&self) -> Duration {
        Duration::from_millis(self.success_window_ms)
    }
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            success_window_ms: DEFAULT_SUCCESS_WINDOW_MS,
            cancel_on_resubmit: true,
            default_headers: IndexMap::new(),
        }
    }
}

/// The complete set of library settings.
///
/// # Examples
///
/// ```
/// use formwire_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.forms.success_window_ms, 2000);
/// assert!(settings.forms.cancel_on_resubmit);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled.
    pub debug: bool,
    /// Origin used to resolve relative submission URLs.
    pub base_url: String,

    // ── Forms ────────────────────────────────────────────────────────

    /// Form controller behavior.
    pub forms: FormSettings,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log level (e.g. "info", "debug", "warn").
    pub log_level: String,

    // ── Escape hatch ─────────────────────────────────────────────────

    /// Custom settings that don't fit into the above categories.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            base_url: "http://localhost".to_string(),
            forms: FormSettings::default(),
            log_level: "info".to_string(),
            extra: HashMap::new(),
        }
    }
}

/// A lazily-initialized, globally-accessible settings container.
///
/// Call [`configure`](LazySettings::configure) once at startup; controllers
/// created without explicit settings read [`get_or_default`](LazySettings::get_or_default).
pub struct LazySettings {
    inner: OnceLock<Settings>,
}

impl Default for LazySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl LazySettings {
    /// Creates a new, unconfigured `LazySettings`.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Configures the global settings.
    ///
    /// Returns the rejected settings if they were already configured.
    pub fn configure(&self, settings: Settings) -> Result<(), Settings> {
        self.inner.set(settings)
    }

    /// Returns the configured settings, if any.
    pub fn get(&self) -> Option<&Settings> {
        self.inner.get()
    }

    /// Returns the configured settings, or the defaults when unconfigured.
    pub fn get_or_default(&self) -> Settings {
        self.inner.get().cloned().unwrap_or_default()
    }

    /// Returns `true` if settings have been configured.
    pub fn is_configured(&self) -> bool {
        self.inner.get().is_some()
    }
}

/// The global settings instance.
pub static SETTINGS: LazySettings = LazySettings::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let s = Settings::default();
        assert!(s.debug);
        assert_eq!(s.base_url, "http://localhost");
        assert_eq!(s.log_level, "info");
        assert!(s.extra.is_empty());
    }

    #[test]
    fn test_default_form_settings() {
        let f = FormSettings::default();
        assert_eq!(f.success_window_ms, 2000);
        assert_eq!(f.success_window(), Duration::from_secs(2));
        assert!(f.cancel_on_resubmit);
        assert!(f.default_headers.is_empty());
    }

    #[test]
    fn test_lazy_settings_configure_once() {
        let lazy = LazySettings::new();
        assert!(!lazy.is_configured());
        assert_eq!(lazy.get_or_default().log_level, "info");

        let custom = Settings {
            log_level: "debug".to_string(),
            ..Settings::default()
        };
        assert!(lazy.configure(custom).is_ok());
        assert!(lazy.is_configured());
        assert_eq!(lazy.get().map(|s| s.log_level.as_str()), Some("debug"));

        let rejected = lazy.configure(Settings::default());
        assert!(rejected.is_err());
        assert_eq!(lazy.get_or_default().log_level, "debug");
    }

    #[test]
    fn test_settings_roundtrip_json() {
        let s = Settings::default();
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["forms"]["success_window_ms"], 2000);
        let back: Settings = serde_json::from_value(json).unwrap();
        assert_eq!(back.forms, s.forms);
    }
}

//! # formwire
//!
//! Form state and submission lifecycle for Rust.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//! You can depend on `formwire` to get everything, or depend on individual
//! crates for finer-grained control.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use formwire::prelude::*;
//!
//! # async fn demo(app: formwire::axum::Router) -> Result<(), FormError> {
//! let form = FormController::new(
//!     form_data_from_json(formwire::serde_json::json!({"title": "", "tags": []})),
//!     Arc::new(RouterTransport::new(app)),
//! );
//! form.set_field("title", "Hello")?;
//! let outcome = form.post("/posts", SubmitOptions::new())?.settled().await;
//! if let Outcome::Invalid(errors) = outcome {
//!     println!("{} field(s) need attention", errors.len());
//! }
//! # Ok(())
//! # }
//! ```

/// Core types, settings, logging, and error types.
pub use formwire_core as core;

/// Form values, payload building, and the transport contract.
#[cfg(feature = "http")]
pub use formwire_http as http;

/// The form controller and its state.
#[cfg(feature = "forms")]
pub use formwire_forms as forms;

/// Testing utilities: stub transport, callback recorder, and assertions.
#[cfg(feature = "testing")]
pub use formwire_test as test;

pub use async_trait;
pub use axum;
pub use chrono;
pub use serde_json;
pub use tokio;
pub use tracing;
pub use tracing_subscriber;

/// The types most applications need.
pub mod prelude {
    pub use formwire_core::logging::setup_logging;
    pub use formwire_core::{FormSettings, FormwireError, FormwireResult, Settings, SETTINGS};

    #[cfg(feature = "http")]
    pub use formwire_http::transport::RouterTransport;
    #[cfg(feature = "http")]
    pub use formwire_http::value::form_data_from_json;
    #[cfg(feature = "http")]
    pub use formwire_http::{
        build_payload, FileBlob, FormData, FormValue, Method, Payload, Transport, TransportError,
        TransportResponse,
    };

    #[cfg(feature = "forms")]
    pub use formwire_forms::{
        FormController, FormError, FormErrors, FormState, Outcome, SubmitOptions, Submission,
    };
}

//! # formwire-test
//!
//! Testing utilities for formwire. Provides a scripted transport that
//! records requests, a recorder for submission callbacks, and assertion
//! helpers for form state.
//!
//! ## Modules
//!
//! - [`stub`] - `StubTransport` and `StubReply`
//! - [`recorder`] - `CallbackRecorder`
//! - [`assertions`] - `assert_field_error`, `assert_idle`, and friends

pub mod assertions;
pub mod recorder;
pub mod stub;

pub use assertions::{
    assert_field_error, assert_idle, assert_no_errors, assert_processing,
    assert_recently_successful,
};
pub use recorder::{CallbackEvent, CallbackRecorder};
pub use stub::{RecordedRequest, StubReply, StubTransport};

//! # formwire-forms
//!
//! The form controller: one form's data, defaults and errors, plus the
//! lifecycle of the requests that submit it.
//!
//! ## Modules
//!
//! - [`controller`] - `FormController`, mutators and submission
//! - [`state`] - `FormState` snapshots and `FormErrors`
//! - [`options`] - Per-submission headers and callbacks
//! - [`submission`] - `Submission` handles and settled `Outcome`s
//! - [`error`] - `FormError` for calls the controller refuses
//!
//! ## Lifecycle
//!
//! ```text
//! submit ──▶ on_start ──▶ transport ──┬─▶ on_success ─┐
//!                                     ├─▶ on_error ───┼─▶ on_finish
//!                                     └─▶ on_cancel ──┘
//! ```
//!
//! A success sets `recently_successful` for the configured window
//! (2000 ms by default). Starting a new submission aborts the previous one
//! unless `cancel_on_resubmit` is turned off in [`FormSettings`](formwire_core::FormSettings).

pub mod controller;
pub mod error;
pub mod options;
pub mod state;
pub mod submission;
mod timer;

pub use controller::{FormController, Transform};
pub use error::{FormError, FormResult};
pub use options::SubmitOptions;
pub use state::{FormErrors, FormState};
pub use submission::{Outcome, Submission};

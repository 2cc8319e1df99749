//! Assertion helpers for [`FormController`] state.
//!
//! - [`assert_field_error`] - A field carries the expected message
//! - [`assert_no_errors`] - The form has no errors at all
//! - [`assert_idle`] - Nothing is in flight
//! - [`assert_processing`] - A submission is in flight
//! - [`assert_recently_successful`] - The success window is open

use formwire_forms::FormController;

/// Asserts that `field` carries exactly `expected`.
///
/// # Panics
///
/// Panics if the field has no error or a different one.
pub fn assert_field_error(form: &FormController, field: &str, expected: &str) {
    let errors = form.errors();
    let actual = errors.get(field);
    assert_eq!(
        actual,
        Some(expected),
        "Expected error '{expected}' for field '{field}', got {actual:?}. All errors: {errors:?}"
    );
    assert!(form.has_errors(), "has_errors is false while '{field}' has an error");
}

/// Asserts that the form has no errors.
///
/// # Panics
///
/// Panics if any error is attached.
pub fn assert_no_errors(form: &FormController) {
    let errors = form.errors();
    assert!(errors.is_empty(), "Expected no errors, got {errors:?}");
    assert!(!form.has_errors(), "has_errors is true with empty errors");
}

/// Asserts that no submission is in flight and no progress is shown.
///
/// # Panics
///
/// Panics if the form is processing or reports progress.
pub fn assert_idle(form: &FormController) {
    let state = form.state();
    assert!(!state.processing, "Expected an idle form, but it is processing");
    assert!(
        state.progress.is_none(),
        "Expected no progress on an idle form, got {:?}",
        state.progress
    );
}

/// Asserts that a submission is in flight.
///
/// # Panics
///
/// Panics if the form is not processing.
pub fn assert_processing(form: &FormController) {
    assert!(form.processing(), "Expected the form to be processing");
}

/// Asserts that the last submission succeeded and the success window is open.
///
/// # Panics
///
/// Panics unless both `was_successful` and `recently_successful` are set.
pub fn assert_recently_successful(form: &FormController) {
    let state = form.state();
    assert!(state.was_successful, "Expected was_successful to be set");
    assert!(
        state.recently_successful,
        "Expected recently_successful to be set"
    );
}

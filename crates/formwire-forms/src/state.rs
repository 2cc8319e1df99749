//! Observable form state.
//!
//! [`FormState`] is the snapshot returned by
//! [`FormController::state`](crate::FormController::state). Every field is a
//! plain value; holding a snapshot never blocks the controller.

use formwire_core::FieldErrors;
use formwire_http::{FailureDetail, FormData, FormValue, UploadProgress};

/// Errors currently attached to a form.
///
/// After a 422 the form holds one message per field. After any other
/// failure it holds the failure itself, opaque to field lookups.
#[derive(Debug, Clone, PartialEq)]
pub enum FormErrors {
    /// Field name to message.
    Fields(FieldErrors),
    /// A non-validation failure.
    Opaque(FailureDetail),
}

impl Default for FormErrors {
    fn default() -> Self {
        Self::Fields(FieldErrors::new())
    }
}

impl FormErrors {
    /// Returns `true` when there are no field errors and no opaque failure.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Fields(fields) => fields.is_empty(),
            Self::Opaque(_) => false,
        }
    }

    /// Number of field errors; an opaque failure counts as one.
    pub fn len(&self) -> usize {
        match self {
            Self::Fields(fields) => fields.len(),
            Self::Opaque(_) => 1,
        }
    }

    /// Looks up the message for `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        match self {
            Self::Fields(fields) => fields.get(field).map(String::as_str),
            Self::Opaque(_) => None,
        }
    }

    /// The field map, unless the errors are opaque.
    pub const fn fields(&self) -> Option<&FieldErrors> {
        match self {
            Self::Fields(fields) => Some(fields),
            Self::Opaque(_) => None,
        }
    }

    /// The opaque failure, if any.
    pub const fn opaque(&self) -> Option<&FailureDetail> {
        match self {
            Self::Fields(_) => None,
            Self::Opaque(detail) => Some(detail),
        }
    }

    /// Merges `errors` in. Opaque errors are replaced by the new fields.
    pub(crate) fn merge(&mut self, errors: FieldErrors) {
        match self {
            Self::Fields(fields) => fields.extend(errors),
            Self::Opaque(_) => *self = Self::Fields(errors),
        }
    }

    /// Drops the errors for the listed fields. Opaque errors are left alone.
    pub(crate) fn remove_fields(&mut self, names: &[&str]) {
        if let Self::Fields(fields) = self {
            fields.retain(|name, _| !names.contains(&name.as_str()));
        }
    }
}

impl From<FieldErrors> for FormErrors {
    fn from(fields: FieldErrors) -> Self {
        Self::Fields(fields)
    }
}

/// A snapshot of a form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    /// Current field values.
    pub data: FormData,
    /// Values restored by `reset`.
    pub defaults: FormData,
    pub errors: FormErrors,
    /// Always equal to `!errors.is_empty()`.
    pub has_errors: bool,
    /// `true` while a submission is in flight.
    pub processing: bool,
    /// Latest upload progress of the in-flight submission.
    pub progress: Option<UploadProgress>,
    /// The last settled submission succeeded.
    pub was_successful: bool,
    /// The last submission succeeded within the success window.
    pub recently_successful: bool,
}

impl FormState {
    /// Fresh state; `data` doubles as the defaults.
    pub fn new(data: FormData) -> Self {
        Self {
            defaults: data.clone(),
            data,
            errors: FormErrors::default(),
            has_errors: false,
            processing: false,
            progress: None,
            was_successful: false,
            recently_successful: false,
        }
    }

    /// Reads one field.
    pub fn field(&self, name: &str) -> Option<&FormValue> {
        self.data.get(name)
    }

    /// `true` when nothing is in flight and no errors are attached.
    pub fn is_idle(&self) -> bool {
        !self.processing && self.progress.is_none() && !self.has_errors
    }

    pub(crate) fn set_errors(&mut self, errors: FormErrors) {
        self.errors = errors;
        self.sync_has_errors();
    }

    pub(crate) fn sync_has_errors(&mut self) {
        self.has_errors = !self.errors.is_empty();
    }
}

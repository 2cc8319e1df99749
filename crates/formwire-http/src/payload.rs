//! Turning nested form data into a request payload.
//!
//! Nested maps flatten to `parent[child]` keys and lists to `parent[0]`.
//! Data without any file becomes a plain [`QueryParams`] list; data with a
//! file anywhere becomes a [`MultipartForm`] with the same key paths.
//!
//! ```
//! use formwire_http::payload::{build_payload, Payload};
//! use formwire_http::value::form_data_from_json;
//!
//! let data = form_data_from_json(serde_json::json!({"a": {"b": 1}, "c": [2, 3]}));
//! let Payload::Plain(params) = build_payload(&data) else { unreachable!() };
//! assert_eq!(params.urlencode(), "a%5Bb%5D=1&c%5B0%5D=2&c%5B1%5D=3");
//! ```

use crate::multipart::{MultipartForm, DEFAULT_BLOB_FILENAME};
use crate::query::QueryParams;
use crate::value::{FileBlob, FormData, FormValue};

/// A serialized request payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// String pairs, sent urlencoded (or as the query string for GET).
    Plain(QueryParams),
    /// A multipart form, used whenever the data contains a file.
    Multipart(MultipartForm),
}

impl Payload {
    /// Returns `true` for [`Payload::Multipart`].
    pub const fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }

    /// Returns the number of flattened entries.
    pub fn len(&self) -> usize {
        match self {
            Self::Plain(params) => params.len(),
            Self::Multipart(form) => form.len(),
        }
    }

    /// Returns `true` if the payload has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the flattened keys in order.
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Self::Plain(params) => params.keys().collect(),
            Self::Multipart(form) => form.keys().collect(),
        }
    }
}

/// Serializes form data into a payload.
///
/// This is a pure function: the same input always yields the same output.
pub fn build_payload(data: &FormData) -> Payload {
    if data.values().any(FormValue::has_files) {
        let mut form = MultipartForm::new();
        append_map(&mut form, None, data);
        Payload::Multipart(form)
    } else {
        Payload::Plain(flatten_to_params(data))
    }
}

/// Flattens form data into string pairs.
///
/// Files have no string form; they are represented by their filename.
pub fn flatten_to_params(data: &FormData) -> QueryParams {
    let mut params = QueryParams::new();
    append_map(&mut params, None, data);
    params
}

/// Joins a parent key and a child key in bracket notation.
pub fn compose_key(parent: Option<&str>, key: &str) -> String {
    match parent {
        Some(parent) => format!("{parent}[{key}]"),
        None => key.to_string(),
    }
}

/// Destination for flattened entries.
trait EntrySink {
    fn text(&mut self, key: String, value: String);
    fn file(&mut self, key: String, file: &FileBlob);
}

impl EntrySink for QueryParams {
    fn text(&mut self, key: String, value: String) {
        self.append(key, value);
    }

    fn file(&mut self, key: String, file: &FileBlob) {
        let name = file.name.as_deref().unwrap_or(DEFAULT_BLOB_FILENAME);
        self.append(key, name);
    }
}

impl EntrySink for MultipartForm {
    fn text(&mut self, key: String, value: String) {
        self.append_text(key, value);
    }

    fn file(&mut self, key: String, file: &FileBlob) {
        self.append_file(key, file.clone());
    }
}

fn append_map(sink: &mut impl EntrySink, parent: Option<&str>, map: &FormData) {
    for (key, value) in map {
        append_value(sink, compose_key(parent, key), value);
    }
}

fn append_value(sink: &mut impl EntrySink, key: String, value: &FormValue) {
    match value {
        FormValue::List(items) => {
            for (index, item) in items.iter().enumerate() {
                append_value(sink, compose_key(Some(&key), &index.to_string()), item);
            }
        }
        FormValue::Map(map) => append_map(sink, Some(&key), map),
        FormValue::File(file) => sink.file(key, file),
        scalar => {
            let text = scalar.to_form_string().unwrap_or_default();
            sink.text(key, text);
        }
    }
}

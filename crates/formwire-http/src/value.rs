//! Values a form field can hold.
//!
//! [`FormValue`] covers everything a form can send: JSON-like scalars,
//! dates, binary files, and arbitrarily nested lists and maps of those.
//! [`FormData`] is the ordered field-name → value mapping a form owns.

use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;

/// An ordered mapping from field name to value.
pub type FormData = IndexMap<String, FormValue>;

/// Binary content attached to a form, with an optional filename.
///
/// A `FileBlob` without a name corresponds to an anonymous blob; multipart
/// encoding then falls back to the filename `"blob"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlob {
    /// The filename as presented to the server, if any.
    pub name: Option<String>,
    /// The MIME content type of the content.
    pub content_type: String,
    /// The raw content.
    pub content: Bytes,
}

impl FileBlob {
    /// Creates a named file.
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            content_type: content_type.into(),
            content: content.into(),
        }
    }

    /// Creates an anonymous blob.
    pub fn blob(content_type: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: None,
            content_type: content_type.into(),
            content: content.into(),
        }
    }

    /// The size of the content in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns `true` if the content is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// A single form value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FormValue {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Date(DateTime<Utc>),
    File(FileBlob),
    List(Vec<FormValue>),
    Map(FormData),
}

impl FormValue {
    /// Returns `true` if this value, or anything nested inside it, is a file.
    pub fn has_files(&self) -> bool {
        match self {
            Self::File(_) => true,
            Self::List(items) => items.iter().any(Self::has_files),
            Self::Map(map) => map.values().any(Self::has_files),
            _ => false,
        }
    }

    /// Returns `true` for [`FormValue::Null`].
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the string content of a [`FormValue::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the map of a [`FormValue::Map`].
    pub const fn as_map(&self) -> Option<&FormData> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Coerces a scalar to its wire string.
    ///
    /// Booleans become `"1"`/`"0"`, null becomes `""`, integral floats drop
    /// their fractional part, and dates use RFC 3339 with milliseconds in UTC.
    /// Files, lists and maps have no scalar form and return `None`.
    pub fn to_form_string(&self) -> Option<String> {
        match self {
            Self::Null => Some(String::new()),
            Self::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
            Self::Number(n) => Some(number_to_string(n)),
            Self::String(s) => Some(s.clone()),
            Self::Date(dt) => Some(dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Self::File(_) | Self::List(_) | Self::Map(_) => None,
        }
    }
}

fn number_to_string(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => integral_to_string(f),
        _ => n.to_string(),
    }
}

/// Renders an integral float as a plain decimal from its shortest
/// round-trip digits, so `1.2345678901234568e17` becomes
/// `"123456789012345680"`.
fn integral_to_string(f: f64) -> String {
    if f.abs() < 1.0 {
        return "0".to_string();
    }
    let scientific = format!("{:e}", f.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let exponent: usize = exponent.parse().unwrap_or(0);
    let width = (exponent + 1).max(digits.len());
    let sign = if f < 0.0 { "-" } else { "" };
    format!("{sign}{digits:0<width$}")
}

/// Builds [`FormData`] from a JSON object. Non-object input yields empty data.
pub fn form_data_from_json(value: serde_json::Value) -> FormData {
    match FormValue::from(value) {
        FormValue::Map(map) => map,
        _ => FormData::new(),
    }
}

impl From<serde_json::Value> for FormValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&str> for FormValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FormValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for FormValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for FormValue {
                fn from(n: $t) -> Self {
                    Self::Number(serde_json::Number::from(n))
                }
            }
        )*
    };
}

impl_from_integer!(i32, i64, u32, u64, usize);

impl From<f64> for FormValue {
    /// Non-finite floats have no JSON representation and become null.
    fn from(f: f64) -> Self {
        serde_json::Number::from_f64(f).map_or(Self::Null, Self::Number)
    }
}

impl From<DateTime<Utc>> for FormValue {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Date(dt)
    }
}

impl From<FileBlob> for FormValue {
    fn from(file: FileBlob) -> Self {
        Self::File(file)
    }
}

impl From<FormData> for FormValue {
    fn from(map: FormData) -> Self {
        Self::Map(map)
    }
}

impl<T: Into<Self>> From<Vec<T>> for FormValue {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> From<Option<T>> for FormValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

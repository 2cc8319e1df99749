//! Multipart form-data bodies for submissions carrying files.
//!
//! A [`MultipartForm`] is an ordered list of named parts, each either text or
//! a [`FileBlob`]. [`MultipartForm::encode`] writes the
//! `multipart/form-data` wire format (RFC 7578).

use bytes::{BufMut, Bytes, BytesMut};

use crate::value::FileBlob;

/// Filename used for anonymous blobs.
pub const DEFAULT_BLOB_FILENAME: &str = "blob";

/// The content of one part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartContent {
    Text(String),
    File(FileBlob),
}

/// One named part of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// The field name, in bracket notation for nested values.
    pub name: String,
    /// The part's content.
    pub content: PartContent,
}

/// An ordered multipart form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    parts: Vec<Part>,
}

impl MultipartForm {
    /// Creates an empty form.
    pub const fn new() -> Self {
        Self { parts: Vec::new() }
    }

    /// Appends a text part.
    pub fn append_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parts.push(Part {
            name: name.into(),
            content: PartContent::Text(value.into()),
        });
    }

    /// Appends a file part.
    pub fn append_file(&mut self, name: impl Into<String>, file: FileBlob) {
        self.parts.push(Part {
            name: name.into(),
            content: PartContent::File(file),
        });
    }

    /// Returns all parts in order.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Returns the number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Returns `true` if there are no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Returns part names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.name.as_str())
    }

    /// Returns the last text value for the given name.
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.parts.iter().rev().find_map(|p| match &p.content {
            PartContent::Text(text) if p.name == name => Some(text.as_str()),
            _ => None,
        })
    }

    /// Returns the last file for the given name.
    pub fn get_file(&self, name: &str) -> Option<&FileBlob> {
        self.parts.iter().rev().find_map(|p| match &p.content {
            PartContent::File(file) if p.name == name => Some(file),
            _ => None,
        })
    }

    /// Generates a boundary that will not collide with typical content.
    pub fn generate_boundary() -> String {
        format!("----formwire{}", uuid::Uuid::new_v4().simple())
    }

    /// The `Content-Type` header value for the given boundary.
    pub fn content_type(boundary: &str) -> String {
        format!("multipart/form-data; boundary={boundary}")
    }

    /// Encodes the form as a `multipart/form-data` body.
    pub fn encode(&self, boundary: &str) -> Bytes {
        let mut buf = BytesMut::new();

        for part in &self.parts {
            buf.put_slice(format!("--{boundary}\r\n").as_bytes());
            match &part.content {
                PartContent::Text(text) => {
                    buf.put_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                            escape_param(&part.name)
                        )
                        .as_bytes(),
                    );
                    buf.put_slice(text.as_bytes());
                }
                PartContent::File(file) => {
                    let filename = file.name.as_deref().unwrap_or(DEFAULT_BLOB_FILENAME);
                    let content_type = if file.content_type.is_empty() {
                        mime::APPLICATION_OCTET_STREAM.as_ref()
                    } else {
                        file.content_type.as_str()
                    };
                    buf.put_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                             Content-Type: {content_type}\r\n\r\n",
                            escape_param(&part.name),
                            escape_param(filename),
                        )
                        .as_bytes(),
                    );
                    buf.put_slice(&file.content);
                }
            }
            buf.put_slice(b"\r\n");
        }

        buf.put_slice(format!("--{boundary}--\r\n").as_bytes());
        buf.freeze()
    }
}

/// Escapes a header parameter value the way browsers do for form-data.
fn escape_param(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

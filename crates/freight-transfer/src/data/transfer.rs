use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use http::Method;

/// How an upload is applied at the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadMethod {
    /// Create a new resource in the destination directory.
    #[default]
    Create,

    /// Replace an existing resource of the same name.
    Replace,
}

impl UploadMethod {
    pub(crate) fn http_method(self) -> Method {
        match self {
            UploadMethod::Create => Method::POST,
            UploadMethod::Replace => Method::PUT,
        }
    }
}

impl fmt::Display for UploadMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadMethod::Create => write!(f, "Create"),
            UploadMethod::Replace => write!(f, "Replace"),
        }
    }
}

/// A single upload: the name the resource will carry, the exact number of
/// bytes that will be sent, and an optional modification time.
///
/// The size is a hard limit. A source that yields more is truncated to
/// `size` bytes; a source that yields fewer fails the transfer.
///
/// # Examples
///
/// ```
/// use freight_transfer::{Transfer, UploadMethod};
///
/// let transfer = Transfer::new("report.txt", 10).method(UploadMethod::Replace);
/// assert_eq!(transfer.size, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    /// File name of the uploaded resource, embedded in the part headers.
    pub name: String,

    /// Exact payload length in bytes.
    pub size: u64,

    /// Sent as the `Fh-Modified` header when present.
    pub modified: Option<DateTime<Utc>>,

    /// Default: [`UploadMethod::Create`]
    pub method: UploadMethod,
}

impl Transfer {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            modified: None,
            method: UploadMethod::default(),
        }
    }

    #[must_use]
    pub fn modified(mut self, modified: DateTime<Utc>) -> Self {
        self.modified = Some(modified);
        self
    }

    #[must_use]
    pub fn method(mut self, method: UploadMethod) -> Self {
        self.method = method;
        self
    }

    /// Modification time in the server's timestamp format (RFC 3339, second
    /// precision).
    pub fn modified_header(&self) -> Option<String> {
        self.modified
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

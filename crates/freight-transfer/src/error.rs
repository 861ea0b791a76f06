//! Error types for freight-transfer.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid resource path: {0:?}")]
    InvalidPath(String),

    #[error("invalid file name: {0:?}")]
    InvalidName(String),

    #[error("destination is not a directory: {url}")]
    NotAContainer { url: String },

    #[error("failed to read upload source: {0}")]
    SourceRead(#[source] io::Error),

    #[error("upload source ended early: expected {expected} bytes, got {actual}")]
    ShortRead { expected: u64, actual: u64 },

    #[error("transfer pipe closed before the body was written")]
    PipeClosed,

    #[error("request {url} failed with a status of {status}: {message}")]
    Status {
        url:     String,
        status:  u16,
        message: String,
    },

    #[error("request {url} failed: {source}")]
    Transport {
        url:    String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to read response body: {0}")]
    Body(#[source] io::Error),

    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("invalid response from {url}: {source}")]
    Decode {
        url:    String,
        source: serde_json::Error,
    },
}

impl Error {
    /// Whether the server answered with 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Status { status: 404, .. })
    }

    /// Whether the error was detected before any network I/O took place.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::InvalidPath(_) | Error::InvalidName(_) | Error::NotAContainer { .. }
        )
    }

    pub(crate) fn transport<E>(url: &str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Transport {
            url:    url.to_string(),
            source: Box::new(source),
        }
    }
}

impl From<Error> for io::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::Body(inner) | Error::SourceRead(inner) => inner,
            Error::PipeClosed => io::Error::new(io::ErrorKind::BrokenPipe, Error::PipeClosed),
            other => io::Error::other(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

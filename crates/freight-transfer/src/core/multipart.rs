//! Single-field `multipart/form-data` framing.
//!
//! The encoder only produces the bytes around the payload; the payload itself
//! is streamed between [`Encoder::head`] and [`Encoder::tail`] by the caller.

use bytes::{BufMut, Bytes, BytesMut};
use rand::Rng;

/// Form field every upload is sent under.
pub const FORM_FIELD: &str = "file";

/// Random boundary length in bytes (hex encoded to twice as many characters).
///
/// The boundary length is part of the framing overhead, so it never varies.
const BOUNDARY_BYTES: usize = 30;

#[derive(Debug, Clone)]
pub struct Encoder {
    boundary: String,
}

impl Default for Encoder {
    fn default() -> Self { Self::new() }
}

impl Encoder {
    /// Create an encoder with a fresh random boundary.
    pub fn new() -> Self {
        let mut bytes = [0u8; BOUNDARY_BYTES];
        rand::thread_rng().fill(&mut bytes[..]);
        Self {
            boundary: hex::encode(bytes),
        }
    }

    pub fn boundary(&self) -> &str { &self.boundary }

    /// Value of the request's `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Delimiter and part headers preceding the payload.
    pub fn head(&self, file_name: &str) -> Bytes {
        let mut buf = BytesMut::new();
        buf.put_slice(b"--");
        buf.put_slice(self.boundary.as_bytes());
        buf.put_slice(b"\r\n");
        buf.put_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                escape_quotes(FORM_FIELD),
                escape_quotes(file_name)
            )
            .as_bytes(),
        );
        buf.put_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        buf.freeze()
    }

    /// Closing delimiter following the payload.
    pub fn tail(&self) -> Bytes {
        let mut buf = BytesMut::new();
        buf.put_slice(b"\r\n--");
        buf.put_slice(self.boundary.as_bytes());
        buf.put_slice(b"--\r\n");
        buf.freeze()
    }

    /// Encode a complete body held in memory.
    pub fn encode(&self, file_name: &str, content: &[u8]) -> Vec<u8> {
        let head = self.head(file_name);
        let tail = self.tail();
        let mut out = Vec::with_capacity(head.len() + content.len() + tail.len());
        out.extend_from_slice(&head);
        out.extend_from_slice(content);
        out.extend_from_slice(&tail);
        out
    }
}

/// Escape backslashes and double quotes for a quoted header parameter.
pub fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

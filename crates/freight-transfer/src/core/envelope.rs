//! The `{ status, data, message }` envelope wrapping metadata responses.

use http::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
struct Envelope {
    status:  String,
    #[serde(default)]
    data:    Option<serde_json::Value>,
    #[serde(default)]
    message: String,
}

/// Canonical reason phrase for a status code, or an empty string.
pub fn reason_phrase(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("")
}

/// Reject any status of 400 or above.
pub fn check_status(url: &str, status: u16) -> Result<()> {
    if status >= 400 {
        return Err(Error::Status {
            url: url.to_string(),
            status,
            message: reason_phrase(status).to_string(),
        });
    }
    Ok(())
}

/// Unwrap the envelope of a metadata response and decode its `data` member.
pub fn decode_envelope<T: DeserializeOwned>(url: &str, status: u16, body: &[u8]) -> Result<T> {
    let envelope: Envelope = match serde_json::from_slice(body) {
        Ok(e) => e,
        Err(source) => {
            check_status(url, status)?;
            return Err(Error::Decode {
                url: url.to_string(),
                source,
            });
        }
    };

    if envelope.status != "success" || status >= 400 {
        let message = if envelope.message.is_empty() {
            reason_phrase(status).to_string()
        } else {
            envelope.message
        };
        return Err(Error::Status {
            url: url.to_string(),
            status,
            message,
        });
    }

    serde_json::from_value(envelope.data.unwrap_or_default()).map_err(|source| Error::Decode {
        url: url.to_string(),
        source,
    })
}

//! Calibrated multipart framing cost and exact upload lengths.

use once_cell::sync::Lazy;

use super::multipart::{Encoder, escape_quotes};

static OVERHEAD: Lazy<u64> = Lazy::new(calibrate);

/// Encode a probe with the real encoder and subtract the probe's own bytes.
fn calibrate() -> u64 {
    const PROBE_NAME: &str = "n";
    const PROBE_CONTENT: &[u8] = b"c";

    let encoded = Encoder::new().encode(PROBE_NAME, PROBE_CONTENT);
    let overhead = encoded.len() - PROBE_NAME.len() - PROBE_CONTENT.len();
    tracing::debug!(overhead, "calibrated multipart overhead");
    overhead as u64
}

/// Bytes the multipart framing adds around one file, excluding the file name.
///
/// Calibrated on first use and shared by every transfer afterwards.
pub fn overhead() -> u64 { *OVERHEAD }

/// Exact request body length for uploading `size` bytes as `file_name`.
///
/// # Examples
///
/// ```
/// use freight_transfer::core::{content_length, overhead};
///
/// assert_eq!(content_length("report.txt", 10), overhead() + 10 + 10);
/// ```
pub fn content_length(file_name: &str, size: u64) -> u64 {
    overhead() + escape_quotes(file_name).len() as u64 + size
}

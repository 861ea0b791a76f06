//! Merging the two independent outcomes of an upload.
//!
//! The producer (multipart encoder) and the exchange (HTTP round trip) each
//! finish with their own result. Exactly one [`Outcome`] is derived from the
//! pair. A producer abandoned after a failed exchange counts as having seen
//! its pipe closed.

use crate::error::{Error, Result};

#[derive(Debug)]
pub enum Outcome {
    /// Both sides succeeded; carries the payload bytes sent.
    Success(u64),

    /// The producer failed. Reported even if the server accepted the request.
    Producer(Error),

    /// The exchange failed.
    Transport(Error),
}

impl Outcome {
    pub fn is_success(&self) -> bool { matches!(self, Outcome::Success(_)) }

    pub fn into_result(self) -> Result<u64> {
        match self {
            Outcome::Success(n) => Ok(n),
            Outcome::Producer(e) | Outcome::Transport(e) => Err(e),
        }
    }
}

/// Combine the producer's and the exchange's results.
///
/// A producer error wins over a successful exchange: a short or broken body
/// must never be reported as success. When the exchange failed and the
/// producer merely saw its pipe closed, that closure is a consequence of the
/// exchange failure, so the exchange error is reported instead.
pub fn merge(producer: Result<u64>, exchange: Result<()>) -> Outcome {
    match (producer, exchange) {
        (Ok(n), Ok(())) => Outcome::Success(n),
        (Err(Error::PipeClosed), Err(e)) => Outcome::Transport(e),
        (Err(e), _) => Outcome::Producer(e),
        (Ok(_), Err(e)) => Outcome::Transport(e),
    }
}

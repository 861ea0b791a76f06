//! Core layer: pure framing arithmetic, path resolution, and outcome merging.

mod envelope;
mod multipart;
mod overhead;
mod path;
mod rendezvous;

pub use envelope::{check_status, decode_envelope, reason_phrase};
pub use multipart::{Encoder, FORM_FIELD, escape_quotes};
pub use overhead::{content_length, overhead};
pub use path::{join_path, parent_path, properties_path};
pub use rendezvous::{Outcome, merge};

//! I/O: the transfer pipe, the HTTP transport seam, and the client that
//! drives uploads and downloads through them.

mod client;
mod download;
mod pipe;
mod producer;
mod transport;

pub use client::{Client, MODIFIED_HEADER};
pub use download::Download;
pub use pipe::{PIPE_CAPACITY, PipeReader, PipeWriter, pipe};
pub use producer::produce;
pub use transport::{Body, BoxStream, Request, Response, Transport};

#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;

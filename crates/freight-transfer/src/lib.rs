//! Streaming uploads and lazy downloads against a resource server.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable configuration and types
//! - [`core`] - Pure transformations
//! - [`effects`] - I/O operations with trait abstraction
//!
//! # Key Features
//!
//! - **Exact Length**: the multipart framing overhead is calibrated once, so every
//!   upload declares its `Content-Length` before the first byte is sent
//! - **Backpressure**: the encoder writes into a bounded pipe the HTTP body reads from;
//!   payloads are never held in memory
//! - **Single Outcome**: encoder and exchange failures are merged into one result,
//!   and neither side outlives the upload
//! - **Lazy Downloads**: [`Download`] connects on first read and can be closed and
//!   reopened freely
//! - **Mechanism-Only**: No policy; caller handles retries and progress UI

pub mod core;
pub mod data;
pub mod effects;
mod error;

pub use data::{
    ClientConfig, ClientSetting, Credentials, Permission, ResourceDescriptor, Transfer,
    UploadMethod,
};
pub use effects::{
    Body, BoxStream, Client, Download, MODIFIED_HEADER, Request, Response, Transport,
};

#[cfg(feature = "reqwest")]
pub use effects::ReqwestTransport;

pub use error::{Error, Result};

//! Immutable data types for transfers.
//!
//! Configuration, transfer descriptors, and the resource metadata records
//! returned by the server. Nothing in here performs I/O.

pub mod descriptor;
pub mod options;
pub mod transfer;

pub use descriptor::{Permission, ResourceDescriptor};
pub use options::{ClientConfig, ClientSetting, Credentials};
pub use transfer::{Transfer, UploadMethod};

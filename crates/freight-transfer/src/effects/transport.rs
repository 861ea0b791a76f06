use std::future::Future;
use std::io;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::{Stream, TryStreamExt};
use http::Method;

use super::pipe::PipeReader;

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Request body handed to the transport.
#[derive(Debug, Default)]
pub enum Body {
    #[default]
    Empty,

    /// Small in-memory body, such as a JSON document.
    Full(Bytes),

    /// Streamed from the read end of a transfer pipe. `length` is exact and
    /// must be sent as `Content-Length`.
    Pipe { reader: PipeReader, length: u64 },
}

impl Body {
    /// Declared body length, if any.
    pub fn length(&self) -> Option<u64> {
        match self {
            Body::Empty => None,
            Body::Full(bytes) => Some(bytes.len() as u64),
            Body::Pipe { length, .. } => Some(*length),
        }
    }
}

/// One HTTP request as seen by the transfer engine.
#[derive(Debug)]
pub struct Request {
    pub method:  Method,
    pub url:     String,
    pub headers: Vec<(String, String)>,
    pub body:    Body,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: Body::Empty,
        }
    }

    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    /// First header value matching `name`, ignoring ASCII case.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and streaming body of a response. Dropping the body releases the
/// connection.
pub struct Response {
    pub status: u16,
    pub body:   BoxStream<'static, io::Result<Bytes>>,
}

impl Response {
    pub fn new(status: u16, body: BoxStream<'static, io::Result<Bytes>>) -> Self {
        Self { status, body }
    }

    /// Drain the whole body into memory. Only for small metadata responses.
    pub async fn bytes(mut self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        while let Some(chunk) = self.body.try_next().await? {
            buf.extend_from_slice(&chunk);
        }
        Ok(buf)
    }
}

impl std::fmt::Debug for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("body", &"{ ... }")
            .finish()
    }
}

/// Asynchronous HTTP transport abstraction.
///
/// Implementations send the request exactly as described: headers verbatim,
/// a [`Body::Pipe`] with a fixed `Content-Length` and no chunked encoding.
/// Status codes are not interpreted here; the engine decides what counts as
/// failure. Timeouts, redirects, and TLS belong to the implementation.
///
/// # Implementations
///
/// - [`ReqwestTransport`]: Production implementation using `reqwest`
/// - Mock implementations for testing
pub trait Transport: Send + Sync {
    /// Error type for transport failures (connection, TLS, timeout).
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send `request` and return once response headers are available.
    ///
    /// The response may arrive before the body has been sent in full, and
    /// the implementation may keep reading the body afterwards. The caller
    /// closes the write end of a [`Body::Pipe`] when it stops producing.
    fn execute(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Response, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_transport {
    use super::*;
    use reqwest::Client;
    use reqwest::header::CONTENT_LENGTH;
    use tokio_util::io::ReaderStream;

    use crate::data::ClientSetting;

    /// Production transport built on `reqwest`.
    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        client: Client,
    }

    impl ReqwestTransport {
        pub fn new() -> Result<Self, reqwest::Error> {
            Self::with_setting(ClientSetting::default())
        }

        pub fn with_setting(setting: ClientSetting) -> Result<Self, reqwest::Error> {
            let client = setting.build()?;
            Ok(Self { client })
        }

        pub fn from_client(client: Client) -> Self { Self { client } }
    }

    impl Transport for ReqwestTransport {
        type Error = reqwest::Error;

        async fn execute(&self, request: Request) -> Result<Response, Self::Error> {
            let mut builder = self.client.request(request.method, &request.url);

            for (key, value) in &request.headers {
                builder = builder.header(key.as_str(), value.as_str());
            }

            match request.body {
                Body::Empty => {}
                Body::Full(bytes) => builder = builder.body(bytes),
                Body::Pipe { reader, length } => {
                    // an explicit Content-Length keeps hyper from chunking the stream
                    builder = builder
                        .header(CONTENT_LENGTH, length.to_string())
                        .body(reqwest::Body::wrap_stream(ReaderStream::new(reader)));
                }
            }

            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.bytes_stream().map_err(io::Error::other);

            Ok(Response::new(status, Box::pin(body)))
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_transport::ReqwestTransport;

//! Shared in-memory transport for integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use bytes::Bytes;
use freight_transfer::effects::PipeReader;
use freight_transfer::{Body, BoxStream, ClientConfig, Credentials, Request, Response, Transport};
use futures_util::{StreamExt, stream};
use http::Method;
use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};

pub const ROOT: &str = "http://freight.test";

pub fn config() -> ClientConfig {
    ClientConfig::new(ROOT).credentials(Credentials::new("tester", "testerToken"))
}

#[derive(Debug)]
pub struct MockError(pub String);

impl std::fmt::Display for MockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

impl std::error::Error for MockError {}

/// An upload as the server saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method:   Method,
    pub url:      String,
    pub headers:  Vec<(String, String)>,
    pub declared: u64,
    pub body:     Vec<u8>,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadBehavior {
    /// Read the whole body, then answer with the status.
    Consume(u16),
    /// Answer with the status without reading a byte.
    Ignore(u16),
    /// Fail the exchange without reading a byte.
    Refuse,
    /// Answer with the status at once but keep the body open, unread, the
    /// way an HTTP connection may after an early response.
    Hold(u16),
}

#[derive(Debug, Clone)]
struct Reply {
    status:    u16,
    body:      Vec<u8>,
    truncated: bool,
}

struct State {
    routes:   Mutex<HashMap<String, VecDeque<Reply>>>,
    behavior: UploadBehavior,
    uploads:  Mutex<Vec<Recorded>>,
    requests: Mutex<Vec<Recorded>>,
    held:     Mutex<Vec<PipeReader>>,
    gets:     AtomicUsize,
}

#[derive(Clone)]
pub struct MockTransport {
    state: Arc<State>,
}

impl MockTransport {
    pub fn new(behavior: UploadBehavior) -> Self {
        Self {
            state: Arc::new(State {
                routes: Mutex::new(HashMap::new()),
                behavior,
                uploads: Mutex::new(Vec::new()),
                requests: Mutex::new(Vec::new()),
                held: Mutex::new(Vec::new()),
                gets: AtomicUsize::new(0),
            }),
        }
    }

    /// Queue a response for `GET path`. The last queued response repeats.
    pub fn route(&self, path: &str, status: u16, body: impl Into<Vec<u8>>) -> &Self {
        self.route_method(Method::GET, path, status, body)
    }

    /// Queue a response for `method path`.
    pub fn route_method(
        &self,
        method: Method,
        path: &str,
        status: u16,
        body: impl Into<Vec<u8>>,
    ) -> &Self {
        self.push(method, path, Reply {
            status,
            body: body.into(),
            truncated: false,
        })
    }

    /// Queue a `GET path` response whose body fails after `body`.
    pub fn route_truncated(&self, path: &str, body: impl Into<Vec<u8>>) -> &Self {
        self.push(Method::GET, path, Reply {
            status:    200,
            body:      body.into(),
            truncated: true,
        })
    }

    fn push(&self, method: Method, path: &str, reply: Reply) -> &Self {
        self.state
            .routes
            .lock()
            .unwrap()
            .entry(format!("{method} {ROOT}{path}"))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn uploads(&self) -> Vec<Recorded> { self.state.uploads.lock().unwrap().clone() }

    /// Every request without a streamed body, in order.
    pub fn requests(&self) -> Vec<Recorded> { self.state.requests.lock().unwrap().clone() }

    pub fn gets(&self) -> usize { self.state.gets.load(Ordering::SeqCst) }

    fn lookup(&self, method: &Method, url: &str) -> Reply {
        let mut routes = self.state.routes.lock().unwrap();
        match routes.get_mut(&format!("{method} {url}")) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => Reply {
                status:    404,
                body:      br#"{"status":"fail","message":"Resource not found"}"#.to_vec(),
                truncated: false,
            },
        }
    }
}

fn chunked(body: Vec<u8>) -> BoxStream<'static, io::Result<Bytes>> {
    let chunks: Vec<io::Result<Bytes>> = body
        .chunks(3)
        .map(|c| Ok(Bytes::copy_from_slice(c)))
        .collect();
    Box::pin(stream::iter(chunks))
}

fn reply_body(reply: Reply) -> BoxStream<'static, io::Result<Bytes>> {
    let body = chunked(reply.body);
    if !reply.truncated {
        return body;
    }
    let reset = io::Error::new(io::ErrorKind::ConnectionReset, "connection reset");
    Box::pin(body.chain(stream::iter([Err(reset)])))
}

impl Transport for MockTransport {
    type Error = MockError;

    async fn execute(&self, request: Request) -> Result<Response, MockError> {
        let Request {
            method,
            url,
            headers,
            body,
        } = request;

        match body {
            Body::Empty | Body::Full(_) => {
                if method == Method::GET {
                    self.state.gets.fetch_add(1, Ordering::SeqCst);
                }
                let reply = self.lookup(&method, &url);
                let sent = match body {
                    Body::Full(bytes) => bytes.to_vec(),
                    _ => Vec::new(),
                };
                self.state.requests.lock().unwrap().push(Recorded {
                    method,
                    url,
                    headers,
                    declared: sent.len() as u64,
                    body: sent,
                });
                Ok(Response::new(reply.status, reply_body(reply)))
            }
            Body::Pipe { mut reader, length } => {
                let mut received = Vec::new();
                let status = match self.state.behavior {
                    UploadBehavior::Consume(status) => {
                        reader
                            .read_to_end(&mut received)
                            .await
                            .map_err(|e| MockError(e.to_string()))?;
                        status
                    }
                    UploadBehavior::Ignore(status) => status,
                    UploadBehavior::Refuse => {
                        return Err(MockError("connection refused".into()));
                    }
                    UploadBehavior::Hold(status) => {
                        self.state.held.lock().unwrap().push(reader);
                        return Ok(Response::new(status, chunked(Vec::new())));
                    }
                };
                drop(reader);

                self.state.uploads.lock().unwrap().push(Recorded {
                    method,
                    url,
                    headers,
                    declared: length,
                    body: received,
                });
                Ok(Response::new(status, chunked(b"{\"status\":\"success\"}".to_vec())))
            }
        }
    }
}

/// Source that records whether it was ever polled.
pub struct TrackingReader {
    inner:   io::Cursor<Vec<u8>>,
    touched: Arc<AtomicBool>,
}

impl TrackingReader {
    pub fn new(data: Vec<u8>) -> (Self, Arc<AtomicBool>) {
        let touched = Arc::new(AtomicBool::new(false));
        (
            Self {
                inner:   io::Cursor::new(data),
                touched: Arc::clone(&touched),
            },
            touched,
        )
    }
}

impl AsyncRead for TrackingReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        self.touched.store(true, Ordering::SeqCst);
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}

/// Source that yields `good` bytes and then fails.
pub struct FailingReader {
    remaining: usize,
}

impl FailingReader {
    pub fn new(good: usize) -> Self { Self { remaining: good } }
}

impl AsyncRead for FailingReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if self.remaining == 0 {
            return Poll::Ready(Err(io::Error::other("disk read failed")));
        }
        let n = self.remaining.min(buf.remaining());
        buf.put_slice(&vec![b'x'; n]);
        self.remaining -= n;
        Poll::Ready(Ok(()))
    }
}

pub fn descriptor_json(name: &str, url: &str, size: u64, is_dir: bool) -> String {
    format!(
        r#"{{"status":"success","data":{{"name":"{name}","url":"{url}","size":{size},"isDir":{is_dir},"modified":"2015-03-13T11:28:59-05:00"}}}}"#
    )
}

//! Lazy, re-openable download reader.

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, ready};

use bytes::Bytes;
use http::Method;
use http::header::AUTHORIZATION;
use tokio::io::{AsyncRead, ReadBuf};
use tokio_util::io::StreamReader;

use super::transport::{BoxStream, Request, Transport};
use crate::core::check_status;
use crate::error::{Error, Result};

type BodyReader = StreamReader<BoxStream<'static, io::Result<Bytes>>, Bytes>;
type OpenFuture = Pin<Box<dyn Future<Output = Result<BodyReader>> + Send>>;

enum State {
    /// No request has been made yet, or the last open or body read failed.
    Unopened,
    Opening(OpenFuture),
    Open(BodyReader),
    /// Released by [`Download::close`]. The next read opens again.
    Closed,
}

/// Pull reader over a remote resource.
///
/// Nothing is requested until the first read. The response body is then
/// streamed straight through, never buffered in full. [`Download::close`]
/// releases the connection and may be called any number of times; a read
/// after closing issues a fresh request and starts from the beginning of the
/// resource again. The same happens after a read fails mid-body: the broken
/// connection is dropped rather than reported as end of stream.
pub struct Download<T> {
    transport:     Arc<T>,
    url:           String,
    authorization: String,
    state:         State,
}

impl<T: Transport + 'static> Download<T> {
    pub(crate) fn new(transport: Arc<T>, url: String, authorization: String) -> Self {
        Self {
            transport,
            url,
            authorization,
            state: State::Unopened,
        }
    }

    pub fn url(&self) -> &str { &self.url }

    /// Whether a response body is currently held.
    pub fn is_open(&self) -> bool { matches!(self.state, State::Open(_)) }

    /// Release the connection, if any. Never fails.
    pub fn close(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, State::Closed) {
            State::Open(_) | State::Opening(_) => {
                tracing::debug!(url = %self.url, "download closed");
            }
            State::Unopened | State::Closed => {}
        }
        Ok(())
    }

    fn open(&self) -> OpenFuture {
        let transport = Arc::clone(&self.transport);
        let url = self.url.clone();
        let request = Request::new(Method::GET, url.clone())
            .header(AUTHORIZATION.as_str(), self.authorization.clone());

        Box::pin(async move {
            let response = transport
                .execute(request)
                .await
                .map_err(|e| Error::transport(&url, e))?;
            check_status(&url, response.status)?;
            tracing::debug!(%url, "download opened");
            Ok(StreamReader::new(response.body))
        })
    }
}

impl<T: Transport + 'static> AsyncRead for Download<T> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        loop {
            let next = match &mut this.state {
                State::Open(reader) => {
                    let res = ready!(Pin::new(reader).poll_read(cx, buf));
                    if let Err(e) = &res {
                        // what was read so far is incomplete; start over on the next read
                        tracing::warn!(url = %this.url, error = %e, "download body failed");
                        this.state = State::Unopened;
                    }
                    return Poll::Ready(res);
                }
                State::Opening(fut) => match ready!(fut.as_mut().poll(cx)) {
                    Ok(reader) => State::Open(reader),
                    Err(e) => {
                        tracing::warn!(url = %this.url, error = %e, "download open failed");
                        this.state = State::Unopened;
                        return Poll::Ready(Err(e.into()));
                    }
                },
                State::Unopened | State::Closed => State::Opening(this.open()),
            };
            this.state = next;
        }
    }
}

impl<T> std::fmt::Debug for Download<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.state {
            State::Unopened => "unopened",
            State::Opening(_) => "opening",
            State::Open(_) => "open",
            State::Closed => "closed",
        };
        f.debug_struct("Download")
            .field("url", &self.url)
            .field("state", &state)
            .finish()
    }
}

//! Bounded in-memory pipe between one writer and one reader.
//!
//! Writes suspend once [`PIPE_CAPACITY`] bytes are in flight and resume only
//! as the reader drains them. Shutting down or dropping the writer ends the
//! reader's stream; dropping the reader fails the writer's pending and later
//! writes with [`std::io::ErrorKind::BrokenPipe`].

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, DuplexStream, ReadBuf};

/// Bytes that may sit in the pipe before the writer is suspended.
pub const PIPE_CAPACITY: usize = 8 * 1024;

/// Create a connected writer/reader pair.
pub fn pipe() -> (PipeWriter, PipeReader) {
    let (w, r) = tokio::io::duplex(PIPE_CAPACITY);
    (PipeWriter { inner: w }, PipeReader { inner: r })
}

/// Write end, owned by the producer.
#[derive(Debug)]
pub struct PipeWriter {
    inner: DuplexStream,
}

/// Read end, owned by the transport.
#[derive(Debug)]
pub struct PipeReader {
    inner: DuplexStream,
}

impl AsyncWrite for PipeWriter {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.inner).poll_write(cx, buf)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_shutdown(cx)
    }
}

impl AsyncRead for PipeReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}

//! A TCP stream that is severed when a cancellation token fires.

use std::{
    future::Future,
    io,
    pin::Pin,
    task::{Context, Poll},
};

use tokio::{
    io::{AsyncRead, AsyncWrite, ReadBuf},
    net::TcpStream,
};
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};

/// A [`TcpStream`] bound to a [`CancellationToken`].
///
/// Once the token is cancelled all reads and writes fail with [`io::ErrorKind::ConnectionAborted`],
/// which ends the SSH session task owning the stream and thereby closes the connection.
#[derive(Debug)]
pub(crate) struct CancellableStream {
    inner: TcpStream,
    cancelled: Pin<Box<WaitForCancellationFutureOwned>>,
}

impl CancellableStream {
    /// Creates a new [`CancellableStream`] from a connected `stream`.
    pub(crate) fn new(stream: TcpStream, token: CancellationToken) -> Self {
        Self {
            inner: stream,
            cancelled: Box::pin(token.cancelled_owned()),
        }
    }

    /// Polls the cancellation token and registers the task for wake-up.
    fn poll_cancelled(&mut self, cx: &mut Context<'_>) -> bool {
        self.cancelled.as_mut().poll(cx).is_ready()
    }
}

/// Returns the error used for all I/O on a cancelled stream.
fn aborted() -> io::Error {
    io::Error::new(io::ErrorKind::ConnectionAborted, "connection cancelled")
}

impl AsyncRead for CancellableStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if self.poll_cancelled(cx) {
            return Poll::Ready(Err(aborted()));
        }
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}

impl AsyncWrite for CancellableStream {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        if self.poll_cancelled(cx) {
            return Poll::Ready(Err(aborted()));
        }
        Pin::new(&mut self.inner).poll_write(cx, buf)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        if self.poll_cancelled(cx) {
            return Poll::Ready(Err(aborted()));
        }
        Pin::new(&mut self.inner).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        if self.poll_cancelled(cx) {
            return Poll::Ready(Ok(()));
        }
        Pin::new(&mut self.inner).poll_shutdown(cx)
    }
}

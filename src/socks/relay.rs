//! Bidirectional relay between client and destination
//!
//! Each direction runs as its own task. Whichever task finishes first
//! decides the end of the session: the other task is aborted and both
//! streams are dropped, which closes both connections.

use std::fmt;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, ReadBuf};
use tracing::debug;

/// One direction of the relay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Bytes read from the client, written to the destination
    ClientToTarget,
    /// Bytes read from the destination, written to the client
    TargetToClient,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::ClientToTarget => write!(f, "client->target"),
            Direction::TargetToClient => write!(f, "target->client"),
        }
    }
}

/// How a relay ended
#[derive(Debug)]
pub struct RelayOutcome {
    /// The direction whose copy finished first
    pub first_closed: Direction,
    /// Bytes copied in that direction, or the error that stopped it
    pub result: io::Result<u64>,
    /// Bytes read from the client over the whole relay
    pub client_to_target: u64,
    /// Bytes read from the destination over the whole relay
    pub target_to_client: u64,
}

/// Reader that adds every byte it yields to a shared counter
///
/// The counter survives the copy task being aborted.
struct CountingReader<R> {
    inner: R,
    count: Arc<AtomicU64>,
}

impl<R: AsyncRead + Unpin> AsyncRead for CountingReader<R> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let before = buf.filled().len();
        let poll = Pin::new(&mut self.inner).poll_read(cx, buf);
        if let Poll::Ready(Ok(())) = poll {
            let read = (buf.filled().len() - before) as u64;
            self.count.fetch_add(read, Ordering::Relaxed);
        }
        poll
    }
}

/// Relay bytes between `client` and `target` until either side terminates
///
/// Both streams are owned by the relay and are closed before it returns.
pub async fn relay_tcp<C, T>(client: C, target: T) -> RelayOutcome
where
    C: AsyncRead + AsyncWrite + Send + 'static,
    T: AsyncRead + AsyncWrite + Send + 'static,
{
    let (client_read, client_write) = tokio::io::split(client);
    let (target_read, target_write) = tokio::io::split(target);

    let up_count = Arc::new(AtomicU64::new(0));
    let down_count = Arc::new(AtomicU64::new(0));

    let client_read = CountingReader {
        inner: client_read,
        count: up_count.clone(),
    };
    let target_read = CountingReader {
        inner: target_read,
        count: down_count.clone(),
    };

    let mut upstream = tokio::spawn(copy_one_way(client_read, target_write));
    let mut downstream = tokio::spawn(copy_one_way(target_read, client_write));

    let (first_closed, joined) = tokio::select! {
        r = &mut upstream => (Direction::ClientToTarget, r),
        r = &mut downstream => (Direction::TargetToClient, r),
    };

    let other = match first_closed {
        Direction::ClientToTarget => downstream,
        Direction::TargetToClient => upstream,
    };
    other.abort();
    // Wait for the aborted task to drop its halves so both sockets close here
    let _ = other.await;

    let result = joined.unwrap_or_else(|e| Err(io::Error::new(io::ErrorKind::Other, e)));

    match &result {
        Ok(bytes) => debug!("{} finished: {} bytes", first_closed, bytes),
        Err(e) => debug!("{} error: {}", first_closed, e),
    }

    let client_to_target = up_count.load(Ordering::Relaxed);
    let target_to_client = down_count.load(Ordering::Relaxed);
    debug!(
        "Relay closed: {} bytes client->target, {} bytes target->client",
        client_to_target, target_to_client
    );

    RelayOutcome {
        first_closed,
        result,
        client_to_target,
        target_to_client,
    }
}

async fn copy_one_way<R, W>(mut reader: R, mut writer: W) -> io::Result<u64>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let bytes = tokio::io::copy(&mut reader, &mut writer).await?;
    let _ = writer.shutdown().await;
    Ok(bytes)
}

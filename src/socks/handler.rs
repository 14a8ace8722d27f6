//! Main SOCKS5 handler
//!
//! Entry point the server spawns for every accepted connection. Errors end
//! the session only; they are logged here and never reach the accept loop.

use super::session::Session;
use crate::transport::Dialer;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, warn, Instrument};

/// Handle one client connection from greeting to relay teardown
pub async fn handle_connection<S, D>(stream: S, peer_addr: SocketAddr, dialer: Arc<D>)
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    D: Dialer,
{
    let span = tracing::info_span!("session", peer = %peer_addr);

    async move {
        debug!("Accepted connection");

        match Session::new(stream).run(dialer.as_ref()).await {
            Ok(outcome) => debug!("Session closed after {}", outcome.first_closed),
            Err(e) => warn!("Session aborted ({}): {}", e.kind(), e),
        }
    }
    .instrument(span)
    .await
}

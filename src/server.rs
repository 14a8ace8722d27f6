//! SOCKS5 listener and accept loop
//!
//! A [`Server`] binds its listen address up front, so bind failures surface
//! to the caller before anything is spawned. Every accepted connection gets
//! its own task; nothing is shared between sessions except the listener.

use crate::config::ServerConfig;
use crate::socks::handle_connection;
use crate::transport::{Dialer, SocketOpts, TcpDialer};
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Pause after a failed accept before trying again
const ACCEPT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Bound SOCKS5 server
#[derive(Debug)]
pub struct Server<D: Dialer = TcpDialer> {
    listener: TcpListener,
    local_addr: SocketAddr,
    socket_opts: SocketOpts,
    dialer: Arc<D>,
}

impl Server<TcpDialer> {
    /// Bind a server that dials destinations over plain TCP
    pub async fn bind(config: &ServerConfig) -> Result<Self> {
        let socket_opts = SocketOpts::from_tcp_config(&config.tcp);
        let dialer = TcpDialer::new(socket_opts);
        Server::bind_with_dialer(config, dialer).await
    }
}

impl<D: Dialer> Server<D> {
    /// Bind a server with a custom dialer
    pub async fn bind_with_dialer(config: &ServerConfig, dialer: D) -> Result<Self> {
        let listener = TcpListener::bind(config.listen_addr.as_str())
            .await
            .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
        let local_addr = listener
            .local_addr()
            .with_context(|| "Failed to read listener address")?;

        Ok(Server {
            listener,
            local_addr,
            socket_opts: SocketOpts::from_tcp_config(&config.tcp),
            dialer: Arc::new(dialer),
        })
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accept connections until a shutdown signal arrives
    ///
    /// Accept errors are logged and retried. Sessions already running are
    /// left to finish on their own. If every shutdown sender is dropped
    /// without sending, the server keeps accepting for the life of the
    /// runtime.
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<bool>) -> Result<()> {
        info!("SOCKS5 proxy listening on {}", self.local_addr);

        let mut shutdown_open = true;

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    let (stream, peer_addr) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            error!("Accept failed: {}", e);
                            tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                            continue;
                        }
                    };

                    if let Err(e) = self.socket_opts.apply(&stream) {
                        warn!("Failed to apply socket options for {}: {}", peer_addr, e);
                    }

                    // Admission control would gate this spawn
                    tokio::spawn(handle_connection(stream, peer_addr, self.dialer.clone()));
                }
                signal = shutdown_rx.recv(), if shutdown_open => {
                    match signal {
                        Ok(_) | Err(RecvError::Lagged(_)) => {
                            info!("Shutdown signal received, stopping listener");
                            break;
                        }
                        Err(RecvError::Closed) => {
                            debug!("Shutdown channel closed, listener keeps running");
                            shutdown_open = false;
                        }
                    }
                }
            }
        }

        debug!("Listener on {} closed", self.local_addr);
        Ok(())
    }

    /// Run the server on a background task
    pub fn spawn(self) -> ServerHandle {
        let local_addr = self.local_addr;
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let task = tokio::spawn(self.run(shutdown_rx));

        ServerHandle {
            local_addr,
            shutdown_tx,
            task,
        }
    }
}

/// Handle to a server running on a background task
///
/// Dropping the handle without calling [`ServerHandle::stop`] detaches the
/// server: it keeps accepting until the runtime shuts down.
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: broadcast::Sender<bool>,
    task: JoinHandle<Result<()>>,
}

impl ServerHandle {
    /// Address the listener is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting and wait for the listener to close
    pub async fn stop(self) -> Result<()> {
        let _ = self.shutdown_tx.send(true);
        self.task.await.with_context(|| "Server task panicked")?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    fn local_config() -> ServerConfig {
        ServerConfig::with_listen_addr("127.0.0.1:0")
    }

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let server = Server::bind(&local_config()).await.unwrap();
        assert!(server.local_addr().port() > 0);
        assert!(server.local_addr().ip().is_loopback());
    }

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let first = Server::bind(&local_config()).await.unwrap();
        let taken = ServerConfig::with_listen_addr(first.local_addr().to_string());

        let err = Server::bind(&taken).await.unwrap_err();
        assert!(err.to_string().contains("Failed to bind"));
    }

    #[tokio::test]
    async fn test_spawn_and_stop() {
        let handle = Server::bind(&local_config()).await.unwrap().spawn();
        let addr = handle.local_addr();

        let mut client = TcpStream::connect(addr).await.unwrap();
        client.write_all(&[5, 1, 0]).await.unwrap();
        let mut reply = [0u8; 2];
        client.read_exact(&mut reply).await.unwrap();
        assert_eq!(reply, [5, 0]);

        handle.stop().await.unwrap();

        // Listener is gone once stop returns
        assert!(TcpStream::connect(addr).await.is_err());
    }

    #[tokio::test]
    async fn test_dropped_handle_keeps_accepting() {
        let handle = Server::bind(&local_config()).await.unwrap().spawn();
        let addr = handle.local_addr();
        drop(handle);

        // Give the accept loop a chance to observe the closed channel
        tokio::time::sleep(Duration::from_millis(50)).await;

        let mut client = TcpStream::connect(addr).await.unwrap();
        client.write_all(&[5, 1, 0]).await.unwrap();
        let mut reply = [0u8; 2];
        client.read_exact(&mut reply).await.unwrap();
        assert_eq!(reply, [5, 0]);
    }

    #[tokio::test]
    async fn test_keeps_accepting_after_failed_sessions() {
        let handle = Server::bind(&local_config()).await.unwrap().spawn();
        let addr = handle.local_addr();

        for _ in 0..5 {
            let mut bad = TcpStream::connect(addr).await.unwrap();
            bad.write_all(&[4, 1]).await.unwrap();
            let mut buf = Vec::new();
            bad.read_to_end(&mut buf).await.unwrap();
            assert!(buf.is_empty());
        }

        let mut good = TcpStream::connect(addr).await.unwrap();
        good.write_all(&[5, 1, 0]).await.unwrap();
        let mut reply = [0u8; 2];
        good.read_exact(&mut reply).await.unwrap();
        assert_eq!(reply, [5, 0]);

        handle.stop().await.unwrap();
    }
}

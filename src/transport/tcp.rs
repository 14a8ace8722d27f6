//! Plain TCP dialer

use super::{Dialer, SocketOpts};
use async_trait::async_trait;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::TcpStream;

/// Dials destinations over plain TCP
///
/// No connect timeout is applied; a destination that never answers holds
/// the session until the OS gives up.
#[derive(Debug, Clone, Default)]
pub struct TcpDialer {
    socket_opts: SocketOpts,
}

impl TcpDialer {
    /// Create a new TCP dialer with the given socket options
    pub fn new(socket_opts: SocketOpts) -> Self {
        TcpDialer { socket_opts }
    }

    /// Socket options applied to dialed streams
    pub fn socket_opts(&self) -> &SocketOpts {
        &self.socket_opts
    }
}

#[async_trait]
impl Dialer for TcpDialer {
    type Stream = TcpStream;

    async fn dial(&self, target: &str) -> io::Result<TcpStream> {
        let stream = match local_target(target) {
            Some(addrs) => TcpStream::connect(&addrs[..]).await?,
            None => TcpStream::connect(target).await?,
        };

        if let Err(e) = self.socket_opts.apply(&stream) {
            tracing::warn!("Failed to apply socket options to {}: {}", target, e);
        }

        tracing::debug!("TCP connection established to {}", target);

        Ok(stream)
    }
}

/// Loopback addresses for a target with an empty host (`:port`)
///
/// An empty host names the local system, IPv4 first.
fn local_target(target: &str) -> Option<[SocketAddr; 2]> {
    let port = target.strip_prefix(':')?.parse::<u16>().ok()?;
    Some([
        SocketAddr::from((Ipv4Addr::LOCALHOST, port)),
        SocketAddr::from((Ipv6Addr::LOCALHOST, port)),
    ])
}

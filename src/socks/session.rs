//! Per-connection SOCKS5 session
//!
//! A [`Session`] owns the client stream and walks it through negotiation,
//! request parsing, dialing and relay. States only move forward.

use super::auth::negotiate;
use super::command::{read_address, read_port, read_request_header, send_success};
use super::relay::{relay_tcp, RelayOutcome};
use super::types::TargetAddr;
use crate::error::{SessionError, SessionResult};
use crate::transport::Dialer;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, trace};

/// Progress of a session, in the order states are entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionState {
    /// Waiting for the greeting
    Negotiating,
    /// Waiting for VER CMD RSV ATYP
    AwaitRequestHeader,
    /// Waiting for DST.ADDR
    AwaitAddress,
    /// Waiting for DST.PORT
    AwaitPort,
    /// Connecting to the destination
    Dialing,
    /// Success reply written
    Replied,
    /// Bytes flowing in both directions
    Relaying,
}

/// One accepted client connection
#[derive(Debug)]
pub struct Session<S> {
    client: S,
    state: SessionState,
    target: Option<TargetAddr>,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    /// Start a session on an accepted client stream
    pub fn new(client: S) -> Self {
        Session {
            client,
            state: SessionState::Negotiating,
            target: None,
        }
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Destination requested by the client, once parsed
    pub fn target(&self) -> Option<&TargetAddr> {
        self.target.as_ref()
    }

    fn advance(&mut self, next: SessionState) {
        debug_assert!(
            next > self.state,
            "session state must move forward: {:?} -> {:?}",
            self.state,
            next
        );
        trace!("Session state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Run the greeting exchange
    pub async fn negotiate(&mut self) -> SessionResult<()> {
        negotiate(&mut self.client).await?;
        self.advance(SessionState::AwaitRequestHeader);
        Ok(())
    }

    /// Parse the CONNECT request, dial the destination and acknowledge
    ///
    /// On a dial failure no reply is written; the caller drops the session
    /// and the client sees the connection close.
    pub async fn resolve<D: Dialer>(&mut self, dialer: &D) -> SessionResult<D::Stream> {
        let (command, addr_type) = read_request_header(&mut self.client).await?;
        self.advance(SessionState::AwaitAddress);

        let addr = read_address(&mut self.client, addr_type).await?;
        self.advance(SessionState::AwaitPort);

        let port = read_port(&mut self.client).await?;
        let target = TargetAddr::new(addr, port);
        let host_port = target.to_host_port();
        debug!("SOCKS5 {} request to {}", command, host_port);
        self.target = Some(target);
        self.advance(SessionState::Dialing);

        let remote = dialer
            .dial(&host_port)
            .await
            .map_err(|e| SessionError::dial(host_port.as_str(), e))?;

        send_success(&mut self.client).await?;
        self.advance(SessionState::Replied);

        info!("SOCKS5 tunnel established to {}", host_port);

        Ok(remote)
    }

    /// Relay until either side closes; both streams are closed on return
    pub async fn relay<T>(mut self, remote: T) -> RelayOutcome
    where
        T: AsyncRead + AsyncWrite + Send + 'static,
    {
        self.advance(SessionState::Relaying);
        relay_tcp(self.client, remote).await
    }

    /// Drive the whole session to completion
    pub async fn run<D: Dialer>(mut self, dialer: &D) -> SessionResult<RelayOutcome> {
        self.negotiate().await?;
        let remote = self.resolve(dialer).await?;
        Ok(self.relay(remote).await)
    }
}

//! Error types for Socksgate
//!
//! Session failures fall into three buckets: protocol violations, plain I/O
//! failures on the client stream, and failures to reach the destination.

use std::io;
use thiserror::Error;

/// SOCKS5 protocol violations detected while parsing the handshake
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Socks5Error {
    /// Unsupported SOCKS version
    #[error("Unsupported SOCKS version: {0}")]
    UnsupportedVersion(u8),

    /// Command not supported
    #[error("Command not supported: {0}")]
    CommandNotSupported(u8),

    /// Address type not supported
    #[error("Address type not supported: {0}")]
    AddressTypeNotSupported(u8),

    /// Unknown address type
    #[error("Invalid address type: {0}")]
    InvalidAddressType(u8),
}

/// Terminal failure of a single proxy session
#[derive(Error, Debug)]
pub enum SessionError {
    /// Malformed or unsupported header field
    #[error("Protocol error: {0}")]
    Protocol(#[from] Socks5Error),

    /// Short read, short write or early close on the client stream
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Destination could not be reached
    #[error("Failed to dial {target}: {source}")]
    Dial {
        /// The `host:port` string that was dialed
        target: String,
        /// Underlying connect error
        #[source]
        source: io::Error,
    },
}

impl SessionError {
    /// Build a dial error for the given target
    pub fn dial(target: impl Into<String>, source: io::Error) -> Self {
        SessionError::Dial {
            target: target.into(),
            source,
        }
    }

    /// Short label used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            SessionError::Protocol(_) => "protocol",
            SessionError::Io(_) => "io",
            SessionError::Dial { .. } => "dial",
        }
    }
}

/// Result alias for session operations
pub type SessionResult<T> = std::result::Result<T, SessionError>;

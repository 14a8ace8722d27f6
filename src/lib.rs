//! # Socksgate - Local SOCKS5 Forward Proxy
//!
//! Socksgate accepts SOCKS5 clients on a single TCP listener, connects to the
//! destination each client asks for, and relays bytes in both directions
//! until either side closes.
//!
//! ## Features
//!
//! - **No-auth handshake**: the greeting is always answered with method `0x00`
//! - **CONNECT only**: IPv4 and domain-name destinations
//! - **Raw relay**: no protocol inspection after the handshake
//! - **One task per connection**: sessions share nothing but the listener
//!
//! ## Usage
//!
//! ```rust,ignore
//! use socksgate::config::ServerConfig;
//! use socksgate::server::Server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::with_listen_addr("127.0.0.1:1080");
//!     let handle = Server::bind(&config).await?.spawn();
//!     println!("listening on {}", handle.local_addr());
//!
//!     tokio::signal::ctrl_c().await?;
//!     handle.stop().await
//! }
//! ```
//!
//! ## Wire subset
//!
//! ```text
//! greeting  05 NMETHODS METHODS..     -> 05 00
//! request   05 01 00 ATYP ADDR PORT   -> 05 00 00 01 00 00 00 00 00 00
//! ```
//!
//! Failures never produce an error reply; the client connection is closed.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod server;
pub mod socks;
pub mod transport;

// Re-export commonly used items
pub use config::{load_config, Config, ServerConfig};
pub use error::{SessionError, Socks5Error};
pub use server::{Server, ServerHandle};

/// Version of the Socksgate library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the application
pub const NAME: &str = env!("CARGO_PKG_NAME");

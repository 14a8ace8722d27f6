//! SOCKS5 module for Socksgate
//!
//! Implements the no-auth CONNECT subset of SOCKS5: greeting negotiation,
//! request parsing, destination dial, the fixed success reply and the
//! bidirectional relay that follows.

mod auth;
mod command;
mod consts;
mod handler;
mod relay;
mod session;
mod types;

pub use auth::negotiate;
pub use command::{read_address, read_port, read_request_header, send_success, SUCCESS_REPLY};
pub use consts::*;
pub use handler::handle_connection;
pub use relay::{relay_tcp, Direction, RelayOutcome};
pub use session::{Session, SessionState};
pub use types::{AddrType, Address, SocksCommand, TargetAddr};

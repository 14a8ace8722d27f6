//! SOCKS5 request parsing and replies

mod parser;
mod reply;

pub use parser::{read_address, read_port, read_request_header};
pub use reply::{send_success, SUCCESS_REPLY};

//! SOCKS5 reply
//!
//! Only the success reply exists. Failures close the connection without an
//! error frame.

use crate::socks::consts::*;
use std::io;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Fixed success reply
///
/// # SOCKS5 Reply Format
///
/// ```text
/// +----+-----+-------+------+----------+----------+
/// |VER | REP |  RSV  | ATYP | BND.ADDR | BND.PORT |
/// +----+-----+-------+------+----------+----------+
/// | 1  |  1  | X'00' |  1   | 0.0.0.0  |    0     |
/// +----+-----+-------+------+----------+----------+
/// ```
///
/// BND.ADDR and BND.PORT are always zero, not the dialer's local address.
pub const SUCCESS_REPLY: [u8; 10] = [
    SOCKS5_VERSION,
    SOCKS5_REPLY_SUCCEEDED,
    SOCKS5_RESERVED,
    SOCKS5_ADDR_TYPE_IPV4,
    0,
    0,
    0,
    0,
    0,
    0,
];

/// Send the fixed success reply
pub async fn send_success<S>(stream: &mut S) -> io::Result<()>
where
    S: AsyncWrite + Unpin,
{
    stream.write_all(&SUCCESS_REPLY).await?;
    stream.flush().await
}

//! SOCKS5 method negotiation
//!
//! Only "no authentication" is ever selected.

use super::consts::*;
use crate::error::{SessionResult, Socks5Error};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// Consume the client greeting and select "no authentication"
///
/// # SOCKS5 Greeting Format
///
/// ```text
/// +----+----------+----------+
/// |VER | NMETHODS | METHODS  |
/// +----+----------+----------+
/// | 1  |    1     | 1 to 255 |
/// +----+----------+----------+
/// ```
///
/// The reply is always `[0x05, 0x00]`, even when the client did not offer
/// method `0x00`. On a version mismatch nothing is written.
///
/// # Returns
///
/// The method identifiers the client offered
pub async fn negotiate<S>(stream: &mut S) -> SessionResult<Vec<u8>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut buf = [0u8; 2];
    stream.read_exact(&mut buf).await?;

    let version = buf[0];
    let num_methods = buf[1];

    if version != SOCKS5_VERSION {
        return Err(Socks5Error::UnsupportedVersion(version).into());
    }

    let mut methods = vec![0u8; num_methods as usize];
    stream.read_exact(&mut methods).await?;

    debug!("Client offered auth methods: {:?}", methods);

    stream
        .write_all(&[SOCKS5_VERSION, SOCKS5_AUTH_METHOD_NONE])
        .await?;
    stream.flush().await?;

    Ok(methods)
}

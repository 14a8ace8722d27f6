//! SOCKS5 request parser
//!
//! Parses CONNECT requests from the client in three steps (header, address,
//! port) so the caller can track progress through the session states.

use crate::error::{SessionResult, Socks5Error};
use crate::socks::consts::*;
use crate::socks::types::{AddrType, Address, SocksCommand};
use std::net::Ipv4Addr;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Read and validate the fixed request header
///
/// # SOCKS5 Request Format
///
/// ```text
/// +----+-----+-------+------+----------+----------+
/// |VER | CMD |  RSV  | ATYP | DST.ADDR | DST.PORT |
/// +----+-----+-------+------+----------+----------+
/// | 1  |  1  | X'00' |  1   | Variable |    2     |
/// +----+-----+-------+------+----------+----------+
/// ```
///
/// Only CONNECT is accepted. The reserved byte is ignored. An IPv6 ATYP
/// passes here and is rejected by [`read_address`].
pub async fn read_request_header<S>(stream: &mut S) -> SessionResult<(SocksCommand, AddrType)>
where
    S: AsyncRead + Unpin,
{
    let mut header = [0u8; 4];
    stream.read_exact(&mut header).await?;

    let version = header[0];
    let cmd_byte = header[1];
    let _reserved = header[2];
    let addr_type = header[3];

    if version != SOCKS5_VERSION {
        return Err(Socks5Error::UnsupportedVersion(version).into());
    }

    let command = match SocksCommand::from_byte(cmd_byte) {
        Some(SocksCommand::Connect) => SocksCommand::Connect,
        _ => return Err(Socks5Error::CommandNotSupported(cmd_byte).into()),
    };

    let addr_type =
        AddrType::from_byte(addr_type).ok_or(Socks5Error::InvalidAddressType(addr_type))?;

    tracing::debug!(
        "Request header: cmd={}, atyp={:?}",
        command,
        addr_type
    );

    Ok((command, addr_type))
}

/// Read the DST.ADDR field for the given address type
///
/// An IPv6 address type is rejected without consuming any bytes.
pub async fn read_address<S>(stream: &mut S, addr_type: AddrType) -> SessionResult<Address>
where
    S: AsyncRead + Unpin,
{
    match addr_type {
        AddrType::Ipv4 => {
            let mut addr = [0u8; 4];
            stream.read_exact(&mut addr).await?;
            Ok(Address::Ipv4(Ipv4Addr::from(addr)))
        }

        AddrType::Domain => {
            let domain_len = stream.read_u8().await? as usize;

            // Zero is allowed and yields an empty host
            let mut domain = vec![0u8; domain_len];
            stream.read_exact(&mut domain).await?;
            Ok(Address::Domain(domain))
        }

        AddrType::Ipv6 => Err(Socks5Error::AddressTypeNotSupported(SOCKS5_ADDR_TYPE_IPV6).into()),
    }
}

/// Read the big-endian DST.PORT field
pub async fn read_port<S>(stream: &mut S) -> SessionResult<u16>
where
    S: AsyncRead + Unpin,
{
    Ok(stream.read_u16().await?)
}

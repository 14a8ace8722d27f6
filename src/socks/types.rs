//! SOCKS5 type definitions
//!
//! Defines the core types used in SOCKS5 protocol handling.

use super::consts::*;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// SOCKS5 command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocksCommand {
    /// TCP CONNECT - establish a TCP connection to target
    Connect,
    /// TCP BIND - recognized but never served
    Bind,
    /// UDP ASSOCIATE - recognized but never served
    UdpAssociate,
}

impl SocksCommand {
    /// Parse a command byte into SocksCommand
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            SOCKS5_CMD_TCP_CONNECT => Some(SocksCommand::Connect),
            SOCKS5_CMD_TCP_BIND => Some(SocksCommand::Bind),
            SOCKS5_CMD_UDP_ASSOCIATE => Some(SocksCommand::UdpAssociate),
            _ => None,
        }
    }
}

impl fmt::Display for SocksCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocksCommand::Connect => write!(f, "CONNECT"),
            SocksCommand::Bind => write!(f, "BIND"),
            SocksCommand::UdpAssociate => write!(f, "UDP ASSOCIATE"),
        }
    }
}

/// The ATYP field of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrType {
    /// Raw 4-byte IPv4 address
    Ipv4,
    /// Length-prefixed domain name
    Domain,
    /// Raw 16-byte IPv6 address
    Ipv6,
}

impl AddrType {
    /// Parse an ATYP byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            SOCKS5_ADDR_TYPE_IPV4 => Some(AddrType::Ipv4),
            SOCKS5_ADDR_TYPE_DOMAIN => Some(AddrType::Domain),
            SOCKS5_ADDR_TYPE_IPV6 => Some(AddrType::Ipv6),
            _ => None,
        }
    }
}

/// Destination host as read off the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    /// IPv4 address
    Ipv4(Ipv4Addr),
    /// Domain name bytes, kept verbatim
    Domain(Vec<u8>),
    /// IPv6 address. The parser never produces this variant.
    Ipv6(Ipv6Addr),
}

impl Address {
    /// Render the host part of a `host:port` dial string
    ///
    /// Domain bytes that are not valid UTF-8 are replaced lossily; such a
    /// host will fail to resolve at dial time.
    pub fn host(&self) -> String {
        match self {
            Address::Ipv4(ip) => ip.to_string(),
            Address::Domain(name) => String::from_utf8_lossy(name).into_owned(),
            Address::Ipv6(ip) => ip.to_string(),
        }
    }
}

/// Destination of a CONNECT request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetAddr {
    /// Destination host
    pub addr: Address,
    /// Destination port
    pub port: u16,
}

impl TargetAddr {
    /// Create a new TargetAddr
    pub fn new(addr: Address, port: u16) -> Self {
        TargetAddr { addr, port }
    }

    /// Compose the `host:port` string handed to the dialer
    pub fn to_host_port(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TargetAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.addr {
            Address::Ipv6(_) => write!(f, "[{}]:{}", self.addr.host(), self.port),
            _ => write!(f, "{}:{}", self.addr.host(), self.port),
        }
    }
}

//! Server configuration types

use serde::{Deserialize, Serialize};

/// Listen address used when none is configured
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:10801";

fn default_listen_addr() -> String {
    DEFAULT_LISTEN_ADDR.to_string()
}

/// Root configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Proxy server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

/// Proxy server configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    /// Address the SOCKS5 listener binds to (e.g., "127.0.0.1:1080")
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Socket options for accepted and dialed connections
    #[serde(default)]
    pub tcp: TcpConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen_addr: default_listen_addr(),
            tcp: TcpConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create a configuration listening on the given address
    pub fn with_listen_addr(addr: impl Into<String>) -> Self {
        ServerConfig {
            listen_addr: addr.into(),
            ..Default::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        let (host, port) = self
            .listen_addr
            .rsplit_once(':')
            .ok_or_else(|| format!("listen_addr must be host:port, got {:?}", self.listen_addr))?;

        if port.parse::<u16>().is_err() {
            return Err(format!("Invalid port in listen_addr: {:?}", port));
        }
        if host.is_empty() {
            return Err("listen_addr has an empty host".to_string());
        }
        Ok(())
    }
}

fn default_nodelay() -> bool {
    true
}

fn default_keepalive_secs() -> u64 {
    20
}

fn default_keepalive_interval() -> u64 {
    8
}

/// TCP socket configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TcpConfig {
    /// Enable TCP_NODELAY
    #[serde(default = "default_nodelay")]
    pub nodelay: bool,

    /// TCP keepalive idle time in seconds
    #[serde(default = "default_keepalive_secs")]
    pub keepalive_secs: u64,

    /// TCP keepalive probe interval in seconds
    #[serde(default = "default_keepalive_interval")]
    pub keepalive_interval: u64,
}

impl Default for TcpConfig {
    fn default() -> Self {
        TcpConfig {
            nodelay: default_nodelay(),
            keepalive_secs: default_keepalive_secs(),
            keepalive_interval: default_keepalive_interval(),
        }
    }
}

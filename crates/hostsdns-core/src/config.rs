//! Configuration types for the hosts-file provider
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Default hosts file location
pub const DEFAULT_HOSTS_PATH: &str = "/etc/hosts";

/// Default listen port for the webhook
pub const DEFAULT_PORT: u16 = 8888;

/// Main webhook configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Address the HTTP server binds to
    #[serde(default = "default_listen_address")]
    pub listen_address: IpAddr,

    /// Port the HTTP server binds to (0 picks an ephemeral port)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Where records live
    #[serde(default)]
    pub store: RecordStoreConfig,
}

impl WebhookConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self {
            listen_address: default_listen_address(),
            port: default_port(),
            store: RecordStoreConfig::default(),
        }
    }

    /// Set the store configuration
    pub fn with_store(mut self, store: RecordStoreConfig) -> Self {
        self.store = store;
        self
    }

    /// Set the listen address and port
    pub fn with_listen(mut self, address: IpAddr, port: u16) -> Self {
        self.listen_address = address;
        self.port = port;
        self
    }

    /// Socket address the server binds to
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.listen_address, self.port)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.store.validate()
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn default_listen_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// How the file store replaces the hosts file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteMode {
    /// Write a sibling temp file, then rename it over the target
    #[default]
    Atomic,
    /// Truncate and rewrite the target (bind-mounted files)
    InPlace,
}

impl std::str::FromStr for WriteMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "atomic" => Ok(Self::Atomic),
            "in-place" | "inplace" | "in_place" => Ok(Self::InPlace),
            other => Err(crate::Error::config(format!(
                "unknown write mode '{}'. Supported modes: atomic, in-place",
                other
            ))),
        }
    }
}

/// Record store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordStoreConfig {
    /// The hosts file on disk
    File {
        /// Path to the hosts file
        path: String,
        /// How updates are written
        #[serde(default)]
        write_mode: WriteMode,
    },

    /// In-memory document (nothing is persisted)
    Memory {
        /// Initial hosts-file text
        #[serde(default)]
        initial: String,
    },
}

impl RecordStoreConfig {
    /// Validate the store configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            RecordStoreConfig::File { path, .. } => {
                if path.trim().is_empty() {
                    return Err(crate::Error::config("hosts file path cannot be empty"));
                }
                Ok(())
            }
            RecordStoreConfig::Memory { .. } => Ok(()),
        }
    }

    /// Get the store type name
    pub fn type_name(&self) -> &'static str {
        match self {
            RecordStoreConfig::File { .. } => "file",
            RecordStoreConfig::Memory { .. } => "memory",
        }
    }
}

impl Default for RecordStoreConfig {
    fn default() -> Self {
        RecordStoreConfig::File {
            path: DEFAULT_HOSTS_PATH.to_string(),
            write_mode: WriteMode::default(),
        }
    }
}

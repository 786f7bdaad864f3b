//! Configuration types for the host directory
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

use crate::store::{FileRecordStore, MemoryRecordStore};
use crate::traits::RecordStore;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostdirConfig {
    /// Backing store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Optional line-protocol server settings
    #[serde(default)]
    pub server: ServerConfig,
}

impl HostdirConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file
    pub async fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, crate::Error> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            crate::Error::config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.store.validate()?;
        self.server.validate()?;
        Ok(())
    }
}

/// Backing store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// Line-oriented text file
    File {
        /// Path to the store file
        path: String,
    },

    /// In-memory store (not persistent)
    Memory {
        /// Initial lines, in store format
        #[serde(default)]
        lines: Vec<String>,
    },
}

impl StoreConfig {
    /// Validate the store configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            StoreConfig::File { path } => {
                if path.trim().is_empty() {
                    return Err(crate::Error::config("Store file path cannot be empty"));
                }
                Ok(())
            }
            StoreConfig::Memory { .. } => Ok(()),
        }
    }

    /// Get the store type name
    pub fn type_name(&self) -> &str {
        match self {
            StoreConfig::File { .. } => "file",
            StoreConfig::Memory { .. } => "memory",
        }
    }

    /// Create the configured store
    pub async fn build(&self) -> Result<Box<dyn RecordStore>, crate::Error> {
        self.validate()?;
        match self {
            StoreConfig::File { path } => Ok(Box::new(FileRecordStore::new(path).await?)),
            StoreConfig::Memory { lines } => {
                Ok(Box::new(MemoryRecordStore::from_lines(lines.iter().cloned())))
            }
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::File {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> String {
    "dns.txt".to_string()
}

/// Line-protocol server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on (e.g. "127.0.0.1:5353"); interactive mode if unset
    #[serde(default)]
    pub listen_addr: Option<String>,

    /// Longest accepted command line, in bytes
    #[serde(default = "default_max_line_bytes")]
    pub max_line_bytes: usize,
}

impl ServerConfig {
    /// Validate the server configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.max_line_bytes == 0 {
            return Err(crate::Error::config("max_line_bytes must be > 0"));
        }
        if let Some(addr) = &self.listen_addr {
            addr.parse::<SocketAddr>().map_err(|e| {
                crate::Error::config(format!("Invalid listen address '{}': {}", addr, e))
            })?;
        }
        Ok(())
    }

    /// The parsed listen address, if one is configured
    pub fn socket_addr(&self) -> Result<Option<SocketAddr>, crate::Error> {
        self.validate()?;
        Ok(self
            .listen_addr
            .as_deref()
            .and_then(|addr| addr.parse().ok()))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: None,
            max_line_bytes: default_max_line_bytes(),
        }
    }
}

fn default_max_line_bytes() -> usize {
    1024
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HostdirConfig::new();
        assert_eq!(config.store.type_name(), "file");
        assert_eq!(config.server.max_line_bytes, 1024);
        assert!(config.server.listen_addr.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_deserialize_memory_store() {
        let json = r#"{
            "store": { "type": "memory", "lines": ["www.uvsq.fr 193.51.31.90"] },
            "server": { "listen_addr": "127.0.0.1:5353" }
        }"#;
        let config: HostdirConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.store.type_name(), "memory");
        assert_eq!(config.server.max_line_bytes, 1024);
        assert_eq!(
            config.server.socket_addr().unwrap(),
            Some("127.0.0.1:5353".parse().unwrap())
        );
    }

    #[test]
    fn test_validation_errors() {
        let empty_path = StoreConfig::File {
            path: "  ".to_string(),
        };
        assert!(matches!(empty_path.validate(), Err(crate::Error::Config(_))));

        let bad_addr = ServerConfig {
            listen_addr: Some("not-an-address".to_string()),
            ..ServerConfig::default()
        };
        assert!(bad_addr.validate().is_err());

        let zero_limit = ServerConfig {
            listen_addr: None,
            max_line_bytes: 0,
        };
        assert!(zero_limit.validate().is_err());
    }

    #[tokio::test]
    async fn test_build_memory_store() {
        let config = StoreConfig::Memory {
            lines: vec!["www.uvsq.fr 193.51.31.90".to_string()],
        };
        let store = config.build().await.unwrap();
        assert_eq!(store.read_lines().await.unwrap().len(), 1);
        assert_eq!(store.describe(), "memory");
    }

    #[tokio::test]
    async fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hostdir.json");
        tokio::fs::write(&path, r#"{ "store": { "type": "file", "path": "/tmp/dns.txt" } }"#)
            .await
            .unwrap();

        let config = HostdirConfig::from_json_file(&path).await.unwrap();
        assert!(matches!(config.store, StoreConfig::File { ref path } if path == "/tmp/dns.txt"));
        assert!(config.server.listen_addr.is_none());
    }
}

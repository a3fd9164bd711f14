use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::storage::{ContactRegistry, UnknownIdPolicy};
use crate::transport::{TransportConfig, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SOCKET_PATH};

/// Top-level configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub server: ServerOptions,
    #[serde(default)]
    pub registry: RegistryOptions,
}

/// Listener and logging options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerOptions {
    #[serde(default)]
    pub transport: TransportKind,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Only used when `transport` is `unix`
    #[serde(default = "default_socket_path")]
    pub socket_path: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Transport selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    #[default]
    Tcp,
    Unix,
}

/// Registry behaviour options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryOptions {
    #[serde(default)]
    pub unknown_id_policy: UnknownIdPolicy,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            transport: TransportKind::default(),
            host: default_host(),
            port: default_port(),
            socket_path: default_socket_path(),
            log_level: default_log_level(),
        }
    }
}

impl RegistryConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        Self::load_from_string(&content)
    }

    /// Load configuration from a YAML string
    pub fn load_from_string(content: &str) -> Result<Self> {
        let config: RegistryConfig = serde_yaml::from_str(content)
            .context("Failed to parse YAML configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let server = &self.server;

        match server.transport {
            TransportKind::Tcp => {
                if server.port == 0 {
                    return Err(anyhow!("Port must be between 1 and 65535, got: {}", server.port));
                }
                if server.host.trim().is_empty() {
                    return Err(anyhow!("Host cannot be empty"));
                }
            }
            TransportKind::Unix => {
                if !cfg!(unix) {
                    return Err(anyhow!("Unix socket transport is not supported on this platform"));
                }
                if server.socket_path.trim().is_empty() {
                    return Err(anyhow!("Socket path cannot be empty for unix transport"));
                }
            }
        }

        match server.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(anyhow!(
                "Invalid log level: {}, must be one of: trace, debug, info, warn, error",
                server.log_level
            )),
        }
    }

    /// Builds the transport described by the server options
    pub fn transport(&self) -> Result<TransportConfig> {
        let server = &self.server;
        match server.transport {
            TransportKind::Tcp => Ok(TransportConfig::tcp_on(server.host.clone(), server.port)),

            #[cfg(unix)]
            TransportKind::Unix => Ok(TransportConfig::unix_socket(&server.socket_path)),

            #[cfg(not(unix))]
            TransportKind::Unix => Err(anyhow!("Unix socket transport is not supported on this platform")),
        }
    }

    /// Builds an empty registry with the configured policy
    pub fn build_registry(&self) -> ContactRegistry {
        ContactRegistry::with_policy(self.registry.unknown_id_policy)
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_socket_path() -> String {
    DEFAULT_SOCKET_PATH.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = RegistryConfig::load_from_string("{}").unwrap();

        assert_eq!(config, RegistryConfig::default());
        assert_eq!(config.transport().unwrap(), TransportConfig::tcp(9027));
        assert_eq!(config.registry.unknown_id_policy, UnknownIdPolicy::Create);
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
server:
  transport: tcp
  host: 0.0.0.0
  port: 9100
  log_level: debug
registry:
  unknown_id_policy: reject
"#;
        let config = RegistryConfig::load_from_string(yaml).unwrap();

        assert_eq!(config.transport().unwrap(), TransportConfig::tcp_on("0.0.0.0", 9100));
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(
            config.build_registry().unknown_id_policy(),
            UnknownIdPolicy::Reject
        );
    }

    #[test]
    #[cfg(unix)]
    fn test_unix_transport() {
        let yaml = r#"
server:
  transport: unix
  socket_path: /tmp/contacts-test.sock
"#;
        let config = RegistryConfig::load_from_string(yaml).unwrap();
        assert_eq!(
            config.transport().unwrap(),
            TransportConfig::unix_socket("/tmp/contacts-test.sock")
        );
    }

    #[test]
    fn test_rejects_zero_port() {
        let err = RegistryConfig::load_from_string("server:\n  port: 0\n").unwrap_err();
        assert!(err.to_string().contains("Port must be between"));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let err = RegistryConfig::load_from_string("server:\n  log_level: loud\n").unwrap_err();
        assert!(err.to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_rejects_unknown_policy() {
        let result = RegistryConfig::load_from_string("registry:\n  unknown_id_policy: ignore\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server:\n  port: 9200").unwrap();

        let config = RegistryConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 9200);
    }

    #[test]
    fn test_load_missing_file() {
        let err = RegistryConfig::load_from_file("/nonexistent/contacts.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}

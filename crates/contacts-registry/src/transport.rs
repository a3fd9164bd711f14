//! Transport layer for the contacts registry.
//!
//! # Rust Learning Note
//!
//! This module demonstrates **platform-specific code** in Rust.
//!
//! ## Conditional Compilation
//!
//! ```ignore
//! #[cfg(unix)]
//! UnixSocket { path: PathBuf },
//! ```
//!
//! The `UnixSocket` variant only exists on Unix targets. Code that matches
//! on it must carry the same `#[cfg(unix)]`, and the compiler checks that
//! every platform still handles every variant it has.

#[cfg(unix)]
use std::path::PathBuf;

/// Host the server binds to by default.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Port the server binds to by default.
pub const DEFAULT_PORT: u16 = 9027;

/// Default Unix socket path.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/contacts-registry.sock";

/// Transport configuration for the registry server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportConfig {
    /// TCP socket on the given host and port.
    Tcp { host: String, port: u16 },

    /// Unix domain socket (Unix only).
    #[cfg(unix)]
    UnixSocket { path: PathBuf },
}

impl TransportConfig {
    /// Creates a TCP transport config bound to the default host.
    pub fn tcp(port: u16) -> Self {
        Self::tcp_on(DEFAULT_HOST, port)
    }

    /// Creates a TCP transport config bound to a specific host.
    pub fn tcp_on(host: impl Into<String>, port: u16) -> Self {
        Self::Tcp {
            host: host.into(),
            port,
        }
    }

    /// Creates a Unix domain socket config (Unix only).
    #[cfg(unix)]
    pub fn unix_socket(path: impl Into<PathBuf>) -> Self {
        Self::UnixSocket { path: path.into() }
    }

    /// Returns a human-readable description of the transport.
    pub fn describe(&self) -> String {
        match self {
            TransportConfig::Tcp { host, port } => format!("TCP on {}:{}", host, port),

            #[cfg(unix)]
            TransportConfig::UnixSocket { path } => {
                format!("Unix domain socket at {}", path.display())
            }
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::tcp(DEFAULT_PORT)
    }
}

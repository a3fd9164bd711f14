//! Contacts registry server implementation.
//!
//! # Rust Learning Note
//!
//! This module shows how to build a **complete async server** in Rust.
//!
//! ## Key Concepts
//!
//! 1. **Tokio Runtime**: The async executor that drives every connection
//! 2. **Graceful Shutdown**: Serve until a future resolves, then drain
//! 3. **Binding to Different Transports**: TCP, UDS

use crate::{api::create_router, storage::ContactRegistry, transport::TransportConfig};
use axum::Router;
use contacts_common::Result;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[cfg(unix)]
use tokio::net::UnixListener;

/// Contacts registry server.
///
/// # Rust Learning Note
///
/// ## Struct with Shared State
///
/// - `Arc<ContactRegistry>`: Shared ownership with the router's handlers
/// - `Router`: axum's router (contains all HTTP handlers)
///
/// The registry is passed in rather than created here, so whoever builds
/// the server decides which registry it serves and can keep a handle to it.
pub struct ContactsServer {
    registry: Arc<ContactRegistry>,
    transport: TransportConfig,
    router: Router,
}

impl ContactsServer {
    /// Creates a new server exposing `registry` over `transport`.
    pub fn new(registry: Arc<ContactRegistry>, transport: TransportConfig) -> Self {
        let router = create_router(Arc::clone(&registry));

        Self {
            registry,
            transport,
            router,
        }
    }

    /// Returns a reference to the registry.
    pub fn registry(&self) -> &Arc<ContactRegistry> {
        &self.registry
    }

    /// Returns the transport this server binds to.
    pub fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    /// Starts the server and runs until the process ends.
    pub async fn run(self) -> Result<()> {
        self.run_until_shutdown(std::future::pending()).await
    }

    /// Starts the server and runs until `shutdown` resolves.
    ///
    /// # Rust Learning Note
    ///
    /// ## Graceful Shutdown
    ///
    /// ```ignore
    /// axum::serve(listener, router)
    ///     .with_graceful_shutdown(shutdown)
    ///     .await?;
    /// ```
    ///
    /// Once `shutdown` completes the listener stops accepting, in-flight
    /// requests finish, and then `serve` returns.
    pub async fn run_until_shutdown<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Starting contacts registry: {}", self.transport.describe());

        // Clone transport config to avoid borrowing issues
        let transport = self.transport.clone();

        match transport {
            TransportConfig::Tcp { host, port } => {
                self.run_tcp(&host, port, shutdown).await?;
            }

            #[cfg(unix)]
            TransportConfig::UnixSocket { path } => {
                self.run_unix_socket(&path, shutdown).await?;
            }
        }

        info!("Contacts registry stopped");
        Ok(())
    }

    /// Runs the server on a TCP socket.
    async fn run_tcp<F>(self, host: &str, port: u16, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = format!("{}:{}", host, port);
        info!("Binding to TCP: {}", addr);

        let listener = TcpListener::bind(&addr).await?;
        info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }

    /// Runs the server on a Unix domain socket.
    ///
    /// A leftover socket file from an earlier run is removed before
    /// binding, and the file is removed again on a clean shutdown.
    #[cfg(unix)]
    async fn run_unix_socket<F>(self, path: &std::path::Path, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Binding to Unix socket: {}", path.display());

        // Remove old socket file if it exists
        if path.exists() {
            std::fs::remove_file(path)?;
        }

        let listener = UnixListener::bind(path)?;
        info!("Server listening on {}", path.display());

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        if path.exists() {
            std::fs::remove_file(path)?;
        }

        Ok(())
    }
}

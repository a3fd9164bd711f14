//! Standalone contacts registry server.
//!
//! Usage:
//!
//! ```text
//! contacts-registry                         # TCP on 127.0.0.1:9027
//! contacts-registry --port 9100             # TCP on another port
//! contacts-registry --config registry.yaml  # settings from a YAML file
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use contacts_registry::{ContactsServer, RegistryConfig};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Contacts directory registry server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path (YAML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// TCP port to listen on (overrides config, forces TCP transport)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => RegistryConfig::load_from_file(path)?,
        None => RegistryConfig::default(),
    };

    // Override port if specified
    if let Some(port) = args.port {
        config.server.transport = contacts_registry::config::TransportKind::Tcp;
        config.server.port = port;
        config.validate()?;
    }

    let level = if args.debug { "debug" } else { config.server.log_level.as_str() };
    initialize_logging(level);

    if let Some(path) = &args.config {
        info!("Config file: {}", path);
    }

    // One registry for the whole process, handed to the server
    let registry = Arc::new(config.build_registry());
    info!("Unknown id policy: {:?}", registry.unknown_id_policy());

    let transport = config.transport()?;
    let server = ContactsServer::new(registry, transport);

    info!("Contacts registry starting...");
    info!("Press Ctrl+C to stop");

    server
        .run_until_shutdown(shutdown_signal())
        .await
        .context("Contacts registry failed")?;

    Ok(())
}

fn initialize_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_target(false)
        .with_thread_ids(true)
        .init();
}

async fn shutdown_signal() {
    use tokio::signal;

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM signal"),
                    _ = sigint.recv() => info!("Received SIGINT signal"),
                }
                return;
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!("Failed to install Unix signal handlers, falling back to Ctrl+C: {}", e);
            }
        }
    }

    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C signal");
}

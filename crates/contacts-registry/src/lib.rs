//! # Contacts Registry
//! 
//! The authoritative, concurrency-safe store of contact records.
//! 
//! This crate provides:
//! - In-memory registry storage (one mutex over the id counter and the map)
//! - HTTP API for upserting, fetching and streaming contacts
//! - Transport configuration (TCP, Unix Domain Sockets)
//! - YAML configuration and a standalone server executable

pub mod storage;
pub mod api;
pub mod transport;
pub mod server;
pub mod config;

// Re-export commonly used items
pub use contacts_common::{Contact, ContactId};
pub use storage::{ContactRegistry, ContactSnapshot, UnknownIdPolicy};
pub use server::ContactsServer;
pub use config::RegistryConfig;

//! # Contacts Client
//! 
//! Client side of the contacts registry HTTP API.
//! 
//! This crate provides:
//! - `ContactsClient`: upsert, get, list and health calls over pooled HTTP
//! - `ContactStreamDecoder`: incremental decoder for the NDJSON list stream

pub mod client;
pub mod stream;

// Re-export commonly used items
pub use client::{ContactsClient, DEFAULT_BASE_URL};
pub use stream::ContactStreamDecoder;

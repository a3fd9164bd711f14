//! # Contacts Common
//! 
//! Types shared by the contacts registry, its HTTP binding and the client.
//! 
//! This crate provides:
//! - The `Contact` record and its `ContactId`
//! - Wire messages exchanged over the HTTP API
//! - The error type used across the workspace

pub mod errors;
pub mod types;

// Re-export commonly used items
pub use errors::{Error, Result, ResultExt};
pub use types::{Contact, ContactId, ErrorResponse, GetContactResponse};

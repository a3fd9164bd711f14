//! Error types for the contacts directory.
//! 
//! # Rust Learning Note
//! 
//! Rust doesn't have exceptions - it uses `Result<T, E>` for error handling.
//! 
//! Note what is *not* in here: a "contact not found" outcome of a lookup.
//! A lookup miss is ordinary data and is returned as `Option::None`. The
//! `ContactNotFound` variant exists only for upserts that name an unknown id
//! while the registry is configured to reject them.
//! 
//! ```rust
//! use contacts_common::{ContactId, Error, Result};
//! 
//! fn update(id: ContactId) -> Result<()> {
//!     Err(Error::contact_not_found(id))
//! }
//! 
//! fn caller() -> Result<()> {
//!     // The ? operator propagates the error to our caller
//!     update(ContactId::new(7))?;
//!     Ok(())
//! }
//! 
//! assert!(caller().is_err());
//! ```

use thiserror::Error;
use crate::types::ContactId;

/// Result type alias for contacts operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for contacts operations.
/// 
/// # Rust Learning Note
/// 
/// We use the `thiserror` crate to derive `std::error::Error` and `Display`.
/// Each variant can carry additional context data, and callers can
/// pattern match on the exact failure.
#[derive(Debug, Error)]
pub enum Error {
    /// An upsert named an identifier the registry has never stored.
    #[error("Contact not found: {id}")]
    ContactNotFound {
        id: ContactId,
    },

    /// Transport or wire-format failure (connection refused, bad JSON, ...).
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Internal error (shouldn't happen in normal operation).
    #[error("Internal error: {0}")]
    Internal(String),

    /// I/O error (wraps std::io::Error).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context.
    #[error("{message}: {source}")]
    WithContext {
        message: String,
        source: Box<Error>,
    },
}

impl Error {
    /// Creates a ContactNotFound error.
    pub fn contact_not_found(id: ContactId) -> Self {
        Self::ContactNotFound { id }
    }

    /// Creates a Protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// Adds context to an error.
    /// 
    /// # Example
    /// ```
    /// use contacts_common::{Error, Result};
    /// 
    /// fn inner() -> Result<()> {
    ///     Err(Error::protocol("connection refused"))
    /// }
    /// 
    /// fn outer() -> Result<()> {
    ///     inner().map_err(|e| e.context("Failed to list contacts"))
    /// }
    /// 
    /// assert!(outer().unwrap_err().to_string().starts_with("Failed to list contacts"));
    /// ```
    pub fn context(self, message: impl Into<String>) -> Self {
        Self::WithContext {
            message: message.into(),
            source: Box::new(self),
        }
    }
}

// Convenience methods for Result types
pub trait ResultExt<T> {
    /// Adds context to an error result.
    fn context(self, message: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(message))
    }
}

//! Core domain types for the contacts directory.
//!
//! # Rust Learning Note
//!
//! Optional fields are `Option<T>`, so "never set" and "set to an empty
//! string" stay different values all the way through the wire format:
//!
//! ```rust
//! use contacts_common::Contact;
//!
//! let unset = Contact::new("Paul", "Appleseed");
//! let empty = Contact::new("Paul", "Appleseed").with_company("");
//!
//! assert_eq!(unset.company, None);
//! assert_eq!(empty.company.as_deref(), Some(""));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Registry-assigned contact identifier.
///
/// # Example
/// ```
/// use contacts_common::ContactId;
///
/// let id = ContactId::new(1);
/// assert_eq!(id.get(), 1);
/// assert_eq!(id.to_string(), "1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(i64);

impl ContactId {
    /// Creates a new ContactId from its raw value.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for ContactId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl FromStr for ContactId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A contact record.
///
/// `id` is `None` until the registry assigns one. After that it is the
/// record's key and never changes.
///
/// # Rust Learning Note
///
/// ## skip_serializing_if
///
/// ```ignore
/// #[serde(skip_serializing_if = "Option::is_none")]
/// pub company: Option<String>,
/// ```
///
/// An absent company is left out of the JSON entirely instead of being
/// written as `null` or `""`. On the way back in, a missing key becomes
/// `None` again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Registry-assigned identifier (absent before the first upsert).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ContactId>,

    /// Given name.
    pub name: String,

    /// Family name.
    pub surname: String,

    /// Company, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    /// Email addresses in the order they were given.
    #[serde(default)]
    pub emails: Vec<String>,
}

impl Contact {
    /// Creates a contact with no id, no company and no emails.
    pub fn new(name: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            surname: surname.into(),
            company: None,
            emails: Vec::new(),
        }
    }

    /// Sets the identifier, turning an upsert of this contact into an update.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(ContactId::new(id));
        self
    }

    /// Sets the company. An empty string is kept as given, not treated as absent.
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Appends an email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.emails.push(email.into());
        self
    }
}

/// Response from looking up a single contact.
///
/// A miss is `{}`: the lookup succeeded and found nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetContactResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
}

impl From<Option<Contact>> for GetContactResponse {
    fn from(contact: Option<Contact>) -> Self {
        Self { contact }
    }
}

/// Error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

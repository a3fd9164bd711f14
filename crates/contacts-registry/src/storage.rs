//! In-memory storage for the contacts registry.
//!
//! # Rust Learning Note
//!
//! This module demonstrates **one lock over several pieces of state**.
//!
//! ## Why not DashMap?
//!
//! A sharded concurrent map locks each key on its own. Minting an id needs
//! the counter and the map to change together: read the counter, bump it,
//! and store the record, with nobody in between. So both live in one
//! struct behind one `Mutex`:
//!
//! ```ignore
//! struct RegistryState {
//!     last_id: i64,
//!     contacts: HashMap<ContactId, Contact>,
//! }
//!
//! let mut state = self.state.lock();   // one gate for everything
//! let id = state.last_id + 1;
//! state.last_id = id;
//! state.contacts.insert(ContactId::new(id), contact);
//! // guard dropped here, lock released
//! ```
//!
//! ## parking_lot::Mutex
//!
//! - No lock poisoning: `lock()` returns the guard directly, no `unwrap()`
//! - Smaller and faster than `std::sync::Mutex` under contention
//!
//! ## Values in, values out
//!
//! Records are cloned on the way in and on the way out. A caller that
//! mutates its copy never changes what other callers see.

use contacts_common::{Contact, ContactId, Error, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// What an upsert does when it names an id the registry has never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownIdPolicy {
    /// Store the record under the given id. The id counter is left alone,
    /// so a later insert may mint the same id and overwrite it.
    #[default]
    Create,

    /// Fail with `Error::ContactNotFound` and leave the registry unchanged.
    Reject,
}

/// State guarded by the registry's single lock.
#[derive(Debug, Default)]
struct RegistryState {
    /// Last identifier minted by an insert. 0 means none yet.
    last_id: i64,
    contacts: HashMap<ContactId, Contact>,
}

/// Thread-safe in-memory contact registry.
///
/// # Rust Learning Note
///
/// ## Interior Mutability
///
/// Every method takes `&self`, not `&mut self`. The `Mutex` gives us
/// mutation through a shared reference, so the registry can be wrapped in
/// an `Arc` and handed to as many tasks as needed:
///
/// ```rust
/// use contacts_registry::{Contact, ContactRegistry};
/// use std::sync::Arc;
///
/// let registry = Arc::new(ContactRegistry::new());
/// let stored = registry.upsert(Contact::new("Paul", "Appleseed")).unwrap();
///
/// assert_eq!(stored.id.map(|id| id.get()), Some(1));
/// assert_eq!(registry.get(stored.id.unwrap()), Some(stored));
/// ```
#[derive(Debug, Default)]
pub struct ContactRegistry {
    state: Mutex<RegistryState>,
    unknown_id_policy: UnknownIdPolicy,
}

/// Outcome of an upsert, logged after the lock is released.
enum Upserted {
    Inserted,
    Updated { replaced: bool },
    Rejected,
}

impl ContactRegistry {
    /// Creates a new empty registry that creates records for unknown ids.
    pub fn new() -> Self {
        Self::with_policy(UnknownIdPolicy::default())
    }

    /// Creates a new empty registry with the given unknown-id policy.
    pub fn with_policy(unknown_id_policy: UnknownIdPolicy) -> Self {
        Self {
            state: Mutex::new(RegistryState::default()),
            unknown_id_policy,
        }
    }

    /// Returns the unknown-id policy this registry was built with.
    pub fn unknown_id_policy(&self) -> UnknownIdPolicy {
        self.unknown_id_policy
    }

    /// Inserts or updates a contact.
    ///
    /// - `id` absent: mints the next id, stamps it on the contact and stores
    ///   it. Counter bump and map write happen under the same lock hold, so
    ///   concurrent inserts get distinct, increasing ids.
    /// - `id` present: replaces whatever is stored under that id. The counter
    ///   is not read. An id with no stored record is handled according to
    ///   the registry's [`UnknownIdPolicy`].
    ///
    /// Returns the contact as stored, with `id` always set.
    pub fn upsert(&self, mut contact: Contact) -> Result<Contact> {
        let (id, outcome) = {
            let mut state = self.state.lock();
            match contact.id {
                Some(id) => {
                    let exists = state.contacts.contains_key(&id);
                    if !exists && self.unknown_id_policy == UnknownIdPolicy::Reject {
                        (id, Upserted::Rejected)
                    } else {
                        state.contacts.insert(id, contact.clone());
                        (id, Upserted::Updated { replaced: exists })
                    }
                }
                None => {
                    let next = state.last_id.checked_add(1).ok_or_else(|| {
                        Error::Internal("contact identifier space exhausted".to_string())
                    })?;
                    let id = ContactId::new(next);
                    state.last_id = next;
                    contact.id = Some(id);
                    state.contacts.insert(id, contact.clone());
                    (id, Upserted::Inserted)
                }
            }
        };

        match outcome {
            Upserted::Inserted => info!("Registered new contact: {}", id),
            Upserted::Updated { replaced: true } => debug!("Updated contact: {}", id),
            Upserted::Updated { replaced: false } => {
                info!("Created contact under caller-supplied id: {}", id)
            }
            Upserted::Rejected => {
                warn!("Rejected upsert for unknown contact: {}", id);
                return Err(Error::contact_not_found(id));
            }
        }

        Ok(contact)
    }

    /// Looks up a contact by id.
    ///
    /// A miss is `None`, not an error.
    pub fn get(&self, id: ContactId) -> Option<Contact> {
        let found = self.state.lock().contacts.get(&id).cloned();
        debug!("Get contact {}: {}", id, if found.is_some() { "hit" } else { "miss" });
        found
    }

    /// Returns every stored contact as a point-in-time snapshot.
    ///
    /// # Rust Learning Note
    ///
    /// ## Snapshot, then iterate
    ///
    /// The records are cloned while the lock is held, then the lock is
    /// released and the caller walks the copy at its own pace. Handing out
    /// an iterator over the live map would keep the lock for as long as the
    /// caller takes (a slow network client, say), or expose state that
    /// is being changed underneath it.
    ///
    /// Order is whatever the internal `HashMap` yields. It is not insertion
    /// order; callers that need an order must sort.
    pub fn list(&self) -> ContactSnapshot {
        let contacts: Vec<Contact> = self.state.lock().contacts.values().cloned().collect();
        debug!("Listing {} contacts", contacts.len());
        ContactSnapshot {
            inner: contacts.into_iter(),
        }
    }

    /// Returns the number of stored contacts.
    pub fn len(&self) -> usize {
        self.state.lock().contacts.len()
    }

    /// Returns true if no contact is stored.
    pub fn is_empty(&self) -> bool {
        self.state.lock().contacts.is_empty()
    }

    /// Returns the last identifier minted by an insert, if any.
    pub fn last_assigned_id(&self) -> Option<ContactId> {
        match self.state.lock().last_id {
            0 => None,
            id => Some(ContactId::new(id)),
        }
    }
}

/// Lazy sequence of contacts captured by [`ContactRegistry::list`].
///
/// Owns its records; the registry can change freely while this is consumed.
#[derive(Debug)]
pub struct ContactSnapshot {
    inner: std::vec::IntoIter<Contact>,
}

impl Iterator for ContactSnapshot {
    type Item = Contact;

    fn next(&mut self) -> Option<Contact> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for ContactSnapshot {}

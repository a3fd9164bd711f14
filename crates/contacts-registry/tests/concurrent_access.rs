//! Registry behaviour under concurrent callers.

use contacts_registry::{Contact, ContactId, ContactRegistry};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

fn fresh(i: usize) -> Contact {
    Contact::new(format!("name-{}", i), "Concurrent").with_email(format!("c{}@example.com", i))
}

#[test]
fn test_hundred_concurrent_inserts_get_distinct_ids() {
    let registry = Arc::new(ContactRegistry::new());

    let handles: Vec<_> = (0..100)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || registry.upsert(fresh(i)).unwrap().id.unwrap())
        })
        .collect();

    let assigned: HashSet<ContactId> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(assigned.len(), 100);

    let mut listed: Vec<i64> = registry.list().map(|c| c.id.unwrap().get()).collect();
    listed.sort_unstable();
    assert_eq!(listed, (1..=100).collect::<Vec<_>>());
    assert_eq!(registry.last_assigned_id(), Some(ContactId::new(100)));
}

#[test]
fn test_ids_increase_in_completion_order() {
    let registry = Arc::new(ContactRegistry::new());

    // Within one thread every insert completes before the next begins
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                (0..50)
                    .map(|i| registry.upsert(fresh(t * 50 + i)).unwrap().id.unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        let ids = handle.join().unwrap();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]), "ids not increasing: {:?}", ids);
    }
    assert_eq!(registry.len(), 400);
}

/// A record whose every field encodes the same version number.
fn versioned(version: usize) -> Contact {
    Contact::new(format!("v{}", version), format!("v{}", version))
        .with_company(format!("v{}", version))
        .with_email(format!("v{}@example.com", version))
        .with_id(1)
}

fn assert_not_torn(contact: &Contact) {
    let version = &contact.name;
    assert_eq!(&contact.surname, version);
    assert_eq!(contact.company.as_ref(), Some(version));
    assert_eq!(contact.emails, vec![format!("{}@example.com", version)]);
}

#[test]
fn test_readers_never_observe_partial_updates() {
    let registry = Arc::new(ContactRegistry::new());
    registry.upsert(versioned(0)).unwrap();

    let writer = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || {
            for version in 1..=2_000 {
                registry.upsert(versioned(version)).unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for _ in 0..500 {
                    for contact in registry.list() {
                        assert_not_torn(&contact);
                    }
                    let contact = registry.get(ContactId::new(1)).unwrap();
                    assert_not_torn(&contact);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    // Last writer wins
    assert_eq!(registry.get(ContactId::new(1)).unwrap(), versioned(2_000));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.last_assigned_id(), None);
}

#[test]
fn test_inserts_and_updates_interleaved() {
    let registry = Arc::new(ContactRegistry::new());
    let seed = registry.upsert(fresh(0)).unwrap();

    let updater = {
        let registry = Arc::clone(&registry);
        let seed = seed.clone();
        thread::spawn(move || {
            for i in 0..200 {
                let update = Contact { name: format!("renamed-{}", i), ..seed.clone() };
                registry.upsert(update).unwrap();
            }
        })
    };

    let inserters: Vec<_> = (0..4)
        .map(|t| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for i in 0..25 {
                    registry.upsert(fresh(1 + t * 25 + i)).unwrap();
                }
            })
        })
        .collect();

    updater.join().unwrap();
    for inserter in inserters {
        inserter.join().unwrap();
    }

    // Updates never consumed an id
    assert_eq!(registry.len(), 101);
    assert_eq!(registry.last_assigned_id(), Some(ContactId::new(101)));
    assert_eq!(registry.get(ContactId::new(1)).unwrap().name, "renamed-199");
}

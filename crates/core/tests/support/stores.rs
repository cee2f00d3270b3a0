//! Mock port implementations for testing
//!
//! Provides in-memory mocks for the reconciliation ports, enabling
//! deterministic engine tests without database dependencies. Both mocks
//! count their calls and can be switched to fail on demand so tests can
//! observe write batching and error wrapping.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use medmatch_core::reconcile::{AssociationStore, TagCatalog};
use medmatch_domain::{
    MedMatchError, Result as DomainResult, TagEntry, TagId, TagKind, TagLink,
};
use uuid::Uuid;

/// In-memory mock for `TagCatalog`.
///
/// Resolves names against a fixed set of entries and counts resolve calls so
/// tests can assert that resolution is skipped for empty desired sets.
#[derive(Default)]
pub struct MockCatalog {
    entries: Vec<(TagKind, TagEntry)>,
    resolve_calls: AtomicUsize,
    fail_resolve: bool,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience helper for seeding a single catalog entry.
    pub fn with_entry(mut self, kind: TagKind, id: TagId, name: &str) -> Self {
        self.entries.push((kind, TagEntry::new(id, name)));
        self
    }

    /// Make every resolve call fail with a database error.
    pub fn with_failing_resolve(mut self) -> Self {
        self.fail_resolve = true;
        self
    }

    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }
}

impl TagCatalog for MockCatalog {
    fn resolve(&self, kind: TagKind, names: &[String]) -> DomainResult<Vec<TagEntry>> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_resolve {
            return Err(MedMatchError::Database("injected resolve failure".into()));
        }

        Ok(self
            .entries
            .iter()
            .filter(|(entry_kind, entry)| *entry_kind == kind && names.contains(&entry.name))
            .map(|(_, entry)| entry.clone())
            .collect())
    }
}

/// In-memory mock for `AssociationStore`.
///
/// Keeps links in a map keyed by `(user, tag)` and enforces the store
/// contract: duplicate inserts and updates of missing rows error. Each write
/// method counts its calls and can be switched to fail.
pub struct MockAssociationStore<A> {
    links: Mutex<BTreeMap<(Uuid, TagId), A>>,
    insert_calls: AtomicUsize,
    update_calls: AtomicUsize,
    remove_calls: AtomicUsize,
    fail_find: bool,
    fail_insert: bool,
    fail_update: bool,
    fail_remove: bool,
}

impl<A> Default for MockAssociationStore<A> {
    fn default() -> Self {
        Self {
            links: Mutex::new(BTreeMap::new()),
            insert_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            remove_calls: AtomicUsize::new(0),
            fail_find: false,
            fail_insert: false,
            fail_update: false,
            fail_remove: false,
        }
    }
}

impl<A: Clone + PartialEq> MockAssociationStore<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with links for one user.
    pub fn with_links(user_id: Uuid, pairs: Vec<(TagId, A)>) -> Self {
        let store = Self::default();
        {
            let mut links = store.links.lock().expect("links mutex poisoned");
            for (tag_id, attr) in pairs {
                links.insert((user_id, tag_id), attr);
            }
        }
        store
    }

    pub fn with_failing_find(mut self) -> Self {
        self.fail_find = true;
        self
    }

    pub fn with_failing_inserts(mut self) -> Self {
        self.fail_insert = true;
        self
    }

    pub fn with_failing_updates(mut self) -> Self {
        self.fail_update = true;
        self
    }

    pub fn with_failing_removes(mut self) -> Self {
        self.fail_remove = true;
        self
    }

    /// Snapshot of one user's links, keyed by tag id.
    pub fn links_of(&self, user_id: Uuid) -> BTreeMap<TagId, A> {
        self.links
            .lock()
            .expect("links mutex poisoned")
            .iter()
            .filter(|((user, _), _)| *user == user_id)
            .map(|((_, tag_id), attr)| (*tag_id, attr.clone()))
            .collect()
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn remove_calls(&self) -> usize {
        self.remove_calls.load(Ordering::SeqCst)
    }

    /// Total write calls issued against the store.
    pub fn write_calls(&self) -> usize {
        self.insert_calls() + self.update_calls() + self.remove_calls()
    }
}

impl<A: Clone + PartialEq> AssociationStore for MockAssociationStore<A> {
    type Attr = A;

    fn find_by_user(&self, user_id: Uuid) -> DomainResult<Vec<TagLink<A>>> {
        if self.fail_find {
            return Err(MedMatchError::Database("injected find failure".into()));
        }

        Ok(self
            .links
            .lock()
            .expect("links mutex poisoned")
            .iter()
            .filter(|((user, _), _)| *user == user_id)
            .map(|((_, tag_id), attr)| TagLink { user_id, tag_id: *tag_id, attr: attr.clone() })
            .collect())
    }

    fn insert_many(&self, user_id: Uuid, new_links: &[(TagId, A)]) -> DomainResult<()> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_insert {
            return Err(MedMatchError::Database("injected insert failure".into()));
        }

        let mut links = self.links.lock().expect("links mutex poisoned");
        for (tag_id, attr) in new_links {
            if links.insert((user_id, *tag_id), attr.clone()).is_some() {
                return Err(MedMatchError::Database(format!(
                    "duplicate association for tag {tag_id}"
                )));
            }
        }
        Ok(())
    }

    fn update_attribute(&self, user_id: Uuid, tag_id: TagId, attr: &A) -> DomainResult<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_update {
            return Err(MedMatchError::Database("injected update failure".into()));
        }

        let mut links = self.links.lock().expect("links mutex poisoned");
        match links.get_mut(&(user_id, tag_id)) {
            Some(existing) => {
                *existing = attr.clone();
                Ok(())
            }
            None => Err(MedMatchError::Database(format!("no association for tag {tag_id}"))),
        }
    }

    fn remove_many(&self, user_id: Uuid, tag_ids: &[TagId]) -> DomainResult<()> {
        self.remove_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_remove {
            return Err(MedMatchError::Database("injected remove failure".into()));
        }

        let mut links = self.links.lock().expect("links mutex poisoned");
        for tag_id in tag_ids {
            links.remove(&(user_id, *tag_id));
        }
        Ok(())
    }
}

//! Port interfaces for tag reconciliation
//!
//! These traits define the boundaries between the reconciliation engine
//! and the persistence layer. Implementations execute against a
//! caller-supplied transaction context and never open transactions of their
//! own; atomicity belongs to the service driving the engine.

use medmatch_domain::{Result, TagEntry, TagId, TagKind, TagLink};
use uuid::Uuid;

/// Read-only name resolution against the tag catalog
pub trait TagCatalog {
    /// Resolve catalog names to `{id, name}` entries.
    ///
    /// Names absent from the catalog are silently omitted from the result;
    /// an unresolvable name is not an error.
    fn resolve(&self, kind: TagKind, names: &[String]) -> Result<Vec<TagEntry>>;
}

/// Persistence operations for one tag dimension of user associations
pub trait AssociationStore {
    /// Per-association payload: `()` for interests, `Proficiency` for
    /// languages.
    type Attr: Clone + PartialEq;

    /// Fetch all associations of the user, in stable order.
    fn find_by_user(&self, user_id: Uuid) -> Result<Vec<TagLink<Self::Attr>>>;

    /// Insert associations; a duplicate (user, tag) pair is a persistence
    /// error.
    fn insert_many(&self, user_id: Uuid, links: &[(TagId, Self::Attr)]) -> Result<()>;

    /// Replace the attribute of one existing association; errors if no row
    /// matched.
    fn update_attribute(&self, user_id: Uuid, tag_id: TagId, attr: &Self::Attr) -> Result<()>;

    /// Delete the associations with the given tag ids.
    fn remove_many(&self, user_id: Uuid, tag_ids: &[TagId]) -> Result<()>;
}

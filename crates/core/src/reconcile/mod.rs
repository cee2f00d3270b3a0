//! Tag association reconciliation
//!
//! Converts a user's desired set of tags (names, optionally carrying an
//! attribute such as language proficiency) into the minimal set of writes
//! against the persisted associations: additions, in-place attribute updates,
//! and removals. The engine is stateless and runs entirely inside whatever
//! transaction the calling service opened.

pub mod engine;
pub mod plan;
pub mod ports;

pub use engine::{reconcile, DesiredTags, ReconcileOutcome};
pub use plan::ReconcilePlan;
pub use ports::{AssociationStore, TagCatalog};

//! # MedMatch Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The tag reconciliation engine (diff + driver)
//! - Port/adapter interfaces (traits)
//!
//! ## Architecture Principles
//! - Only depends on `medmatch-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod profile;
pub mod reconcile;

// Re-export specific items to avoid ambiguity
pub use profile::ports::ProfileDirectory;
pub use reconcile::ports::{AssociationStore, TagCatalog};
pub use reconcile::{reconcile, DesiredTags, ReconcileOutcome, ReconcilePlan};

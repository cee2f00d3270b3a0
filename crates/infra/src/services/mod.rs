//! Service layer implementations.
//!
//! Services provide the async application surface on top of the blocking
//! repositories and the reconciliation engine.

pub mod catalog_service;
pub mod profile_service;

pub use catalog_service::CatalogService;
pub use profile_service::ProfileService;

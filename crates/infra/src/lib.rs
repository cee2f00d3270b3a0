//! # MedMatch Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The SQLite connection pool and schema management
//! - Repositories and the reconciliation store adapters
//! - The transactional profile and catalog services
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `medmatch-core`
//! - Depends on `medmatch-domain` and `medmatch-core`
//! - Contains all "impure" code (I/O, SQL)

pub mod config;
pub mod database;
pub mod errors;
pub mod services;

// Re-export commonly used items
pub use database::*;
pub use errors::*;
pub use services::*;

//! # MedMatch Domain
//!
//! Business domain types and models for MedMatch.
//!
//! This crate contains:
//! - Domain data types (UserProfile, TagEntry, etc.)
//! - Domain error types and Result definitions
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other MedMatch crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;

//! Database implementations

pub mod association_store;
pub mod catalog_repository;
pub mod manager;
pub mod user_repository;

pub use association_store::*;
pub use catalog_repository::*;
pub use manager::*;
pub use user_repository::*;

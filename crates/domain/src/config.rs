//! Application configuration structures
//!
//! Deserialized from config files (JSON or TOML) or assembled from
//! environment variables by the infrastructure loader.

use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
}

/// Database connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: String,
    /// Maximum number of pooled connections
    pub pool_size: u32,
}

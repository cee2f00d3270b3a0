//! Profile directory port

pub mod ports;

pub use ports::ProfileDirectory;

//! Shared test helpers for `medmatch-core` integration tests.
//!
//! These helpers provide in-memory mocks of the reconciliation ports so the
//! engine tests can focus on behaviour instead of boilerplate.

pub mod stores;

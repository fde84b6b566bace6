//! Shared helpers for retry integration tests.

pub mod script;

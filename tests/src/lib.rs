//! Shared helpers for whisperbox integration tests.

pub mod fixtures;
pub mod setup;

//! SQLite persistence for whisperbox.
//!
//! Append-mostly: the contract is single-row inserts into `messages` and
//! `analytics_events`, plus a bounded newest-first read for the admin surface.
//! No updates or deletes.

pub mod client;
pub mod config;
pub mod insert;
pub mod query;
pub mod schema;

pub use client::MessageStore;
pub use config::StoreConfig;

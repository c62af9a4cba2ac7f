//! Storage module
//!
//! The narrow port the paginator reads through, plus an in-memory adapter.
//!
//! # Overview
//!
//! A feed store partitions rows by calendar day and can only page through
//! one partition at a time. Each page may carry a native resume token that
//! is valid for that partition alone. The DuckDB adapter lives in
//! `crate::database`.

mod memory;
pub mod token;
mod types;

pub use memory::InMemoryFeedStore;
pub use types::{FeedStore, StorePage};

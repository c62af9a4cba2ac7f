//! Feed storage via DuckDB
//!
//! This module provides a `FeedStore` backed by a DuckDB table of
//! day-partitioned rows, either in memory or in a database file.

mod engine;

pub use engine::DuckDbFeedStore;

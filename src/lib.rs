// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Bucketed Feed
//!
//! Cursor-based pagination over a feed whose rows are partitioned by
//! calendar day, newest day first.
//!
//! A traversal covers a fixed window of day buckets chosen when it starts.
//! Each page may span several buckets; the opaque cursor handed back to the
//! client records the window, the bucket being read, and the storage
//! backend's own resume token for that bucket.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bucketed_feed::{BucketedFeedPaginator, InMemoryFeedStore, Result};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let store = InMemoryFeedStore::from_seed_file("feed.json", Default::default())?;
//!     let paginator = BucketedFeedPaginator::new(Arc::new(store));
//!
//!     let mut cursor = None;
//!     loop {
//!         let page = paginator.get_page(cursor.as_deref(), 20).await?;
//!         for item in &page.items {
//!             println!("{} {}", item.timestamp, item.id);
//!         }
//!         match page.next_cursor {
//!             Some(next) => cursor = Some(next),
//!             None => break,
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    CLI  /  HTTP  (GET /feed)                    │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  BucketedFeedPaginator                                          │
//! │  get_page(cursor?, page_size) → FeedPage { items, next_cursor } │
//! └─────────────────────────────────────────────────────────────────┘
//!            │                                     │
//! ┌──────────┴───────────┐             ┌───────────┴───────────────┐
//! │ Cursor               │             │ FeedStore                 │
//! ├──────────────────────┤             ├───────────────────────────┤
//! │ Window (day buckets) │             │ InMemoryFeedStore         │
//! │ Codec  (wire string) │             │ DuckDbFeedStore           │
//! └──────────────────────┘             └───────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Bucket windows and the cursor wire format
pub mod cursor;

/// Storage port and the in-memory backend
pub mod store;

/// Feed storage backed by DuckDB
pub mod database;

/// Bucket-spanning pagination
pub mod pagination;

/// Feed configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{load_config, FeedConfig};
pub use cursor::{BucketCursor, CalendarPolicy, DayBucketSet};
pub use database::DuckDbFeedStore;
pub use pagination::{BucketedFeedPaginator, FeedPage, PaginatorConfig};
pub use store::{FeedStore, InMemoryFeedStore, StorePage};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

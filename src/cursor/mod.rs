//! Cursor module
//!
//! The composite paging token that carries a traversal between requests.
//!
//! # Overview
//!
//! The cursor module provides:
//! - `DayBucketSet` / `BucketCursor` - The window and position within it
//! - `encode` / `decode` - The stable string form handed to callers
//! - `build_initial_window` - A fresh window for a new traversal

pub mod codec;
mod types;
mod window;

pub use codec::{decode, encode};
pub use types::{BucketCursor, DayBucketSet, DAY_KEY_FORMAT, DEFAULT_WINDOW_DAYS};
pub use window::{build_initial_window, CalendarPolicy};

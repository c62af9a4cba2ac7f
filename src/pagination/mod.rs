//! Pagination module
//!
//! Newest-first paging across a window of day-partitioned buckets.
//!
//! # Overview
//!
//! The store can only page inside one day partition. The paginator visits
//! the buckets of a window in order, newest first, and concatenates their
//! pages until the requested page size is reached. A bucket's native resume
//! token is only ever replayed against that same bucket, and only as the
//! first query of a request.

mod bucketed;
mod types;

pub use bucketed::BucketedFeedPaginator;
pub use types::{FeedPage, PageExit, PageOutcome, PaginatorConfig};

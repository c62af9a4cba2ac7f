//! Storage port types and traits
//!
//! Defines the single-partition paged query every feed store must offer.

use crate::error::Result;
use crate::types::FeedItem;
use async_trait::async_trait;
use std::sync::Arc;

/// One page of rows from a single partition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorePage {
    /// Rows, newest first
    pub rows: Vec<FeedItem>,
    /// Resume token for the same partition, if more rows may follow
    pub continuation: Option<String>,
}

impl StorePage {
    /// Create a page
    pub fn new(rows: Vec<FeedItem>, continuation: Option<String>) -> Self {
        Self { rows, continuation }
    }

    /// Create an empty final page
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if the partition has more rows after this page
    pub fn has_more(&self) -> bool {
        self.continuation.is_some()
    }
}

/// Storage port for day-partitioned feed data
///
/// Implementations must return rows newest first within a partition, never
/// more than `page_size` of them, and must reject a resume token that was not
/// issued for `partition_key` with `Error::InvalidToken`.
#[async_trait]
pub trait FeedStore: Send + Sync {
    /// Query one page from a single partition
    async fn query_page(
        &self,
        partition_key: &str,
        page_size: usize,
        resume_token: Option<&str>,
    ) -> Result<StorePage>;
}

#[async_trait]
impl<S: FeedStore + ?Sized> FeedStore for Arc<S> {
    async fn query_page(
        &self,
        partition_key: &str,
        page_size: usize,
        resume_token: Option<&str>,
    ) -> Result<StorePage> {
        (**self)
            .query_page(partition_key, page_size, resume_token)
            .await
    }
}

//! Bucketed feed paginator
//!
//! Stitches single-partition store pages into one newest-first stream over
//! a fixed window of day buckets. Holds no per-traversal state: everything
//! needed to continue lives in the cursor string returned to the caller.

use super::types::{FeedPage, PageExit, PageOutcome, PaginatorConfig};
use crate::cursor::{build_initial_window, decode, BucketCursor};
use crate::error::{Error, Result};
use crate::store::FeedStore;
use chrono::{DateTime, Utc};
use futures::stream::{self, Stream};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Paginator over a day-partitioned feed store
#[derive(Clone)]
pub struct BucketedFeedPaginator {
    /// Storage port
    store: Arc<dyn FeedStore>,
    /// Window configuration
    config: PaginatorConfig,
}

impl BucketedFeedPaginator {
    /// Create a paginator with the default window
    pub fn new(store: Arc<dyn FeedStore>) -> Self {
        Self {
            store,
            config: PaginatorConfig::default(),
        }
    }

    /// Set paginator configuration
    #[must_use]
    pub fn with_config(mut self, config: PaginatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &PaginatorConfig {
        &self.config
    }

    /// Fetch the page after `raw_cursor`, or the first page of a fresh window
    pub async fn get_page(&self, raw_cursor: Option<&str>, page_size: usize) -> Result<FeedPage> {
        self.get_page_at(raw_cursor, page_size, Utc::now()).await
    }

    /// Same as `get_page`, with "now" supplied for a fresh window
    pub async fn get_page_at(
        &self,
        raw_cursor: Option<&str>,
        page_size: usize,
        now: DateTime<Utc>,
    ) -> Result<FeedPage> {
        let cursor = self.resolve_cursor(raw_cursor, now);
        let outcome = self.paginate(&cursor, page_size).await?;
        info!(
            "Served {} items from bucket {} ({:?})",
            outcome.items.len(),
            cursor.current_bucket_index(),
            outcome.exit
        );
        Ok(FeedPage::assemble(outcome))
    }

    /// Decode a caller cursor, falling back to a fresh window
    ///
    /// A missing or malformed cursor restarts the traversal rather than
    /// failing the request.
    pub fn resolve_cursor(&self, raw_cursor: Option<&str>, now: DateTime<Utc>) -> BucketCursor {
        if let Some(raw) = raw_cursor.filter(|raw| !raw.trim().is_empty()) {
            if let Some(cursor) = decode(raw, self.config.window_days) {
                return cursor;
            }
            warn!("Malformed feed cursor {:?}, starting a fresh window", raw);
        }
        build_initial_window(now, self.config.window_days, self.config.calendar)
    }

    /// Walk buckets from `cursor` until the page fills or the window ends
    ///
    /// The input cursor is never modified; a store failure leaves the caller
    /// free to retry with the same cursor.
    pub async fn paginate(&self, cursor: &BucketCursor, page_size: usize) -> Result<PageOutcome> {
        if page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be positive"));
        }

        let mut items = Vec::with_capacity(page_size);
        let mut position = cursor.clone();
        // Only the first query of a request may resume mid-bucket.
        let mut resume = cursor.resume_token();

        while let Some(bucket) = position.current_bucket() {
            let wanted = page_size - items.len();
            let token = resume.take();
            debug!(
                "Querying bucket {} [{}] for {} rows (resume: {})",
                bucket,
                position.current_bucket_index(),
                wanted,
                token.is_some()
            );

            let page = self.store.query_page(bucket, wanted, token).await?;
            if page.rows.len() > wanted {
                return Err(Error::store(
                    bucket,
                    format!("returned {} rows for a page of {wanted}", page.rows.len()),
                ));
            }
            items.extend(page.rows);

            if let Some(continuation) = page.continuation {
                if items.len() == page_size {
                    return Ok(PageOutcome {
                        items,
                        successor: position.resumed_at(continuation),
                        exit: PageExit::PageFull,
                    });
                }
            }

            position = position.advanced();
            if items.len() == page_size && !position.is_exhausted() {
                return Ok(PageOutcome {
                    items,
                    successor: position,
                    exit: PageExit::PageFull,
                });
            }
        }

        Ok(PageOutcome {
            items,
            successor: position,
            exit: PageExit::WindowExhausted,
        })
    }

    /// Stream every page of a fresh traversal until the window is exhausted
    pub fn pages(
        &self,
        page_size: usize,
        now: DateTime<Utc>,
    ) -> impl Stream<Item = Result<FeedPage>> + '_ {
        // `Some(cursor)` is the next request; `None` ends the stream.
        stream::try_unfold(Some(None::<String>), move |next| async move {
            let Some(raw_cursor) = next else {
                return Ok(None);
            };
            let page = self.get_page_at(raw_cursor.as_deref(), page_size, now).await?;
            let following = page.next_cursor.clone().map(Some);
            Ok::<_, Error>(Some((page, following)))
        })
    }
}

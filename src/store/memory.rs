//! In-memory feed store
//!
//! Partitions are kept sorted newest first; resume tokens carry a row
//! offset bound to the partition that issued them.

use super::token::{decode_token, encode_token, ensure_bound};
use super::types::{FeedStore, StorePage};
use crate::cursor::CalendarPolicy;
use crate::error::{Error, Result, ResultExt};
use crate::types::FeedItem;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Resume position inside one partition
#[derive(Debug, Serialize, Deserialize)]
struct OffsetPosition {
    partition: String,
    offset: usize,
}

/// Feed store backed by a map of day partitions
#[derive(Debug, Clone, Default)]
pub struct InMemoryFeedStore {
    partitions: HashMap<String, Vec<FeedItem>>,
}

impl InMemoryFeedStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from items, bucketed by their day under `calendar`
    pub fn from_items(items: impl IntoIterator<Item = FeedItem>, calendar: CalendarPolicy) -> Self {
        let mut store = Self::new();
        for item in items {
            store.insert(item, calendar);
        }
        store
    }

    /// Load a JSON array of items from a seed file
    pub fn from_seed_file(path: impl AsRef<Path>, calendar: CalendarPolicy) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        let items: Vec<FeedItem> = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid seed file {}", path.display()))?;
        tracing::debug!("Loaded {} seed items from {}", items.len(), path.display());
        Ok(Self::from_items(items, calendar))
    }

    /// Add an item to the partition of its day
    pub fn insert(&mut self, item: FeedItem, calendar: CalendarPolicy) {
        let key = calendar.day_key(item.timestamp);
        let rows = self.partitions.entry(key).or_default();
        rows.push(item);
        sort_newest_first(rows);
    }

    /// Replace a partition's rows directly
    #[must_use]
    pub fn with_partition(
        mut self,
        partition_key: impl Into<String>,
        mut rows: Vec<FeedItem>,
    ) -> Self {
        sort_newest_first(&mut rows);
        self.partitions.insert(partition_key.into(), rows);
        self
    }

    /// Number of rows stored in a partition
    pub fn partition_len(&self, partition_key: &str) -> usize {
        self.partitions.get(partition_key).map_or(0, Vec::len)
    }

    /// Total number of rows across partitions
    pub fn len(&self) -> usize {
        self.partitions.values().map(Vec::len).sum()
    }

    /// Check if the store holds no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn start_offset(
        &self,
        partition_key: &str,
        resume_token: Option<&str>,
        len: usize,
    ) -> Result<usize> {
        let Some(token) = resume_token else {
            return Ok(0);
        };
        let position: OffsetPosition = decode_token(partition_key, token)?;
        ensure_bound(partition_key, &position.partition)?;
        if position.offset > len {
            return Err(Error::invalid_token(
                partition_key,
                format!("offset {} is past the end of the partition", position.offset),
            ));
        }
        Ok(position.offset)
    }
}

#[async_trait]
impl FeedStore for InMemoryFeedStore {
    async fn query_page(
        &self,
        partition_key: &str,
        page_size: usize,
        resume_token: Option<&str>,
    ) -> Result<StorePage> {
        let rows = self
            .partitions
            .get(partition_key)
            .map_or(&[][..], Vec::as_slice);
        let start = self.start_offset(partition_key, resume_token, rows.len())?;
        let end = start.saturating_add(page_size).min(rows.len());

        let continuation = if end < rows.len() {
            Some(encode_token(&OffsetPosition {
                partition: partition_key.to_string(),
                offset: end,
            })?)
        } else {
            None
        };

        tracing::debug!(
            "Partition {} rows {}..{} of {}",
            partition_key,
            start,
            end,
            rows.len()
        );

        Ok(StorePage::new(rows[start..end].to_vec(), continuation))
    }
}

fn sort_newest_first(rows: &mut [FeedItem]) {
    rows.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| b.id.cmp(&a.id))
    });
}

//! DuckDB-backed feed store
//!
//! Rows live in one `feed_items` table keyed by day. Each partition is paged
//! by keyset on `(ts_ns, id)` descending, so a resume token only has to
//! remember the last row returned. Timestamps keep nanosecond precision so
//! row order matches the in-memory store.
//!
//! Every query runs on its own cloned connection. A query abandoned by a
//! timeout or a dropped request keeps only that clone busy.

use crate::cursor::CalendarPolicy;
use crate::error::{Error, Result};
use crate::store::token::{decode_token, encode_token, ensure_bound};
use crate::store::{FeedStore, StorePage};
use crate::types::{FeedItem, JsonObject};
use async_trait::async_trait;
use chrono::DateTime;
use duckdb::{params, Connection};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS feed_items (
    day VARCHAR NOT NULL,
    id VARCHAR NOT NULL,
    ts_ns BIGINT NOT NULL,
    metadata VARCHAR NOT NULL,
    PRIMARY KEY (day, id)
);";

/// Last row returned from a partition
#[derive(Debug, Clone, Serialize, Deserialize)]
struct KeysetPosition {
    partition: String,
    ts_ns: i64,
    id: String,
}

/// Feed store backed by a DuckDB database
#[derive(Clone)]
pub struct DuckDbFeedStore {
    /// Base connection; queries run on clones of it
    conn: Arc<Mutex<Connection>>,
    /// Database location (for logging)
    location: String,
    /// Optional per-query timeout
    query_timeout: Option<Duration>,
}

impl std::fmt::Debug for DuckDbFeedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckDbFeedStore")
            .field("location", &self.location)
            .field("query_timeout", &self.query_timeout)
            .finish_non_exhaustive()
    }
}

impl DuckDbFeedStore {
    /// Open an in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::config(format!("Failed to create DuckDB connection: {e}")))?;
        Self::from_connection(conn, ":memory:")
    }

    /// Open (or create) a database file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            Error::config(format!("Failed to open DuckDB at {}: {e}", path.display()))
        })?;
        Self::from_connection(conn, path.display().to_string())
    }

    fn from_connection(conn: Connection, location: impl Into<String>) -> Result<Self> {
        conn.execute_batch(CREATE_TABLE_SQL)?;
        let location = location.into();
        tracing::debug!("DuckDB feed store ready at {}", location);
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            location,
            query_timeout: None,
        })
    }

    /// Set a per-query timeout
    #[must_use]
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    /// Database location
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Load fixture rows, bucketed by their day under `calendar`
    ///
    /// Rows with an existing `(day, id)` are replaced.
    pub fn seed(&self, items: &[FeedItem], calendar: CalendarPolicy) -> Result<usize> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| Error::config("DuckDB connection lock poisoned"))?;

        let mut stmt = conn.prepare("INSERT OR REPLACE INTO feed_items VALUES (?, ?, ?, ?)")?;
        for item in items {
            let metadata = serde_json::to_string(&item.metadata)?;
            stmt.execute(params![
                calendar.day_key(item.timestamp),
                item.id,
                timestamp_nanos(item)?,
                metadata
            ])?;
        }

        tracing::debug!("Seeded {} rows into {}", items.len(), self.location);
        Ok(items.len())
    }

    /// Number of rows stored in a partition
    pub fn partition_len(&self, partition_key: &str) -> Result<usize> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| Error::store(partition_key, "DuckDB connection lock poisoned"))?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM feed_items WHERE day = ?",
            params![partition_key],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Open a fresh connection to the same database for one query
    fn query_connection(&self, partition_key: &str) -> Result<Connection> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| Error::store(partition_key, "DuckDB connection lock poisoned"))?;
        Ok(conn.try_clone()?)
    }
}

#[async_trait]
impl FeedStore for DuckDbFeedStore {
    async fn query_page(
        &self,
        partition_key: &str,
        page_size: usize,
        resume_token: Option<&str>,
    ) -> Result<StorePage> {
        let after = resume_token
            .map(|token| {
                let position: KeysetPosition = decode_token(partition_key, token)?;
                ensure_bound(partition_key, &position.partition)?;
                Ok::<_, Error>(position)
            })
            .transpose()?;

        let conn = self.query_connection(partition_key)?;
        let partition = partition_key.to_string();
        let task = tokio::task::spawn_blocking(move || {
            run_page_query(&conn, &partition, page_size, after.as_ref())
        });

        let joined = match self.query_timeout {
            Some(timeout) => tokio::time::timeout(timeout, task)
                .await
                .map_err(|_| Error::Timeout {
                    timeout_ms: timeout.as_millis() as u64,
                })?,
            None => task.await,
        };

        joined.map_err(|e| Error::store(partition_key, format!("query task failed: {e}")))?
    }
}

/// Fetch one page plus a probe row to learn whether more follow
fn run_page_query(
    conn: &Connection,
    partition: &str,
    page_size: usize,
    after: Option<&KeysetPosition>,
) -> Result<StorePage> {
    let probe = page_size.saturating_add(1);

    let raw_rows: Vec<(String, i64, String)> = match after {
        None => {
            let query = format!(
                "SELECT id, ts_ns, metadata FROM feed_items WHERE day = ? \
                 ORDER BY ts_ns DESC, id DESC LIMIT {probe}"
            );
            tracing::debug!("Executing query: {}", query);
            let mut stmt = conn.prepare(&query)?;
            let rows = stmt.query_map(params![partition], read_row)?;
            rows.collect::<std::result::Result<_, _>>()?
        }
        Some(position) => {
            let query = format!(
                "SELECT id, ts_ns, metadata FROM feed_items WHERE day = ? \
                 AND (ts_ns < ? OR (ts_ns = ? AND id < ?)) \
                 ORDER BY ts_ns DESC, id DESC LIMIT {probe}"
            );
            tracing::debug!("Executing query: {}", query);
            let mut stmt = conn.prepare(&query)?;
            let rows = stmt.query_map(
                params![partition, position.ts_ns, position.ts_ns, position.id],
                read_row,
            )?;
            rows.collect::<std::result::Result<_, _>>()?
        }
    };

    let has_more = raw_rows.len() > page_size;
    let mut rows = Vec::with_capacity(raw_rows.len().min(page_size));
    let mut last_key = None;
    for (id, ts_ns, metadata) in raw_rows.into_iter().take(page_size) {
        last_key = Some((ts_ns, id.clone()));
        rows.push(row_to_item(id, ts_ns, &metadata)?);
    }

    let continuation = match last_key {
        Some((ts_ns, id)) if has_more => Some(encode_token(&KeysetPosition {
            partition: partition.to_string(),
            ts_ns,
            id,
        })?),
        _ => None,
    };

    Ok(StorePage::new(rows, continuation))
}

fn read_row(row: &duckdb::Row<'_>) -> duckdb::Result<(String, i64, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn row_to_item(id: String, ts_ns: i64, metadata: &str) -> Result<FeedItem> {
    let timestamp = DateTime::from_timestamp_nanos(ts_ns);
    let metadata: JsonObject = serde_json::from_str(metadata)?;
    Ok(FeedItem {
        id,
        timestamp,
        metadata,
    })
}

fn timestamp_nanos(item: &FeedItem) -> Result<i64> {
    item.timestamp.timestamp_nanos_opt().ok_or_else(|| {
        Error::invalid_value(
            "timestamp",
            format!("item {} at {} is outside the storable range", item.id, item.timestamp),
        )
    })
}

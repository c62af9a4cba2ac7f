//! Common types used throughout bucketed-feed
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Feed Item
// ============================================================================

/// A single feed entry
///
/// The paginator never inspects an item beyond moving it into a page; the
/// timestamp only matters to stores, which must return rows newest-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    /// Item identifier
    pub id: String,
    /// Ordering timestamp
    pub timestamp: DateTime<Utc>,
    /// Arbitrary payload
    #[serde(default)]
    pub metadata: JsonObject,
}

impl FeedItem {
    /// Create an item with empty metadata
    pub fn new(id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            timestamp,
            metadata: JsonObject::new(),
        }
    }

    /// Add a metadata field
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

// ============================================================================
// Log Level
// ============================================================================

/// Log level for CLI and server output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_feed_item_builder() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap();
        let item = FeedItem::new("post-1", ts).with_field("author", "alice");

        assert_eq!(item.id, "post-1");
        assert_eq!(item.metadata.get("author"), Some(&json!("alice")));
    }

    #[test]
    fn test_feed_item_metadata_defaults_to_empty() {
        let item: FeedItem =
            serde_json::from_value(json!({"id": "a", "timestamp": "2024-01-05T00:00:00Z"}))
                .unwrap();
        assert!(item.metadata.is_empty());
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(tracing::Level::from(LogLevel::Debug), tracing::Level::DEBUG);
        assert_eq!(tracing::Level::from(LogLevel::Warn), tracing::Level::WARN);
    }
}

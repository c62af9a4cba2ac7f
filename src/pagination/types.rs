//! Pagination types
//!
//! Page results and paginator configuration.

use crate::cursor::{encode, BucketCursor, CalendarPolicy, DEFAULT_WINDOW_DAYS};
use crate::types::FeedItem;
use serde::{Deserialize, Serialize};

/// Why a page stopped growing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageExit {
    /// The page reached the requested size
    PageFull,
    /// Every bucket of the window has been consumed
    WindowExhausted,
}

impl PageExit {
    /// Check if the traversal is over
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::WindowExhausted)
    }
}

/// Raw result of walking the buckets for one request
#[derive(Debug, Clone, PartialEq)]
pub struct PageOutcome {
    /// Rows in bucket order
    pub items: Vec<FeedItem>,
    /// Where the next request resumes
    pub successor: BucketCursor,
    /// Stop reason
    pub exit: PageExit,
}

/// One page of the feed as handed to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedPage {
    /// Items, newest first
    pub items: Vec<FeedItem>,
    /// Opaque cursor for the next page; absent at the end of the feed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl FeedPage {
    /// Package an outcome, encoding the successor unless the window is exhausted
    pub fn assemble(outcome: PageOutcome) -> Self {
        let next_cursor = if outcome.exit.is_terminal() {
            None
        } else {
            Some(encode(&outcome.successor))
        };
        Self {
            items: outcome.items,
            next_cursor,
        }
    }

    /// Check if this is the final page
    pub fn is_last(&self) -> bool {
        self.next_cursor.is_none()
    }

    /// Number of items in the page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the page holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Configuration for the bucketed paginator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginatorConfig {
    /// Number of day buckets in a fresh window
    pub window_days: usize,
    /// Calendar used to compute "today"
    pub calendar: CalendarPolicy,
}

impl Default for PaginatorConfig {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            calendar: CalendarPolicy::Utc,
        }
    }
}

impl PaginatorConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set window length
    #[must_use]
    pub fn with_window_days(mut self, window_days: usize) -> Self {
        self.window_days = window_days;
        self
    }

    /// Set calendar policy
    #[must_use]
    pub fn with_calendar(mut self, calendar: CalendarPolicy) -> Self {
        self.calendar = calendar;
        self
    }
}

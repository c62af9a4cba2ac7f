//! Cursor types
//!
//! A traversal is pinned to a fixed window of day buckets. The cursor
//! records which bucket the next query targets and the store's resume
//! token inside that bucket.

use serde::Serialize;

/// Default number of day buckets in a window
pub const DEFAULT_WINDOW_DAYS: usize = 8;

/// chrono format for a bucket identifier
pub const DAY_KEY_FORMAT: &str = "%Y%m%d";

/// Ordered day identifiers, newest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DayBucketSet(Vec<String>);

impl DayBucketSet {
    /// Wrap day identifiers that are already ordered newest first
    pub fn new(days: Vec<String>) -> Self {
        Self(days)
    }

    /// Number of buckets in the window
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the window holds no buckets
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get a bucket identifier by position
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Iterate bucket identifiers newest first
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Borrow as a slice
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Composite paging position across a day window
///
/// Values are immutable: every transition returns a new cursor. A non-empty
/// native token is only meaningful for the bucket at `current_bucket_index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketCursor {
    buckets: DayBucketSet,
    current_bucket_index: usize,
    native_token: String,
}

impl BucketCursor {
    /// Create a cursor, or `None` if the index lies outside `0..=buckets.len()`
    pub fn new(
        buckets: DayBucketSet,
        current_bucket_index: usize,
        native_token: impl Into<String>,
    ) -> Option<Self> {
        if current_bucket_index > buckets.len() {
            return None;
        }
        Some(Self {
            buckets,
            current_bucket_index,
            native_token: native_token.into(),
        })
    }

    /// Create a cursor at the head of a window
    pub fn start(buckets: DayBucketSet) -> Self {
        Self {
            buckets,
            current_bucket_index: 0,
            native_token: String::new(),
        }
    }

    /// The window this cursor walks
    pub fn buckets(&self) -> &DayBucketSet {
        &self.buckets
    }

    /// Index of the bucket the next query targets
    pub fn current_bucket_index(&self) -> usize {
        self.current_bucket_index
    }

    /// Identifier of the bucket the next query targets
    pub fn current_bucket(&self) -> Option<&str> {
        self.buckets.get(self.current_bucket_index)
    }

    /// Raw native token (empty when the bucket starts from its head)
    pub fn native_token(&self) -> &str {
        &self.native_token
    }

    /// Native token as a resume position, `None` when empty
    pub fn resume_token(&self) -> Option<&str> {
        if self.native_token.is_empty() {
            None
        } else {
            Some(&self.native_token)
        }
    }

    /// Check if every bucket of the window has been consumed
    pub fn is_exhausted(&self) -> bool {
        self.current_bucket_index >= self.buckets.len()
    }

    /// Same bucket, resumed at a new native token
    #[must_use]
    pub fn resumed_at(&self, native_token: impl Into<String>) -> Self {
        Self {
            buckets: self.buckets.clone(),
            current_bucket_index: self.current_bucket_index,
            native_token: native_token.into(),
        }
    }

    /// Next bucket, starting from its head
    ///
    /// Saturates at the exhausted position.
    #[must_use]
    pub fn advanced(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            current_bucket_index: (self.current_bucket_index + 1).min(self.buckets.len()),
            native_token: String::new(),
        }
    }
}

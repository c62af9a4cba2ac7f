//! Error types for bucketed-feed
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! A malformed caller cursor has no variant: the paginator falls back to a
//! fresh window instead.

use thiserror::Error;

/// The main error type for bucketed-feed
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Storage Errors
    // ============================================================================
    #[error("Invalid resume token for partition '{partition}': {message}")]
    InvalidToken { partition: String, message: String },

    #[error("Store query failed for partition '{partition}': {message}")]
    Store { partition: String, message: String },

    #[error("Store query timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("DuckDB error: {0}")]
    Database(#[from] duckdb::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid token error
    pub fn invalid_token(partition: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidToken {
            partition: partition.into(),
            message: message.into(),
        }
    }

    /// Create a store query error
    pub fn store(partition: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Store {
            partition: partition.into(),
            message: message.into(),
        }
    }

    /// Check if this error is retryable
    ///
    /// Pagination is read-only, so a retryable failure can be replayed with
    /// the exact same cursor and page size.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Store { .. } | Error::Timeout { .. } | Error::Database(_) | Error::Io(_)
        )
    }

    /// Check if this error was caused by the caller's input rather than the store
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidToken { .. } | Error::InvalidConfigValue { .. }
        )
    }
}

/// Result type alias for bucketed-feed
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

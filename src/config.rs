//! Feed configuration
//!
//! YAML configuration for the paginator window, page size limits, storage
//! backend and HTTP server.
//!
//! ```yaml
//! window_days: 8
//! calendar:
//!   type: fixed_offset
//!   offset_minutes: -300
//! default_page_size: 20
//! max_page_size: 100
//! store:
//!   type: duckdb
//!   path: feed.duckdb
//!   query_timeout_ms: 2000
//! server:
//!   port: 8080
//! ```

use crate::cursor::{CalendarPolicy, DEFAULT_WINDOW_DAYS};
use crate::database::DuckDbFeedStore;
use crate::error::{Error, Result};
use crate::pagination::{BucketedFeedPaginator, PaginatorConfig};
use crate::store::{FeedStore, InMemoryFeedStore};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete feed configuration loaded from YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Number of day buckets in a fresh window
    #[serde(default = "default_window_days")]
    pub window_days: usize,

    /// Calendar that decides where a day bucket starts
    #[serde(default)]
    pub calendar: CalendarPolicy,

    /// Page size used when the caller does not ask for one
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Largest page a caller may request
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,

    /// Storage backend
    #[serde(default)]
    pub store: StoreConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerSettings,
}

fn default_window_days() -> usize {
    DEFAULT_WINDOW_DAYS
}

fn default_page_size() -> usize {
    20
}

fn default_max_page_size() -> usize {
    100
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            calendar: CalendarPolicy::default(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            store: StoreConfig::default(),
            server: ServerSettings::default(),
        }
    }
}

impl FeedConfig {
    /// Parse and validate a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.window_days == 0 {
            return Err(Error::invalid_value("window_days", "must be at least 1"));
        }
        if self.max_page_size == 0 {
            return Err(Error::invalid_value("max_page_size", "must be at least 1"));
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(Error::invalid_value(
                "default_page_size",
                format!("must be between 1 and {}", self.max_page_size),
            ));
        }
        self.calendar.validate()?;
        self.store.validate()
    }

    /// Resolve a caller's page size against the configured limits
    pub fn page_size(&self, requested: Option<usize>) -> Result<usize> {
        match requested {
            None => Ok(self.default_page_size),
            Some(size) if size == 0 || size > self.max_page_size => Err(Error::invalid_value(
                "page_size",
                format!("must be between 1 and {}", self.max_page_size),
            )),
            Some(size) => Ok(size),
        }
    }

    /// Paginator settings derived from this config
    pub fn paginator_config(&self) -> PaginatorConfig {
        PaginatorConfig::new()
            .with_window_days(self.window_days)
            .with_calendar(self.calendar)
    }

    /// Open the configured store and wrap it in a paginator
    pub fn build_paginator(&self) -> Result<BucketedFeedPaginator> {
        let store = self.store.open(self.calendar)?;
        Ok(BucketedFeedPaginator::new(store).with_config(self.paginator_config()))
    }
}

// ============================================================================
// Store Config
// ============================================================================

/// Storage backend selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// In-memory partitions, optionally seeded from a JSON file
    Memory {
        /// JSON array of feed items
        #[serde(default)]
        seed: Option<PathBuf>,
    },
    /// DuckDB table of day-partitioned rows
    Duckdb {
        /// Database file (in memory when absent)
        #[serde(default)]
        path: Option<PathBuf>,
        /// Per-query timeout
        #[serde(default)]
        query_timeout_ms: Option<u64>,
    },
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::Memory { seed: None }
    }
}

impl StoreConfig {
    /// Check store settings
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Duckdb {
                query_timeout_ms: Some(0),
                ..
            } => Err(Error::invalid_value(
                "store.query_timeout_ms",
                "must be positive when set",
            )),
            _ => Ok(()),
        }
    }

    /// Open the backend
    pub fn open(&self, calendar: CalendarPolicy) -> Result<Arc<dyn FeedStore>> {
        match self {
            Self::Memory { seed: None } => Ok(Arc::new(InMemoryFeedStore::new())),
            Self::Memory { seed: Some(path) } => {
                Ok(Arc::new(InMemoryFeedStore::from_seed_file(path, calendar)?))
            }
            Self::Duckdb {
                path,
                query_timeout_ms,
            } => {
                let mut store = match path {
                    Some(path) => DuckDbFeedStore::open(path)?,
                    None => DuckDbFeedStore::open_in_memory()?,
                };
                if let Some(ms) = query_timeout_ms {
                    store = store.with_query_timeout(Duration::from_millis(*ms));
                }
                Ok(Arc::new(store))
            }
        }
    }
}

// ============================================================================
// Server Config
// ============================================================================

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load a config file
pub fn load_config(path: impl AsRef<Path>) -> Result<FeedConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let yaml = std::fs::read_to_string(path)?;
    FeedConfig::from_yaml_str(&yaml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults_from_empty_yaml() {
        let config = FeedConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, FeedConfig::default());
        assert_eq!(config.window_days, 8);
        assert_eq!(config.store, StoreConfig::Memory { seed: None });
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r"
window_days: 3
calendar:
  type: fixed_offset
  offset_minutes: -300
default_page_size: 5
max_page_size: 50
store:
  type: duckdb
  path: feed.duckdb
  query_timeout_ms: 2000
server:
  port: 9090
";
        let config = FeedConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.window_days, 3);
        assert_eq!(config.calendar, CalendarPolicy::fixed_offset(-300));
        assert_eq!(
            config.store,
            StoreConfig::Duckdb {
                path: Some(PathBuf::from("feed.duckdb")),
                query_timeout_ms: Some(2000),
            }
        );
        assert_eq!(config.server.port, 9090);

        let paginator = config.paginator_config();
        assert_eq!(paginator.window_days, 3);
    }

    #[test]
    fn test_validation_errors() {
        assert!(FeedConfig::from_yaml_str("window_days: 0").is_err());
        assert!(FeedConfig::from_yaml_str("default_page_size: 0").is_err());
        assert!(FeedConfig::from_yaml_str("max_page_size: 10\ndefault_page_size: 11").is_err());
        assert!(FeedConfig::from_yaml_str(
            "calendar:\n  type: fixed_offset\n  offset_minutes: 5000"
        )
        .is_err());
        assert!(FeedConfig::from_yaml_str("store:\n  type: duckdb\n  query_timeout_ms: 0").is_err());
    }

    #[test]
    fn test_unknown_store_type_rejected() {
        let err = FeedConfig::from_yaml_str("store:\n  type: cassandra").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_page_size_resolution() {
        let config = FeedConfig::default();
        assert_eq!(config.page_size(None).unwrap(), 20);
        assert_eq!(config.page_size(Some(7)).unwrap(), 7);
        assert!(config.page_size(Some(0)).is_err());
        assert!(config.page_size(Some(101)).is_err());
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "window_days: 2").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.window_days, 2);
    }

    #[test]
    fn test_load_config_missing() {
        let err = load_config("/nonexistent/feed.yaml").unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn test_build_paginator_with_duckdb_in_memory() {
        let config = FeedConfig::from_yaml_str("store:\n  type: duckdb").unwrap();
        let paginator = config.build_paginator().unwrap();
        let page = paginator.get_page(None, 5).await.unwrap();
        assert!(page.is_empty());
        assert!(page.is_last());
    }
}

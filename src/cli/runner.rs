//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{load_config, FeedConfig};
use crate::cursor::{build_initial_window, decode};
use crate::error::{Error, Result};
use crate::pagination::FeedPage;
use chrono::{NaiveDate, Utc};
use futures::StreamExt;
use serde_json::{json, Value};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;
        match &self.cli.command {
            Commands::Page { cursor, page_size } => {
                self.page(&config, cursor.as_deref(), *page_size).await
            }
            Commands::Walk {
                page_size,
                max_pages,
            } => self.walk(&config, *page_size, *max_pages).await,
            Commands::Window { date } => self.window(&config, date.as_deref()),
            Commands::Decode { cursor } => self.decode(&config, cursor),
            Commands::Serve { port } => {
                let port = port.unwrap_or(config.server.port);
                let paginator = config.build_paginator()?;
                crate::cli::serve(paginator, config, port).await
            }
        }
    }

    /// Load feed configuration, falling back to defaults
    fn load_config(&self) -> Result<FeedConfig> {
        match &self.cli.config {
            Some(path) => load_config(path),
            None => Ok(FeedConfig::default()),
        }
    }

    /// Fetch a single page
    async fn page(
        &self,
        config: &FeedConfig,
        cursor: Option<&str>,
        page_size: Option<usize>,
    ) -> Result<()> {
        let page_size = config.page_size(page_size)?;
        let paginator = config.build_paginator()?;
        let page = paginator.get_page(cursor, page_size).await?;
        self.print_page(None, &page)
    }

    /// Follow cursors until the window is exhausted
    async fn walk(
        &self,
        config: &FeedConfig,
        page_size: Option<usize>,
        max_pages: Option<usize>,
    ) -> Result<()> {
        let page_size = config.page_size(page_size)?;
        let paginator = config.build_paginator()?;
        let pages = paginator
            .pages(page_size, Utc::now())
            .take(max_pages.unwrap_or(usize::MAX));
        let mut pages = std::pin::pin!(pages);

        let mut number = 0;
        let mut total = 0;
        while let Some(page) = pages.next().await {
            let page = page?;
            number += 1;
            total += page.len();
            self.print_page(Some(number), &page)?;
        }

        tracing::info!("Walked {} pages, {} items", number, total);
        Ok(())
    }

    /// Show a fresh window
    fn window(&self, config: &FeedConfig, date: Option<&str>) -> Result<()> {
        let now = match date {
            Some(date) => {
                let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                    .map_err(|e| Error::invalid_value("date", format!("{date}: {e}")))?;
                config.calendar.start_of_day(date)
            }
            None => Utc::now(),
        };
        let cursor = build_initial_window(now, config.window_days, config.calendar);

        match self.cli.format {
            OutputFormat::Json => self.emit(&json!({ "buckets": cursor.buckets() })),
            OutputFormat::Pretty => {
                for (index, day) in cursor.buckets().iter().enumerate() {
                    println!("{index:>3}  {day}");
                }
                Ok(())
            }
        }
    }

    /// Decode and describe a cursor
    fn decode(&self, config: &FeedConfig, raw: &str) -> Result<()> {
        let Some(cursor) = decode(raw, config.window_days) else {
            return self.emit(&json!({
                "valid": false,
                "message": format!(
                    "not a cursor for a {}-day window; a fresh window would be used",
                    config.window_days
                ),
            }));
        };

        self.emit(&json!({
            "valid": true,
            "buckets": cursor.buckets(),
            "current_bucket_index": cursor.current_bucket_index(),
            "current_bucket": cursor.current_bucket(),
            "native_token": cursor.native_token(),
            "exhausted": cursor.is_exhausted(),
        }))
    }

    fn print_page(&self, number: Option<usize>, page: &FeedPage) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => {
                let mut value = serde_json::to_value(page)?;
                if let (Some(n), Value::Object(map)) = (number, &mut value) {
                    map.insert("page".to_string(), json!(n));
                }
                self.emit(&value)
            }
            OutputFormat::Pretty => {
                if let Some(n) = number {
                    println!("--- page {n} ---");
                }
                for item in &page.items {
                    println!("{}  {}", item.timestamp.to_rfc3339(), item.id);
                }
                match &page.next_cursor {
                    Some(cursor) => println!("next: {cursor}"),
                    None => println!("(end of feed)"),
                }
                Ok(())
            }
        }
    }

    fn emit(&self, value: &Value) -> Result<()> {
        let output = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{output}");
        Ok(())
    }
}

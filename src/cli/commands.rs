//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Bucketed feed CLI
#[derive(Parser, Debug)]
#[command(name = "bucketed-feed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Feed configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch one page of the feed
    Page {
        /// Cursor from a previous page (omit to start fresh)
        #[arg(long)]
        cursor: Option<String>,

        /// Items per page (defaults to the configured page size)
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Follow cursors from a fresh window to the end of the feed
    Walk {
        /// Items per page (defaults to the configured page size)
        #[arg(long)]
        page_size: Option<usize>,

        /// Stop after this many pages
        #[arg(long)]
        max_pages: Option<usize>,
    },

    /// Show the day buckets of a fresh window
    Window {
        /// Reference date (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,
    },

    /// Decode a cursor string
    Decode {
        /// Cursor to inspect
        cursor: String,
    },

    /// Start HTTP server mode
    Serve {
        /// Port to listen on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}

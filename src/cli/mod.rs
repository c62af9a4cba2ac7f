//! CLI module
//!
//! Command-line interface for paging through a feed.
//!
//! # Commands
//!
//! - `page` - Fetch one page, optionally after a cursor
//! - `walk` - Follow cursors from a fresh window to the end
//! - `window` - Show the day buckets of a fresh window
//! - `decode` - Inspect a cursor string
//! - `serve` - Start HTTP server mode

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
pub use server::{router, serve};

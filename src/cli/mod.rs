//! CLI module
//!
//! Command-line interface for paging through a listing endpoint.
//!
//! # Commands
//!
//! - `page` - Fetch the first page
//! - `walk` - Follow next cursors to the end of the listing
//! - `browse` - Interactive session driven by stdin commands

mod commands;
mod runner;

pub use commands::{BrowseCommand, Cli, Commands, OutputFormat};
pub use runner::Runner;

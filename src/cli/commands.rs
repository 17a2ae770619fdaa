//! CLI commands and argument parsing

use crate::types::PaginationMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Solidafy Pager CLI
#[derive(Parser, Debug)]
#[command(name = "solidafy-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Pager configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Listing endpoint URL (overrides the config file)
    #[arg(short, long, global = true)]
    pub url: Option<String>,

    /// Token refresh endpoint URL (overrides the config file)
    #[arg(long, global = true)]
    pub refresh_url: Option<String>,

    /// Access token
    #[arg(long, global = true, env = "PAGER_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Refresh token
    #[arg(long, global = true, env = "PAGER_REFRESH_TOKEN", hide_env_values = true)]
    pub refresh_token: Option<String>,

    /// Records per page
    #[arg(short = 'n', long, global = true)]
    pub page_size: Option<u32>,

    /// Pagination mode: replace (paged) or append (infinite)
    #[arg(short, long, global = true)]
    pub mode: Option<PaginationMode>,

    /// Initial search term
    #[arg(short, long, global = true)]
    pub search: Option<String>,

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
    /// Fetch the first page
    Page,

    /// Follow next cursors until the listing is exhausted
    Walk {
        /// Stop after this many pages
        #[arg(long)]
        max_pages: Option<usize>,
    },

    /// Interactive session driven by commands on stdin
    ///
    /// n = next, p = previous, r = reload, s <term> = search (debounced),
    /// / <term> = search now, size <n> = page size, v = view, q = quit
    Browse,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}

/// One line of `browse` input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Next,
    Previous,
    Reload,
    /// Debounced search edit
    Search(String),
    /// Search committed immediately
    SearchNow(String),
    PageSize(u32),
    View,
    Help,
    Quit,
}

impl BrowseCommand {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Result<Self, String>> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        let command = match head {
            "n" | "next" => Ok(Self::Next),
            "p" | "prev" | "previous" => Ok(Self::Previous),
            "r" | "reload" => Ok(Self::Reload),
            // "s" alone clears the search
            "s" | "search" => Ok(Self::Search(rest.to_string())),
            "/" => Ok(Self::SearchNow(rest.to_string())),
            "size" => rest
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .map(Self::PageSize)
                .ok_or_else(|| format!("invalid page size: {rest:?}")),
            "v" | "view" => Ok(Self::View),
            "h" | "help" | "?" => Ok(Self::Help),
            "q" | "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command: {other}")),
        };
        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parses_walk() {
        let cli = Cli::try_parse_from([
            "solidafy-pager",
            "walk",
            "--url",
            "https://api.example.com/users",
            "--token",
            "abc",
            "--page-size",
            "10",
            "--mode",
            "append",
            "--max-pages",
            "3",
        ])
        .unwrap();

        assert_eq!(cli.url.as_deref(), Some("https://api.example.com/users"));
        assert_eq!(cli.token.as_deref(), Some("abc"));
        assert_eq!(cli.page_size, Some(10));
        assert_eq!(cli.mode, Some(PaginationMode::Append));
        assert!(matches!(cli.command, Commands::Walk { max_pages: Some(3) }));
    }

    #[test_case("n", BrowseCommand::Next ; "next short")]
    #[test_case("  previous ", BrowseCommand::Previous ; "previous long")]
    #[test_case("r", BrowseCommand::Reload ; "reload")]
    #[test_case("s ada love", BrowseCommand::Search("ada love".into()) ; "search with spaces")]
    #[test_case("s", BrowseCommand::Search(String::new()) ; "clear search")]
    #[test_case("/ bob", BrowseCommand::SearchNow("bob".into()) ; "search now")]
    #[test_case("size 50", BrowseCommand::PageSize(50) ; "page size")]
    #[test_case("v", BrowseCommand::View ; "view")]
    #[test_case("q", BrowseCommand::Quit ; "quit")]
    fn test_browse_command_parse(line: &str, expected: BrowseCommand) {
        assert_eq!(BrowseCommand::parse(line), Some(Ok(expected)));
    }

    #[test_case("size 0" ; "zero size")]
    #[test_case("size many" ; "non numeric size")]
    #[test_case("jump 4" ; "unknown command")]
    fn test_browse_command_rejects(line: &str) {
        assert!(matches!(BrowseCommand::parse(line), Some(Err(_))));
    }

    #[test]
    fn test_browse_command_blank_line() {
        assert_eq!(BrowseCommand::parse("   "), None);
    }
}

//! CLI argument definitions for watchdesk.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `enrich` | Enriched quote, market cap and P/E per symbol |
//! | `news` | News slate for symbols, or general market news |
//! | `search` | Symbol search, or popular symbols without a query |
//! | `view` | Full watchlist view from a JSON watchlist file |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--timeout-ms` | from env, else `5000` | Request timeout in ms |
//! | `--base-url` | from env | Provider base URL |
//!
//! # Examples
//!
//! ```bash
//! watchdesk enrich AAPL MSFT --pretty
//! watchdesk news NVDA AMD
//! watchdesk search apple --watchlist AAPL,MSFT
//! watchdesk view watchlist.json
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Stock watchlist enrichment and news from the command line.
#[derive(Debug, Parser)]
#[command(
    name = "watchdesk",
    author,
    version,
    about = "Stock watchlist enrichment and news",
    long_about = "Watchdesk enriches a stock watchlist with quotes, market cap and P/E, \
selects a fair news slate across the watched symbols, and searches for symbols.\n\
\n\
The Finnhub token is read from WATCHDESK_FINNHUB_API_KEY or FINNHUB_API_KEY \
(a .env file in the working directory is honoured). Results are printed as JSON on stdout; \
logs go to stderr and are controlled by RUST_LOG."
)]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Request timeout in milliseconds, overriding WATCHDESK_HTTP_TIMEOUT_MS.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Provider base URL, overriding WATCHDESK_FINNHUB_BASE_URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Enrich one or more symbols with quote, market cap and P/E.
    ///
    /// # Examples
    ///
    ///   watchdesk enrich AAPL
    ///   watchdesk enrich aapl msft nvda --pretty
    Enrich(EnrichArgs),

    /// Select up to six news articles for the given symbols.
    ///
    /// Without symbols, or when none of them has recent coverage, general
    /// market news is returned.
    ///
    /// # Examples
    ///
    ///   watchdesk news AAPL TSLA
    ///   watchdesk news
    News(NewsArgs),

    /// Search for symbols, marking those already on the watchlist.
    ///
    /// # Examples
    ///
    ///   watchdesk search apple
    ///   watchdesk search --watchlist AAPL,MSFT
    Search(SearchArgs),

    /// Assemble the full watchlist view from a JSON file.
    ///
    /// The file holds `{"entries": [...], "alerts": [...]}`.
    ///
    /// # Examples
    ///
    ///   watchdesk view watchlist.json --pretty
    View(ViewArgs),
}

/// Arguments for the `enrich` command.
#[derive(Debug, Args)]
pub struct EnrichArgs {
    /// One or more market symbols (e.g., AAPL, MSFT).
    #[arg(required = true, num_args = 1..)]
    pub symbols: Vec<String>,
}

/// Arguments for the `news` command.
#[derive(Debug, Args)]
pub struct NewsArgs {
    /// Symbols whose company news should be used.
    #[arg(num_args = 0..)]
    pub symbols: Vec<String>,
}

/// Arguments for the `search` command.
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Search text. Omit to list popular symbols.
    pub query: Option<String>,

    /// Comma-separated symbols already on the watchlist.
    #[arg(long, value_delimiter = ',')]
    pub watchlist: Vec<String>,
}

/// Arguments for the `view` command.
#[derive(Debug, Args)]
pub struct ViewArgs {
    /// Path to the watchlist JSON file.
    pub file: PathBuf,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn search_watchlist_splits_on_commas() {
        let cli = Cli::parse_from(["watchdesk", "search", "apple", "--watchlist", "AAPL,msft"]);
        match cli.command {
            Command::Search(args) => {
                assert_eq!(args.query.as_deref(), Some("apple"));
                assert_eq!(args.watchlist, vec!["AAPL", "msft"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_overrides_parse_after_subcommand() {
        let cli = Cli::parse_from(["watchdesk", "news", "--timeout-ms", "900", "--pretty"]);
        assert_eq!(cli.timeout_ms, Some(900));
        assert!(cli.pretty);
        assert!(matches!(cli.command, Command::News(ref args) if args.symbols.is_empty()));
    }
}

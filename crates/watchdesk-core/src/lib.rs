//! # Watchdesk Core
//!
//! Market-data enrichment and news aggregation for a stock watchlist.
//!
//! ## Overview
//!
//! - **Provider client** for Finnhub quote, profile, metric, search and news endpoints
//! - **TTL response cache** with an injectable clock
//! - **Batch enrichment** that isolates per-symbol failures
//! - **News aggregation** with fair round-robin selection and general-news fallback
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (Finnhub) |
//! | [`alerts`] | Price-alert records and their display join |
//! | [`cache`] | TTL cache and clocks |
//! | [`cached_source`] | Memoizing data-source decorator |
//! | [`config`] | Environment configuration, TTL and news policies |
//! | [`data_source`] | Data source trait and request/response types |
//! | [`domain`] | Domain models |
//! | [`enrichment`] | Batch enrichment coordinator |
//! | [`error`] | Core error types |
//! | [`fanout`] | Per-symbol branch outcomes |
//! | [`format`] | Display formatting |
//! | [`http_client`] | HTTP client abstraction |
//! | [`news`] | News aggregator |
//! | [`search`] | Stock search |
//! | [`throttling`] | Client-side rate limiting |
//! | [`watchlist`] | Watchlist view assembly |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use watchdesk_core::{CachePolicy, CachedSource, FinnhubAdapter, SymbolSet, WatchdeskConfig, WatchlistService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = WatchdeskConfig::from_env()?;
//!     let source = CachedSource::new(FinnhubAdapter::from_config(&config), CachePolicy::default());
//!     let service = WatchlistService::new(Arc::new(source));
//!
//!     let symbols = SymbolSet::parse(["AAPL", "MSFT"])?;
//!     for (symbol, stock) in service.enricher().enrich(&symbols).await? {
//!         println!("{symbol}: {} ({})", stock.price_formatted, stock.change_formatted);
//!     }
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod alerts;
pub mod cache;
pub mod cached_source;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod enrichment;
pub mod error;
pub mod fanout;
pub mod format;
pub mod http_client;
pub mod news;
pub mod search;
pub mod throttling;
pub mod watchlist;

pub use adapters::FinnhubAdapter;
pub use alerts::{enrich_alerts, AlertCadence, AlertRecord, AlertType, EnrichedAlert};
pub use cache::{CacheKey, Clock, ManualClock, SystemClock, TtlCache};
pub use cached_source::CachedSource;
pub use config::{CachePolicy, NewsPolicy, WatchdeskConfig};
pub use data_source::{DateRange, Endpoint, MarketDataSource, ProviderError, SourceFuture};
pub use domain::{
    ArticleKey, EnrichedStock, Metric, NewsArticle, NewsCategory, Profile, Quote, RawNewsArticle,
    SearchMatch, Symbol, SymbolSet, UtcDateTime, WatchlistEntry,
};
pub use enrichment::Enricher;
pub use error::{ConfigError, ValidationError, WatchError};
pub use fanout::Branch;
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient,
    ScriptedHttpClient,
};
pub use news::NewsAggregator;
pub use search::{StockSearch, StockSearchHit, POPULAR_SYMBOLS};
pub use throttling::RequestThrottle;
pub use watchlist::{WatchlistService, WatchlistView};

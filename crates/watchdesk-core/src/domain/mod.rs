//! # Domain Models
//!
//! Canonical domain types for watchlist market data.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated, uppercase ticker |
//! | [`SymbolSet`] | Insertion-ordered, duplicate-free symbol set |
//! | [`Quote`] | Current price and change |
//! | [`Profile`] | Company name and market cap |
//! | [`Metric`] | Valuation metrics |
//! | [`EnrichedStock`] | Merged, display-ready record for one symbol |
//! | [`RawNewsArticle`] | Article as delivered by a provider |
//! | [`NewsArticle`] | Validated, formatted article |
//! | [`UtcDateTime`] | UTC timestamp |

mod models;
mod news;
mod symbol;
mod timestamp;

pub use models::{EnrichedStock, Metric, Profile, Quote, SearchMatch, WatchlistEntry};
pub use news::{ArticleKey, NewsArticle, NewsCategory, RawNewsArticle};
pub use symbol::{Symbol, SymbolSet};
pub use timestamp::UtcDateTime;

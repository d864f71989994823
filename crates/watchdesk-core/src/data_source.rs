//! Data source trait and shared request/response types.
//!
//! # Endpoints
//!
//! | Endpoint | Arguments | Response |
//! |----------|-----------|----------|
//! | Quote | symbol | [`Quote`] |
//! | Profile | symbol | [`Profile`] |
//! | Metric | symbol | [`Metric`] |
//! | Search | query | `Vec<`[`SearchMatch`]`>` |
//! | CompanyNews | symbol, [`DateRange`] | `Vec<`[`RawNewsArticle`]`>` |
//! | GeneralNews | none | `Vec<`[`RawNewsArticle`]`>` |
//!
//! A source performs exactly one upstream request per call and never retries.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::macros::format_description;
use time::{Date, Duration};

use crate::{ConfigError, Metric, Profile, Quote, RawNewsArticle, SearchMatch, Symbol};

/// Provider endpoint kind, used for cache keys, TTLs and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Quote,
    Profile,
    Metric,
    Search,
    CompanyNews,
    GeneralNews,
}

impl Endpoint {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quote => "quote",
            Self::Profile => "profile",
            Self::Metric => "metric",
            Self::Search => "search",
            Self::CompanyNews => "company_news",
            Self::GeneralNews => "general_news",
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single upstream call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("{endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: Endpoint,
        status: u16,
        body: String,
    },

    #[error("{endpoint} transport error: {message}")]
    Transport { endpoint: Endpoint, message: String },

    #[error("{endpoint} response could not be decoded: {message}")]
    Decode { endpoint: Endpoint, message: String },
}

impl ProviderError {
    pub const fn endpoint(&self) -> Endpoint {
        match self {
            Self::Status { endpoint, .. }
            | Self::Transport { endpoint, .. }
            | Self::Decode { endpoint, .. } => *endpoint,
        }
    }

    /// HTTP status for non-success responses.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { .. } | Self::Decode { .. } => None,
        }
    }
}

/// Inclusive calendar-day range for news queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub from: Date,
    pub to: Date,
}

impl DateRange {
    /// `[today - days, today]`.
    pub fn trailing_days(today: Date, days: u16) -> Self {
        let from = today
            .checked_sub(Duration::days(i64::from(days)))
            .unwrap_or(Date::MIN);
        Self { from, to: today }
    }

    pub fn from_param(&self) -> String {
        format_ymd(self.from)
    }

    pub fn to_param(&self) -> String {
        format_ymd(self.to)
    }
}

fn format_ymd(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}

/// Boxed future returned by [`MarketDataSource`] operations.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ProviderError>> + Send + 'a>>;

/// Market-data provider contract.
///
/// Implementations are stateless with respect to callers: no retries, no
/// shared mutation beyond the network call itself.
///
/// | Method | Description |
/// |--------|-------------|
/// | [`ensure_configured`](MarketDataSource::ensure_configured) | Credential check run before any fan-out |
/// | [`quote`](MarketDataSource::quote) | Current price and change |
/// | [`profile`](MarketDataSource::profile) | Company profile |
/// | [`metric`](MarketDataSource::metric) | Valuation metrics |
/// | [`search`](MarketDataSource::search) | Symbol search |
/// | [`company_news`](MarketDataSource::company_news) | Recent news for one symbol |
/// | [`general_news`](MarketDataSource::general_news) | General market news |
pub trait MarketDataSource: Send + Sync {
    /// Fails when the source cannot make authenticated calls at all.
    ///
    /// Coordinators call this once up front so that a missing credential is
    /// reported as such instead of as a batch of empty results.
    fn ensure_configured(&self) -> Result<(), ConfigError>;

    fn quote<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, Quote>;

    fn profile<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, Profile>;

    fn metric<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, Metric>;

    fn search<'a>(&'a self, query: &'a str) -> SourceFuture<'a, Vec<SearchMatch>>;

    fn company_news<'a>(
        &'a self,
        symbol: &'a Symbol,
        range: DateRange,
    ) -> SourceFuture<'a, Vec<RawNewsArticle>>;

    fn general_news<'a>(&'a self) -> SourceFuture<'a, Vec<RawNewsArticle>>;
}

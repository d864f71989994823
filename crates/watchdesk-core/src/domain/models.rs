use serde::{Deserialize, Serialize};

use crate::{Symbol, UtcDateTime};

/// Latest quote fields used by the watchlist. Absent fields mean the provider
/// returned no data for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub current_price: Option<f64>,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
}

impl Quote {
    pub fn is_empty(&self) -> bool {
        self.current_price.is_none() && self.change.is_none() && self.change_percent.is_none()
    }
}

/// Company profile snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub company_name: Option<String>,
    /// Market capitalization in millions of the listing currency.
    pub market_cap_millions: Option<f64>,
    pub exchange: Option<String>,
    pub ticker: Option<String>,
}

/// Valuation metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub pe_ratio_annual: Option<f64>,
    pub market_cap_millions: Option<f64>,
}

/// One raw symbol-search match as returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub symbol: String,
    pub description: String,
    pub display_symbol: String,
    pub kind: String,
}

/// A persisted watchlist row, supplied by the surrounding application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub symbol: Symbol,
    pub company: String,
    #[serde(default)]
    pub added_at: Option<UtcDateTime>,
}

impl WatchlistEntry {
    pub fn new(symbol: Symbol, company: impl Into<String>) -> Self {
        Self {
            symbol,
            company: company.into(),
            added_at: None,
        }
    }

    pub fn with_added_at(mut self, added_at: UtcDateTime) -> Self {
        self.added_at = Some(added_at);
        self
    }
}

/// Quote, profile and metric merged for one symbol, with display strings.
///
/// Recomputed on every read and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedStock {
    pub symbol: Symbol,
    pub company: String,
    pub added_at: Option<UtcDateTime>,
    pub current_price: Option<f64>,
    pub change_percent: Option<f64>,
    pub price_formatted: String,
    pub change_formatted: String,
    pub market_cap: String,
    pub pe_ratio: String,
}

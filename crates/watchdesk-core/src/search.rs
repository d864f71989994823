use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::data_source::MarketDataSource;
use crate::fanout::Branch;
use crate::{Profile, SearchMatch, Symbol, SymbolSet, WatchError};

/// Symbols offered when the search box is empty, most popular first.
pub const POPULAR_SYMBOLS: [&str; 20] = [
    "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "META", "NVDA", "NFLX", "ORCL", "CRM", "ADBE",
    "INTC", "AMD", "PYPL", "UBER", "SHOP", "SPOT", "PLTR", "COIN", "SNOW",
];

const POPULAR_FAN_OUT: usize = 10;
const MAX_RESULTS: usize = 15;

/// One row of the stock picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSearchHit {
    pub symbol: String,
    pub name: String,
    pub exchange: String,
    pub kind: String,
    pub in_watchlist: bool,
}

impl StockSearchHit {
    fn from_match(value: SearchMatch, watchlist: &SymbolSet) -> Self {
        let symbol = value.symbol.trim().to_ascii_uppercase();
        let in_watchlist = Symbol::parse(&symbol).is_ok_and(|parsed| watchlist.contains(&parsed));
        Self {
            name: value.description,
            exchange: non_blank(value.display_symbol).unwrap_or_else(|| String::from("US")),
            kind: non_blank(value.kind).unwrap_or_else(|| String::from("Stock")),
            in_watchlist,
            symbol,
        }
    }

    fn from_profile(symbol: &Symbol, profile: Profile, watchlist: &SymbolSet) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: profile.company_name.unwrap_or_else(|| symbol.to_string()),
            exchange: profile.exchange.unwrap_or_else(|| String::from("US")),
            kind: String::from("Common Stock"),
            in_watchlist: watchlist.contains(symbol),
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Symbol search with watchlist membership marking.
pub struct StockSearch<S: ?Sized> {
    source: Arc<S>,
}

impl<S: MarketDataSource + ?Sized> StockSearch<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Searches for `query`, or lists popular symbols when it is absent or
    /// blank. At most 15 hits.
    pub async fn search(
        &self,
        query: Option<&str>,
        watchlist: &SymbolSet,
    ) -> Result<Vec<StockSearchHit>, WatchError> {
        self.source.ensure_configured()?;

        let hits = match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(query) => self
                .source
                .search(query)
                .await?
                .into_iter()
                .map(|found| StockSearchHit::from_match(found, watchlist))
                .collect(),
            None => self.popular(watchlist).await,
        };

        Ok(hits.into_iter().take(MAX_RESULTS).collect())
    }

    async fn popular(&self, watchlist: &SymbolSet) -> Vec<StockSearchHit> {
        let symbols = SymbolSet::parse_lenient(POPULAR_SYMBOLS.iter().take(POPULAR_FAN_OUT));

        join_all(symbols.iter().map(|symbol| async move {
            Branch::settle(symbol, self.source.profile(symbol).await)
                .into_option()
                .map(|profile| StockSearchHit::from_profile(symbol, profile, watchlist))
        }))
        .await
        .into_iter()
        .flatten()
        .collect()
    }
}

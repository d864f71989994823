//! Batch enrichment: quote, profile and metric per symbol, merged into one
//! display-ready record.
//!
//! Quotes and fundamentals are fanned out concurrently with
//! [`futures::future::join_all`], which waits for every branch. A failed call
//! only empties the affected field of the affected symbol.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use futures::future::join_all;
use tracing::debug;

use crate::data_source::MarketDataSource;
use crate::fanout::Branch;
use crate::format::{format_change_percent, format_market_cap, format_pe_ratio, format_price};
use crate::{
    EnrichedStock, Metric, Profile, Quote, Symbol, SymbolSet, UtcDateTime, WatchError,
    WatchlistEntry,
};

/// Upstream data gathered for one symbol.
#[derive(Debug, Clone, Default, PartialEq)]
struct SymbolData {
    quote: Quote,
    profile: Profile,
    metric: Metric,
}

/// Merges quote, profile and metric data per symbol.
pub struct Enricher<S: ?Sized> {
    source: Arc<S>,
}

impl<S: MarketDataSource + ?Sized> Enricher<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// One record per input symbol, even when every upstream call fails.
    ///
    /// `company` is the profile name, falling back to the symbol.
    pub async fn enrich(
        &self,
        symbols: &SymbolSet,
    ) -> Result<BTreeMap<Symbol, EnrichedStock>, WatchError> {
        if symbols.is_empty() {
            return Ok(BTreeMap::new());
        }
        self.source.ensure_configured()?;

        let mut data = self.fetch(symbols.as_slice()).await;
        Ok(symbols
            .iter()
            .map(|symbol| {
                let data = data.remove(symbol).unwrap_or_default();
                let company = data
                    .profile
                    .company_name
                    .clone()
                    .unwrap_or_else(|| symbol.to_string());
                let stock = merge(symbol.clone(), company, None, &data);
                (symbol.clone(), stock)
            })
            .collect())
    }

    /// One record per entry, in entry order, keeping the entry's company and
    /// timestamp.
    pub async fn enrich_entries(
        &self,
        entries: &[WatchlistEntry],
    ) -> Result<Vec<EnrichedStock>, WatchError> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }
        self.source.ensure_configured()?;

        let symbols: SymbolSet = entries.iter().map(|entry| entry.symbol.clone()).collect();
        let data = self.fetch(symbols.as_slice()).await;

        Ok(entries
            .iter()
            .map(|entry| {
                let data = data.get(&entry.symbol).cloned().unwrap_or_default();
                merge(
                    entry.symbol.clone(),
                    entry.company.clone(),
                    entry.added_at,
                    &data,
                )
            })
            .collect())
    }

    async fn fetch(&self, symbols: &[Symbol]) -> HashMap<Symbol, SymbolData> {
        let quotes = join_all(symbols.iter().map(|symbol| async move {
            Branch::settle(symbol, self.source.quote(symbol).await)
        }));
        let fundamentals = join_all(symbols.iter().map(|symbol| async move {
            let (profile, metric) =
                tokio::join!(self.source.profile(symbol), self.source.metric(symbol));
            (
                Branch::settle(symbol, profile),
                Branch::settle(symbol, metric),
            )
        }));

        let (quotes, fundamentals) = tokio::join!(quotes, fundamentals);

        let missing_quotes = quotes.iter().filter(|branch| !branch.has_data()).count();
        debug!(
            symbols = symbols.len(),
            missing_quotes, "enrichment fan-out settled"
        );

        symbols
            .iter()
            .zip(quotes.into_iter().zip(fundamentals))
            .map(|(symbol, (quote, (profile, metric)))| {
                let data = SymbolData {
                    quote: quote.unwrap_or_default(),
                    profile: profile.unwrap_or_default(),
                    metric: metric.unwrap_or_default(),
                };
                (symbol.clone(), data)
            })
            .collect()
    }
}

fn merge(
    symbol: Symbol,
    company: String,
    added_at: Option<UtcDateTime>,
    data: &SymbolData,
) -> EnrichedStock {
    let market_cap = data.profile.market_cap_millions.map(|millions| millions * 1e6);

    EnrichedStock {
        symbol,
        company,
        added_at,
        current_price: data.quote.current_price,
        change_percent: data.quote.change_percent,
        price_formatted: format_price(data.quote.current_price),
        change_formatted: format_change_percent(data.quote.change_percent),
        market_cap: format_market_cap(market_cap),
        pe_ratio: format_pe_ratio(data.metric.pe_ratio_annual),
    }
}

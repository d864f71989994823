use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::alerts::{enrich_alerts, AlertRecord, EnrichedAlert};
use crate::config::NewsPolicy;
use crate::data_source::MarketDataSource;
use crate::enrichment::Enricher;
use crate::news::NewsAggregator;
use crate::search::StockSearch;
use crate::{EnrichedStock, NewsArticle, SymbolSet, WatchError, WatchlistEntry};

/// Everything the watchlist page renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WatchlistView {
    pub stocks: Vec<EnrichedStock>,
    pub alerts: Vec<EnrichedAlert>,
    pub news: Vec<NewsArticle>,
}

/// Entry point tying enrichment, news and search to one data source.
pub struct WatchlistService<S: ?Sized> {
    enricher: Enricher<S>,
    news: NewsAggregator<S>,
    search: StockSearch<S>,
}

impl<S: MarketDataSource + ?Sized> WatchlistService<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self::with_news_policy(source, NewsPolicy::default())
    }

    pub fn with_news_policy(source: Arc<S>, policy: NewsPolicy) -> Self {
        Self {
            enricher: Enricher::new(source.clone()),
            news: NewsAggregator::with_policy(source.clone(), policy),
            search: StockSearch::new(source),
        }
    }

    pub fn enricher(&self) -> &Enricher<S> {
        &self.enricher
    }

    pub fn news(&self) -> &NewsAggregator<S> {
        &self.news
    }

    pub fn search(&self) -> &StockSearch<S> {
        &self.search
    }

    /// Enriches `entries` and selects their news concurrently, then joins
    /// `alerts` against the enriched stocks.
    ///
    /// An empty watchlist yields an empty view without any upstream call.
    pub async fn view(
        &self,
        entries: &[WatchlistEntry],
        alerts: &[AlertRecord],
    ) -> Result<WatchlistView, WatchError> {
        if entries.is_empty() {
            return Ok(WatchlistView::default());
        }

        let symbols: SymbolSet = entries.iter().map(|entry| entry.symbol.clone()).collect();
        let (stocks, news) = tokio::join!(
            self.enricher.enrich_entries(entries),
            self.news.get_news(&symbols)
        );
        let stocks = stocks?;
        let news = news?;

        debug!(
            stocks = stocks.len(),
            alerts = alerts.len(),
            news = news.len(),
            "watchlist view assembled"
        );

        Ok(WatchlistView {
            alerts: enrich_alerts(alerts, &stocks),
            stocks,
            news,
        })
    }
}

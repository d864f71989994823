use std::sync::Arc;

use crate::cache::{CacheKey, Clock, SystemClock, TtlCache};
use crate::config::CachePolicy;
use crate::data_source::{DateRange, Endpoint, MarketDataSource, SourceFuture};
use crate::{ConfigError, Metric, Profile, Quote, RawNewsArticle, SearchMatch, Symbol};

/// Memoizing decorator over any [`MarketDataSource`].
///
/// Each endpoint has its own typed cache and TTL. Failed calls are passed
/// through and never stored.
#[derive(Debug)]
pub struct CachedSource<S> {
    inner: S,
    policy: CachePolicy,
    quotes: TtlCache<Quote>,
    profiles: TtlCache<Profile>,
    metrics: TtlCache<Metric>,
    searches: TtlCache<Vec<SearchMatch>>,
    company_news: TtlCache<Vec<RawNewsArticle>>,
    general_news: TtlCache<Vec<RawNewsArticle>>,
}

impl<S: MarketDataSource> CachedSource<S> {
    pub fn new(inner: S, policy: CachePolicy) -> Self {
        Self::with_clock(inner, policy, Arc::new(SystemClock))
    }

    pub fn with_clock(inner: S, policy: CachePolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner,
            policy,
            quotes: TtlCache::with_clock(clock.clone()),
            profiles: TtlCache::with_clock(clock.clone()),
            metrics: TtlCache::with_clock(clock.clone()),
            searches: TtlCache::with_clock(clock.clone()),
            company_news: TtlCache::with_clock(clock.clone()),
            general_news: TtlCache::with_clock(clock),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub const fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    /// Drops every cached response.
    pub async fn clear(&self) {
        self.quotes.clear().await;
        self.profiles.clear().await;
        self.metrics.clear().await;
        self.searches.clear().await;
        self.company_news.clear().await;
        self.general_news.clear().await;
    }

    /// Drops expired responses from every endpoint cache.
    pub async fn clear_expired(&self) {
        self.quotes.clear_expired().await;
        self.profiles.clear_expired().await;
        self.metrics.clear_expired().await;
        self.searches.clear_expired().await;
        self.company_news.clear_expired().await;
        self.general_news.clear_expired().await;
    }
}

impl<S: MarketDataSource> MarketDataSource for CachedSource<S> {
    fn ensure_configured(&self) -> Result<(), ConfigError> {
        self.inner.ensure_configured()
    }

    fn quote<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, Quote> {
        Box::pin(async move {
            let key = CacheKey::new(Endpoint::Quote, symbol.as_str());
            self.quotes
                .get_or_compute(key, self.policy.ttl(Endpoint::Quote), || {
                    self.inner.quote(symbol)
                })
                .await
        })
    }

    fn profile<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, Profile> {
        Box::pin(async move {
            let key = CacheKey::new(Endpoint::Profile, symbol.as_str());
            self.profiles
                .get_or_compute(key, self.policy.ttl(Endpoint::Profile), || {
                    self.inner.profile(symbol)
                })
                .await
        })
    }

    fn metric<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, Metric> {
        Box::pin(async move {
            let key = CacheKey::new(Endpoint::Metric, symbol.as_str());
            self.metrics
                .get_or_compute(key, self.policy.ttl(Endpoint::Metric), || {
                    self.inner.metric(symbol)
                })
                .await
        })
    }

    fn search<'a>(&'a self, query: &'a str) -> SourceFuture<'a, Vec<SearchMatch>> {
        Box::pin(async move {
            let key = CacheKey::new(Endpoint::Search, query.trim().to_lowercase());
            self.searches
                .get_or_compute(key, self.policy.ttl(Endpoint::Search), || {
                    self.inner.search(query)
                })
                .await
        })
    }

    fn company_news<'a>(
        &'a self,
        symbol: &'a Symbol,
        range: DateRange,
    ) -> SourceFuture<'a, Vec<RawNewsArticle>> {
        Box::pin(async move {
            let args = format!("{}:{}:{}", symbol, range.from_param(), range.to_param());
            let key = CacheKey::new(Endpoint::CompanyNews, args);
            self.company_news
                .get_or_compute(key, self.policy.ttl(Endpoint::CompanyNews), || {
                    self.inner.company_news(symbol, range)
                })
                .await
        })
    }

    fn general_news<'a>(&'a self) -> SourceFuture<'a, Vec<RawNewsArticle>> {
        Box::pin(async move {
            let key = CacheKey::new(Endpoint::GeneralNews, "general");
            self.general_news
                .get_or_compute(key, self.policy.ttl(Endpoint::GeneralNews), || {
                    self.inner.general_news()
                })
                .await
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::adapters::FinnhubAdapter;
    use crate::cache::ManualClock;
    use crate::config::WatchdeskConfig;
    use crate::http_client::{HttpResponse, ScriptedHttpClient};

    fn cached(client: Arc<ScriptedHttpClient>, clock: Arc<ManualClock>) -> CachedSource<FinnhubAdapter> {
        let config = WatchdeskConfig::default()
            .with_api_key("k")
            .with_rate_limit_per_minute(0);
        CachedSource::with_clock(
            FinnhubAdapter::new(&config, client),
            CachePolicy::default(),
            clock,
        )
    }

    #[tokio::test]
    async fn quote_is_served_from_cache_within_ttl() {
        let client = Arc::new(ScriptedHttpClient::new().respond_json("/quote", &[], r#"{"c": 10.0, "o": 9.0, "dp": 1.0}"#));
        let clock = Arc::new(ManualClock::new());
        let source = cached(client.clone(), clock.clone());
        let symbol = Symbol::parse("AAPL").expect("valid");

        source.quote(&symbol).await.expect("first");
        clock.advance(Duration::from_secs(59));
        source.quote(&symbol).await.expect("cached");
        assert_eq!(client.calls_to("/quote"), 1);

        clock.advance(Duration::from_secs(2));
        source.quote(&symbol).await.expect("refreshed");
        assert_eq!(client.calls_to("/quote"), 2);
    }

    #[tokio::test]
    async fn profile_outlives_quote_ttl() {
        let client = Arc::new(ScriptedHttpClient::new().respond_json("/stock/profile2", &[], r#"{"name": "Apple Inc"}"#));
        let clock = Arc::new(ManualClock::new());
        let source = cached(client.clone(), clock.clone());
        let symbol = Symbol::parse("AAPL").expect("valid");

        source.profile(&symbol).await.expect("first");
        clock.advance(Duration::from_secs(1_800));
        source.profile(&symbol).await.expect("cached");
        assert_eq!(client.calls_to("/stock/profile2"), 1);
    }

    #[tokio::test]
    async fn failures_reach_upstream_every_time() {
        let client = Arc::new(ScriptedHttpClient::new().respond(
            "/news",
            &[],
            Ok(HttpResponse::with_status(502, "bad gateway")),
        ));
        let source = cached(client.clone(), Arc::new(ManualClock::new()));

        assert!(source.general_news().await.is_err());
        assert!(source.general_news().await.is_err());
        assert_eq!(client.calls_to("/news"), 2);
    }

    #[tokio::test]
    async fn search_key_ignores_case_and_padding() {
        let client = Arc::new(ScriptedHttpClient::new().respond_json("/search", &[], r#"{"count": 0, "result": []}"#));
        let source = cached(client.clone(), Arc::new(ManualClock::new()));

        source.search("Apple").await.expect("first");
        source.search("  apple ").await.expect("cached");
        assert_eq!(client.calls_to("/search"), 1);
    }
}

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::{WatchdeskConfig, API_KEY_VARIABLES};
use crate::data_source::{DateRange, Endpoint, MarketDataSource, ProviderError, SourceFuture};
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, ReqwestHttpClient};
use crate::throttling::RequestThrottle;
use crate::{ConfigError, Metric, Profile, Quote, RawNewsArticle, SearchMatch, Symbol};

const TOKEN_HEADER: &str = "X-Finnhub-Token";

#[derive(Debug, Default, Deserialize)]
struct QuoteResponse {
    /// Current price
    c: Option<f64>,
    /// Change
    d: Option<f64>,
    /// Percent change
    dp: Option<f64>,
    /// Open price of the day
    o: Option<f64>,
}

impl QuoteResponse {
    // Finnhub answers unknown symbols with an all-zero quote.
    fn is_unknown_symbol(&self) -> bool {
        self.c.unwrap_or(0.0) == 0.0 && self.o.unwrap_or(0.0) == 0.0
    }

    fn into_quote(self) -> Quote {
        if self.is_unknown_symbol() {
            return Quote::default();
        }

        Quote {
            current_price: self.c,
            change: self.d,
            change_percent: self.dp,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileResponse {
    name: Option<String>,
    ticker: Option<String>,
    exchange: Option<String>,
    /// Market capitalization (in millions)
    market_capitalization: Option<f64>,
}

impl From<ProfileResponse> for Profile {
    fn from(value: ProfileResponse) -> Self {
        Self {
            company_name: value.name.filter(|name| !name.trim().is_empty()),
            market_cap_millions: value.market_capitalization,
            exchange: value.exchange.filter(|exchange| !exchange.trim().is_empty()),
            ticker: value.ticker.filter(|ticker| !ticker.trim().is_empty()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct MetricResponse {
    metric: Option<MetricValues>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetricValues {
    pe_normalized_annual: Option<f64>,
    market_capitalization: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItem {
    #[serde(default)]
    description: String,
    #[serde(default)]
    display_symbol: String,
    #[serde(default)]
    symbol: String,
    #[serde(default, rename = "type")]
    security_type: String,
}

impl From<SearchItem> for SearchMatch {
    fn from(value: SearchItem) -> Self {
        Self {
            symbol: value.symbol,
            description: value.description,
            display_symbol: value.display_symbol,
            kind: value.security_type,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

/// Finnhub REST adapter.
///
/// One upstream GET per call, token sent as a header, no retries.
#[derive(Clone)]
pub struct FinnhubAdapter {
    http_client: Arc<dyn HttpClient>,
    api_key: Option<String>,
    base_url: String,
    timeout_ms: u64,
    throttle: RequestThrottle,
}

impl FinnhubAdapter {
    pub fn new(config: &WatchdeskConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            api_key: config.require_api_key().ok().map(str::to_owned),
            base_url: config.base_url.clone(),
            timeout_ms: config.timeout_ms,
            throttle: RequestThrottle::per_minute(config.rate_limit_per_minute),
        }
    }

    /// Adapter backed by the production reqwest transport.
    pub fn from_config(config: &WatchdeskConfig) -> Self {
        Self::new(config, Arc::new(ReqwestHttpClient::new()))
    }

    fn request(&self, path: &str) -> HttpRequest {
        let auth = self
            .api_key
            .as_ref()
            .map_or(HttpAuth::None, |token| HttpAuth::Header {
                name: String::from(TOKEN_HEADER),
                value: token.clone(),
            });

        HttpRequest::get(&self.base_url, path)
            .with_auth(&auth)
            .with_timeout_ms(self.timeout_ms)
    }

    async fn fetch<T>(&self, endpoint: Endpoint, request: HttpRequest) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        self.throttle.acquire().await;
        debug!(endpoint = %endpoint, path = %request.path_and_query(), "finnhub request");

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|error| ProviderError::Transport {
                endpoint,
                message: error.message().to_owned(),
            })?;

        if !response.is_success() {
            let body = serde_json::from_str::<ErrorResponse>(&response.body)
                .ok()
                .and_then(|parsed| parsed.error)
                .unwrap_or(response.body);
            return Err(ProviderError::Status {
                endpoint,
                status: response.status,
                body,
            });
        }

        serde_json::from_str(&response.body).map_err(|error| ProviderError::Decode {
            endpoint,
            message: error.to_string(),
        })
    }

    /// Fetches a news array, dropping elements that do not decode as articles.
    /// Only a body that is not an array at all fails.
    async fn fetch_feed(
        &self,
        endpoint: Endpoint,
        request: HttpRequest,
    ) -> Result<Vec<RawNewsArticle>, ProviderError> {
        let items: Vec<Value> = self.fetch(endpoint, request).await?;
        let total = items.len();

        let articles: Vec<RawNewsArticle> = items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| {
                serde_json::from_value(item)
                    .map_err(|error| {
                        debug!(
                            endpoint = %endpoint,
                            index,
                            error = %error,
                            "dropping undecodable article"
                        );
                    })
                    .ok()
            })
            .collect();

        if articles.len() < total {
            debug!(
                endpoint = %endpoint,
                kept = articles.len(),
                dropped = total - articles.len(),
                "news feed decoded with drops"
            );
        }
        Ok(articles)
    }
}

impl std::fmt::Debug for FinnhubAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinnhubAdapter")
            .field("base_url", &self.base_url)
            .field("has_api_key", &self.api_key.is_some())
            .field("timeout_ms", &self.timeout_ms)
            .field("throttle", &self.throttle)
            .finish()
    }
}

impl MarketDataSource for FinnhubAdapter {
    fn ensure_configured(&self) -> Result<(), ConfigError> {
        match self.api_key {
            Some(_) => Ok(()),
            None => Err(ConfigError::MissingApiKey {
                variables: API_KEY_VARIABLES,
            }),
        }
    }

    fn quote<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, Quote> {
        Box::pin(async move {
            let request = self.request("/quote").with_query("symbol", symbol.as_str());
            let response: QuoteResponse = self.fetch(Endpoint::Quote, request).await?;
            Ok(response.into_quote())
        })
    }

    fn profile<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, Profile> {
        Box::pin(async move {
            let request = self
                .request("/stock/profile2")
                .with_query("symbol", symbol.as_str());
            let response: ProfileResponse = self.fetch(Endpoint::Profile, request).await?;
            Ok(Profile::from(response))
        })
    }

    fn metric<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, Metric> {
        Box::pin(async move {
            let request = self
                .request("/stock/metric")
                .with_query("symbol", symbol.as_str())
                .with_query("metric", "all");
            let response: MetricResponse = self.fetch(Endpoint::Metric, request).await?;
            let values = response.metric.unwrap_or_default();
            Ok(Metric {
                pe_ratio_annual: values.pe_normalized_annual,
                market_cap_millions: values.market_capitalization,
            })
        })
    }

    fn search<'a>(&'a self, query: &'a str) -> SourceFuture<'a, Vec<SearchMatch>> {
        Box::pin(async move {
            let request = self.request("/search").with_query("q", query.trim());
            let response: SearchResponse = self.fetch(Endpoint::Search, request).await?;
            debug!(query = %query.trim(), results = response.result.len(), "finnhub search");
            Ok(response.result.into_iter().map(SearchMatch::from).collect())
        })
    }

    fn company_news<'a>(
        &'a self,
        symbol: &'a Symbol,
        range: DateRange,
    ) -> SourceFuture<'a, Vec<RawNewsArticle>> {
        Box::pin(async move {
            let request = self
                .request("/company-news")
                .with_query("symbol", symbol.as_str())
                .with_query("from", range.from_param())
                .with_query("to", range.to_param());
            self.fetch_feed(Endpoint::CompanyNews, request).await
        })
    }

    fn general_news<'a>(&'a self) -> SourceFuture<'a, Vec<RawNewsArticle>> {
        Box::pin(async move {
            let request = self.request("/news").with_query("category", "general");
            self.fetch_feed(Endpoint::GeneralNews, request).await
        })
    }
}

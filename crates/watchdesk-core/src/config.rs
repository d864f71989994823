//! Runtime configuration read from the environment.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `WATCHDESK_FINNHUB_API_KEY` (or `FINNHUB_API_KEY`) | none | Provider access token |
//! | `WATCHDESK_FINNHUB_BASE_URL` | `https://finnhub.io/api/v1` | Provider base URL |
//! | `WATCHDESK_HTTP_TIMEOUT_MS` | `5000` | Per-request timeout |
//! | `WATCHDESK_RATE_LIMIT_PER_MINUTE` | `60` | Client-side request budget, `0` disables |

use std::time::Duration;

use crate::data_source::Endpoint;
use crate::ConfigError;

pub const API_KEY_VAR: &str = "WATCHDESK_FINNHUB_API_KEY";
pub const FALLBACK_API_KEY_VAR: &str = "FINNHUB_API_KEY";
pub const BASE_URL_VAR: &str = "WATCHDESK_FINNHUB_BASE_URL";
pub const TIMEOUT_VAR: &str = "WATCHDESK_HTTP_TIMEOUT_MS";
pub const RATE_LIMIT_VAR: &str = "WATCHDESK_RATE_LIMIT_PER_MINUTE";

pub const API_KEY_VARIABLES: &str = "WATCHDESK_FINNHUB_API_KEY or FINNHUB_API_KEY";

pub const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";

/// Provider connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct WatchdeskConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_ms: u64,
    pub rate_limit_per_minute: u32,
}

impl WatchdeskConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = [API_KEY_VAR, FALLBACK_API_KEY_VAR]
            .into_iter()
            .filter_map(&lookup)
            .map(|value| value.trim().to_owned())
            .find(|value| !value.is_empty());

        let base_url = lookup(BASE_URL_VAR)
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| String::from(DEFAULT_BASE_URL));

        let timeout_ms = parse_number(&lookup, TIMEOUT_VAR)?.unwrap_or(5_000);
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                variable: TIMEOUT_VAR,
                value: String::from("0"),
                reason: String::from("timeout must be greater than zero"),
            });
        }

        let rate_limit_per_minute = parse_number(&lookup, RATE_LIMIT_VAR)?.unwrap_or(60);

        Ok(Self {
            api_key,
            base_url,
            timeout_ms,
            rate_limit_per_minute: u32::try_from(rate_limit_per_minute).map_err(|_| {
                ConfigError::InvalidValue {
                    variable: RATE_LIMIT_VAR,
                    value: rate_limit_per_minute.to_string(),
                    reason: String::from("value is too large"),
                }
            })?,
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_rate_limit_per_minute(mut self, limit: u32) -> Self {
        self.rate_limit_per_minute = limit;
        self
    }

    /// The token, or the configuration error every provider call reports.
    /// A blank token counts as missing.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::MissingApiKey {
                variables: API_KEY_VARIABLES,
            })
    }
}

impl Default for WatchdeskConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: 5_000,
            rate_limit_per_minute: 60,
        }
    }
}

impl std::fmt::Debug for WatchdeskConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchdeskConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish()
    }
}

fn parse_number<F>(lookup: &F, variable: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(variable) else {
        return Ok(None);
    };

    raw.trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|error| ConfigError::InvalidValue {
            variable,
            value: raw,
            reason: error.to_string(),
        })
}

/// Time-to-live per endpoint kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub quote: Duration,
    pub profile: Duration,
    pub metric: Duration,
    pub search: Duration,
    pub company_news: Duration,
    pub general_news: Duration,
}

impl CachePolicy {
    pub const fn ttl(&self, endpoint: Endpoint) -> Duration {
        match endpoint {
            Endpoint::Quote => self.quote,
            Endpoint::Profile => self.profile,
            Endpoint::Metric => self.metric,
            Endpoint::Search => self.search,
            Endpoint::CompanyNews => self.company_news,
            Endpoint::GeneralNews => self.general_news,
        }
    }

    /// Every endpoint uncached.
    pub const fn disabled() -> Self {
        Self {
            quote: Duration::ZERO,
            profile: Duration::ZERO,
            metric: Duration::ZERO,
            search: Duration::ZERO,
            company_news: Duration::ZERO,
            general_news: Duration::ZERO,
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            quote: Duration::from_secs(60),
            profile: Duration::from_secs(3_600),
            metric: Duration::from_secs(3_600),
            search: Duration::from_secs(1_800),
            company_news: Duration::from_secs(300),
            general_news: Duration::from_secs(300),
        }
    }
}

/// Tunables of the news slate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewsPolicy {
    /// Maximum articles returned.
    pub max_articles: usize,
    /// Trailing window for company news, in days.
    pub lookback_days: u16,
    /// Upper bound on unique general-news candidates examined. A work bound,
    /// not a semantic one.
    pub dedup_candidate_cap: usize,
    pub company_summary_chars: usize,
    pub general_summary_chars: usize,
}

impl Default for NewsPolicy {
    fn default() -> Self {
        Self {
            max_articles: 6,
            lookback_days: 5,
            dedup_candidate_cap: 20,
            company_summary_chars: 200,
            general_summary_chars: 150,
        }
    }
}

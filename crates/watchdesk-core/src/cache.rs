//! In-memory TTL caching for provider responses.
//!
//! Memoization is best-effort: concurrent misses for the same key may each
//! invoke the producer, and the last writer wins. There is no single-flight
//! guarantee and no background sweep; stale entries are overwritten on the
//! next miss or dropped by [`TtlCache::clear_expired`].

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::data_source::Endpoint;

/// Time source for expiry checks.
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock for deterministic expiry tests.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    elapsed: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut elapsed = self
            .elapsed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *elapsed += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let elapsed = *self
            .elapsed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        self.origin + elapsed
    }
}

/// Cache key: endpoint kind plus its normalized arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    endpoint: Endpoint,
    args: String,
}

impl CacheKey {
    pub fn new(endpoint: Endpoint, args: impl Into<String>) -> Self {
        Self {
            endpoint,
            args: args.into(),
        }
    }

    pub const fn endpoint(&self) -> Endpoint {
        self.endpoint
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.endpoint, self.args)
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    /// `None` when `now + ttl` is past the clock's range: never expires.
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |expires_at| now < expires_at)
    }
}

/// Thread-safe in-memory TTL cache.
#[derive(Debug, Clone)]
pub struct TtlCache<V> {
    entries: Arc<tokio::sync::RwLock<HashMap<CacheKey, CacheEntry<V>>>>,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(tokio::sync::RwLock::new(HashMap::new())),
            clock,
        }
    }

    /// Returns the live value for `key`, if any.
    pub async fn get(&self, key: &CacheKey) -> Option<V> {
        let now = self.clock.now();
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone())
    }

    /// Stores `value` until `now + ttl`. A zero TTL stores nothing.
    pub async fn insert(&self, key: CacheKey, value: V, ttl: Duration) {
        if ttl.is_zero() {
            return;
        }

        let expires_at = self.clock.now().checked_add(ttl);
        let mut entries = self.entries.write().await;
        entries.insert(key, CacheEntry { value, expires_at });
    }

    /// Returns the live value for `key`, or runs `producer`, stores its
    /// success for `ttl`, and returns it. Errors are returned and not cached.
    ///
    /// No lock is held while the producer runs.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        key: CacheKey,
        ttl: Duration,
        producer: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            debug!(key = %key, "cache hit");
            return Ok(value);
        }

        debug!(key = %key, "cache miss");
        let value = producer().await?;
        self.insert(key, value.clone(), ttl).await;
        Ok(value)
    }

    /// Remove expired entries from the cache.
    pub async fn clear_expired(&self) {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.is_live(now));
    }

    /// Clear all entries from the cache.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Number of stored entries, including expired ones not yet overwritten.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

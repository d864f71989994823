use std::num::NonZeroU32;
use std::sync::Arc;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Client-side request budget shared by every call of one adapter.
///
/// Callers wait for a permit instead of failing, so a burst over the budget
/// is spread out rather than rejected.
#[derive(Clone)]
pub struct RequestThrottle {
    limiter: Option<Arc<DirectRateLimiter>>,
    per_minute: u32,
}

impl RequestThrottle {
    /// A budget of `per_minute` requests; `0` disables throttling.
    pub fn per_minute(per_minute: u32) -> Self {
        let limiter = NonZeroU32::new(per_minute)
            .map(|limit| Arc::new(RateLimiter::direct(Quota::per_minute(limit))));
        Self {
            limiter,
            per_minute,
        }
    }

    pub fn unlimited() -> Self {
        Self::per_minute(0)
    }

    pub const fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }

    pub const fn limit_per_minute(&self) -> u32 {
        self.per_minute
    }

    /// Waits until the budget admits one more request.
    pub async fn acquire(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }

    /// Takes a permit without waiting; `false` when the budget is exhausted.
    pub fn try_acquire(&self) -> bool {
        self.limiter
            .as_ref()
            .map_or(true, |limiter| limiter.check().is_ok())
    }
}

impl Default for RequestThrottle {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl std::fmt::Debug for RequestThrottle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestThrottle")
            .field("per_minute", &self.per_minute)
            .finish()
    }
}

//! Per-route token-bucket rate limiting.
//!
//! State is owned by the router's `AppState` and injected as middleware, not
//! held as a process-global.

use super::{ApiError, AppState};
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Default request budget per route.
const DEFAULT_MAX_REQUESTS: u32 = 60;
/// Default budget window in seconds.
const DEFAULT_WINDOW_SECS: u64 = 60;

struct TokenBucket {
    capacity: f64,
    refill_rate: f64,
    tokens: f64,
    updated_at: Instant,
}

impl TokenBucket {
    fn new(capacity: f64, refill_rate: f64) -> Self {
        Self {
            capacity,
            refill_rate,
            tokens: capacity,
            updated_at: Instant::now(),
        }
    }

    /// Try to take one token. On refusal, returns the seconds until the
    /// bucket would hold one again.
    fn consume(&mut self) -> (bool, f64) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.updated_at).as_secs_f64();
        if elapsed > 0.0 {
            self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.capacity);
            self.updated_at = now;
        }
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            return (true, 0.0);
        }
        let needed = 1.0 - self.tokens;
        (false, needed / self.refill_rate)
    }
}

/// Token buckets keyed by route path.
pub struct RouteRateLimiter {
    capacity: f64,
    refill_rate: f64,
    buckets: Mutex<HashMap<String, TokenBucket>>,
}

impl Default for RouteRateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW_SECS)
    }
}

impl RouteRateLimiter {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        let capacity = f64::from(max_requests.max(1));
        let window = window_secs.max(1) as f64;
        Self {
            capacity,
            refill_rate: capacity / window,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Whether a request under `key` may proceed; on refusal the second
    /// element is the retry-after hint in seconds.
    pub fn allow(&self, key: &str) -> (bool, f64) {
        let mut buckets = self
            .buckets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::new(self.capacity, self.refill_rate))
            .consume()
    }
}

/// Middleware rejecting requests once a route's bucket runs dry.
pub async fn limit_requests(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let key = request.uri().path().to_string();
    let (allowed, retry_after) = state.limiter.allow(&key);
    if !allowed {
        return ApiError::too_many_requests(retry_after.ceil() as u64).into_response();
    }
    next.run(request).await
}

//! Per-client rate limiting for prediction endpoints.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;

use crate::observability::metrics;

/// A simple token bucket rate limiter.
#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn new(capacity: f64, now: Instant) -> Self {
        Self {
            tokens: capacity,
            last_update: now,
        }
    }

    fn try_acquire(&mut self, capacity: f64, refill_rate: f64, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.last_update).as_secs_f64();

        // Refill tokens
        self.tokens = (self.tokens + elapsed * refill_rate).min(capacity);
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Token buckets for one endpoint, keyed by client address.
#[derive(Debug)]
pub struct RateLimiter {
    endpoint: &'static str,
    capacity: f64,
    refill_per_sec: f64,
    window: Duration,
    buckets: DashMap<String, TokenBucket>,
    last_sweep: Mutex<Instant>,
}

impl RateLimiter {
    /// Allow `limit` requests per `window` per client, all of them usable as a burst.
    pub fn new(endpoint: &'static str, limit: u32, window: Duration) -> Self {
        let capacity = f64::from(limit);
        Self {
            endpoint,
            capacity,
            refill_per_sec: capacity / window.as_secs_f64(),
            window,
            buckets: DashMap::new(),
            last_sweep: Mutex::new(Instant::now()),
        }
    }

    pub fn per_minute(endpoint: &'static str, limit: u32) -> Self {
        Self::new(endpoint, limit, Duration::from_secs(60))
    }

    pub fn endpoint(&self) -> &'static str {
        self.endpoint
    }

    /// Spend one token for `client`. Returns false if the client is over its limit.
    pub fn check(&self, client: &str) -> bool {
        self.check_at(client, Instant::now())
    }

    pub fn check_at(&self, client: &str, now: Instant) -> bool {
        self.sweep_idle(now);

        let mut bucket = self
            .buckets
            .entry(client.to_string())
            .or_insert_with(|| TokenBucket::new(self.capacity, now));

        bucket.try_acquire(self.capacity, self.refill_per_sec, now)
    }

    /// Drop buckets idle for a full window, at most once per window.
    ///
    /// A bucket idle that long has refilled to capacity, so a fresh one is equivalent.
    fn sweep_idle(&self, now: Instant) {
        {
            let mut last_sweep = self.last_sweep.lock().expect("rate limiter mutex poisoned");
            if now.saturating_duration_since(*last_sweep) < self.window {
                return;
            }
            *last_sweep = now;
        }

        let before = self.buckets.len();
        let window = self.window;
        self.buckets
            .retain(|_, bucket| now.saturating_duration_since(bucket.last_update) < window);

        let removed = before.saturating_sub(self.buckets.len());
        if removed > 0 {
            tracing::debug!(endpoint = self.endpoint, removed, "Dropped idle rate limit buckets");
        }
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.buckets.len()
    }
}

fn client_key(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware rejecting requests over the endpoint's per-client limit.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client = client_key(&request);

    if limiter.check(&client) {
        next.run(request).await
    } else {
        tracing::warn!(client = %client, endpoint = limiter.endpoint(), "Rate limit exceeded");
        metrics::record_rate_limited(limiter.endpoint());
        (StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded").into_response()
    }
}

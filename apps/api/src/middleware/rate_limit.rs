//! Per-client-IP rate limiting with interval-refill token buckets.
//!
//! Each client IP gets a bucket of `capacity` tokens; the bucket refills to
//! full once `period` has elapsed since the window started. Simple and
//! in-process — one bucket map shared behind a mutex.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;

pub struct RateLimiter {
    capacity: u32,
    period: Duration,
    buckets: Mutex<HashMap<IpAddr, Bucket>>,
}

struct Bucket {
    tokens: u32,
    window_start: Instant,
}

impl RateLimiter {
    /// `capacity` requests per minute per client IP.
    pub fn per_minute(capacity: u32) -> Self {
        Self::new(capacity, Duration::from_secs(60))
    }

    pub fn new(capacity: u32, period: Duration) -> Self {
        Self {
            capacity,
            period,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Consumes one token for `ip`; `false` means the request must be
    /// rejected.
    pub fn try_acquire(&self, ip: IpAddr) -> bool {
        self.try_acquire_at(ip, Instant::now())
    }

    fn try_acquire_at(&self, ip: IpAddr, now: Instant) -> bool {
        let mut buckets = match self.buckets.lock() {
            Ok(guard) => guard,
            // A poisoned map only means another request panicked mid-insert;
            // the bucket data is still usable.
            Err(poisoned) => poisoned.into_inner(),
        };
        let bucket = buckets.entry(ip).or_insert(Bucket {
            tokens: self.capacity,
            window_start: now,
        });

        if now.duration_since(bucket.window_start) >= self.period {
            bucket.tokens = self.capacity;
            bucket.window_start = now;
        }

        if bucket.tokens > 0 {
            bucket.tokens -= 1;
            true
        } else {
            false
        }
    }
}

/// Axum middleware applying the limiter to every request that reaches it.
pub async fn rate_limit(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    if !state.rate_limiter.try_acquire(addr.ip()) {
        warn!(client_ip = %addr.ip(), "rate limit exceeded");
        return AppError::RateLimited.into_response();
    }
    next.run(request).await
}

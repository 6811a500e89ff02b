//! Fixed-window rate limiting for the assistant endpoints
//!
//! One counter per owner. A window opens on the first request and resets once it has fully
//! elapsed; requests beyond the limit inside a window are rejected.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use tight5::domain::services::guardrail::RATE_LIMIT_MESSAGE;

use crate::auth::{Owner, LOCAL_OWNER};
use crate::AppState;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug)]
pub struct FixedWindowRateLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl FixedWindowRateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Count one request for `key`; `false` when the limit is exceeded
    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    pub fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());

        // Drop expired windows
        windows.retain(|_, w| now.saturating_duration_since(w.started) < self.window);

        let entry = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if entry.count >= self.max_requests {
            return false;
        }
        entry.count += 1;
        true
    }
}

/// Rejects requests over the owner's quota with 429
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let owner = request
        .extensions()
        .get::<Owner>()
        .map(|o| o.as_str().to_string())
        .unwrap_or_else(|| LOCAL_OWNER.to_string());

    if !state.rate_limiter.check(&owner) {
        tracing::warn!("Rate limit exceeded for {}", owner);
        return Err((StatusCode::TOO_MANY_REQUESTS, RATE_LIMIT_MESSAGE.to_string()));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_limit() {
        let limiter = FixedWindowRateLimiter::new(3, Duration::from_secs(60));
        let now = Instant::now();
        assert!(limiter.check_at("alice", now));
        assert!(limiter.check_at("alice", now));
        assert!(limiter.check_at("alice", now));
        assert!(!limiter.check_at("alice", now));
    }

    #[test]
    fn test_owners_are_counted_separately() {
        let limiter = FixedWindowRateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();
        assert!(limiter.check_at("alice", now));
        assert!(limiter.check_at("bob", now));
        assert!(!limiter.check_at("alice", now));
    }

    #[test]
    fn test_window_resets_after_expiry() {
        let limiter = FixedWindowRateLimiter::new(1, Duration::from_secs(60));
        let start = Instant::now();
        assert!(limiter.check_at("alice", start));
        assert!(!limiter.check_at("alice", start + Duration::from_secs(59)));
        assert!(limiter.check_at("alice", start + Duration::from_secs(60)));
    }
}

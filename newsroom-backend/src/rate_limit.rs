//! Fixed-window request limiter for the `/api` surface.
//!
//! Each caller gets a window that opens on its first request. Within the
//! window at most `max_requests` calls are admitted; once the window has
//! elapsed the counter resets to zero with no carry-over.

use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::middleware::Next;
use actix_web::{web, Error, ResponseError};
use dashmap::DashMap;
use std::time::{Duration, Instant};

use crate::error::ApiError;
use crate::AppState;

/// Outcome of an admitted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub limit: u32,
    pub remaining: u32,
}

#[derive(Debug)]
struct WindowState {
    started_at: Instant,
    count: u32,
}

pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    /// Window state by caller key
    windows: DashMap<String, WindowState>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: DashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Count a request from `caller`, rejecting it if the window is exhausted.
    pub fn check(&self, caller: &str) -> Result<RateLimitStatus, ApiError> {
        self.check_at(caller, Instant::now())
    }

    fn check_at(&self, caller: &str, now: Instant) -> Result<RateLimitStatus, ApiError> {
        // The entry guard holds the shard lock, so reset + count is atomic per caller.
        let mut state = self
            .windows
            .entry(caller.to_string())
            .or_insert_with(|| WindowState { started_at: now, count: 0 });

        if now.duration_since(state.started_at) >= self.window {
            state.started_at = now;
            state.count = 0;
        }

        if state.count >= self.max_requests {
            log::warn!(
                "[RATE_LIMIT] Caller {} exceeded limit ({}/{} requests in {}s)",
                caller,
                state.count,
                self.max_requests,
                self.window.as_secs()
            );
            return Err(ApiError::RateLimited);
        }

        state.count += 1;
        Ok(RateLimitStatus {
            limit: self.max_requests,
            remaining: self.max_requests - state.count,
        })
    }

    /// Drop windows that have fully elapsed. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    fn purge_expired_at(&self, now: Instant) -> usize {
        let before = self.windows.len();
        self.windows
            .retain(|_, state| now.duration_since(state.started_at) < self.window);
        before - self.windows.len()
    }

    pub fn tracked_callers(&self) -> usize {
        self.windows.len()
    }
}

/// Caller identity used for limiting: the peer IP of the connection.
fn caller_key(req: &ServiceRequest) -> String {
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware for `actix_web::middleware::from_fn`.
///
/// Rejected requests never reach the wrapped handler.
pub async fn enforce_rate_limit<B: MessageBody + 'static>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, Error> {
    let Some(limiter) = req
        .app_data::<web::Data<AppState>>()
        .map(|state| state.rate_limiter.clone())
    else {
        return next.call(req).await.map(ServiceResponse::map_into_left_body);
    };

    let caller = caller_key(&req);
    match limiter.check(&caller) {
        Ok(status) => {
            let mut res = next.call(req).await?;
            let headers = res.headers_mut();
            headers.insert(
                HeaderName::from_static("x-ratelimit-limit"),
                HeaderValue::from(status.limit),
            );
            headers.insert(
                HeaderName::from_static("x-ratelimit-remaining"),
                HeaderValue::from(status.remaining),
            );
            Ok(res.map_into_left_body())
        }
        Err(e) => {
            let response = e.error_response();
            Ok(req.into_response(response).map_into_right_body())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fortieth_request_passes_forty_first_is_rejected() {
        let limiter = RateLimiter::new(40, Duration::from_secs(60));
        let start = Instant::now();

        for i in 1..=40 {
            let status = limiter
                .check_at("10.0.0.1", start + Duration::from_millis(i))
                .unwrap();
            assert_eq!(status.remaining, 40 - i as u32);
        }

        let result = limiter.check_at("10.0.0.1", start + Duration::from_secs(59));
        assert!(matches!(result, Err(ApiError::RateLimited)));
    }

    #[test]
    fn test_window_resets_without_carry_over() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let start = Instant::now();

        assert!(limiter.check_at("a", start).is_ok());
        assert!(limiter.check_at("a", start).is_ok());
        assert!(limiter.check_at("a", start + Duration::from_secs(30)).is_err());

        // Rejected calls do not extend or consume the next window
        let status = limiter.check_at("a", start + Duration::from_secs(60)).unwrap();
        assert_eq!(status.remaining, 1);
    }

    #[test]
    fn test_callers_are_counted_separately() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();

        assert!(limiter.check_at("a", now).is_ok());
        assert!(limiter.check_at("a", now).is_err());
        assert!(limiter.check_at("b", now).is_ok());
    }

    #[test]
    fn test_purge_drops_only_elapsed_windows() {
        let limiter = RateLimiter::new(5, Duration::from_secs(60));
        let start = Instant::now();

        limiter.check_at("old", start).unwrap();
        limiter.check_at("new", start + Duration::from_secs(45)).unwrap();

        let removed = limiter.purge_expired_at(start + Duration::from_secs(61));
        assert_eq!(removed, 1);
        assert_eq!(limiter.tracked_callers(), 1);
    }
}

// ABOUTME: Global request rate limiting backed by governor
// ABOUTME: One shared token bucket for the whole service; health checks bypass it

use std::{num::NonZeroU32, sync::Arc};

use axum::{
    extract::{Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use governor::{
    clock::{Clock, DefaultClock},
    middleware::NoOpMiddleware,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use todolist_api::AppError;
use tracing::{debug, warn};

/// Type alias for a rate limiter
type RateLimiterType = RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub requests_per_minute: u32,
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_minute: 60,
            burst_size: 10,
        }
    }
}

/// Shared limiter handed to the middleware as state
#[derive(Clone)]
pub struct GlobalRateLimiter {
    limiter: Arc<RateLimiterType>,
    clock: DefaultClock,
    config: RateLimitConfig,
}

impl GlobalRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let rpm = NonZeroU32::new(config.requests_per_minute).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.burst_size).unwrap_or(NonZeroU32::MIN);
        let clock = DefaultClock::default();
        let quota = Quota::per_minute(rpm).allow_burst(burst);

        debug!(rpm = %rpm, burst = %burst, "Created global rate limiter");

        Self {
            limiter: Arc::new(RateLimiter::direct(quota)),
            clock,
            config,
        }
    }

    /// Take one token, or report how many seconds until the next one
    fn check(&self) -> Result<(), u64> {
        self.limiter.check().map_err(|not_until| {
            let wait = not_until.wait_time_from(self.clock.now());
            (wait.as_secs() + u64::from(wait.subsec_nanos() > 0)).max(1)
        })
    }
}

/// Rate limiting middleware. Rejections become `AppError::RateLimitExceeded`.
pub async fn rate_limit_middleware(
    State(limiter): State<GlobalRateLimiter>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !limiter.config.enabled || request.uri().path() == "/health" {
        return Ok(next.run(request).await);
    }

    match limiter.check() {
        Ok(()) => {
            let mut response = next.run(request).await;
            response.headers_mut().insert(
                HeaderName::from_static("x-ratelimit-limit"),
                HeaderValue::from(limiter.config.requests_per_minute),
            );
            Ok(response)
        }
        Err(retry_after) => {
            warn!(
                path = %request.uri().path(),
                retry_after = %retry_after,
                "Rate limit exceeded"
            );
            Err(AppError::rate_limited(retry_after))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    fn app(config: RateLimitConfig) -> Router {
        let limiter = GlobalRateLimiter::new(config);
        Router::new()
            .route("/todolist", get(|| async { "ok" }))
            .route("/health", get(|| async { "ok" }))
            .layer(from_fn_with_state(limiter, rate_limit_middleware))
    }

    async fn status(app: &Router, uri: &str) -> StatusCode {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app.clone().oneshot(request).await.unwrap().status()
    }

    #[test]
    fn test_config_defaults() {
        let config = RateLimitConfig::default();
        assert!(config.enabled);
        assert_eq!(config.requests_per_minute, 60);
        assert_eq!(config.burst_size, 10);
    }

    #[test]
    fn test_burst_is_enforced() {
        let limiter = GlobalRateLimiter::new(RateLimitConfig {
            enabled: true,
            requests_per_minute: 1,
            burst_size: 2,
        });

        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_ok());

        let retry_after = limiter.check().unwrap_err();
        assert!(retry_after >= 1);
    }

    #[tokio::test]
    async fn test_middleware_rejects_over_limit() {
        let app = app(RateLimitConfig {
            enabled: true,
            requests_per_minute: 1,
            burst_size: 1,
        });

        assert_eq!(status(&app, "/todolist").await, StatusCode::OK);
        assert_eq!(status(&app, "/todolist").await, StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_health_bypasses_limit() {
        let app = app(RateLimitConfig {
            enabled: true,
            requests_per_minute: 1,
            burst_size: 1,
        });

        assert_eq!(status(&app, "/todolist").await, StatusCode::OK);
        assert_eq!(status(&app, "/health").await, StatusCode::OK);
        assert_eq!(status(&app, "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_disabled_limiter_lets_everything_through() {
        let app = app(RateLimitConfig {
            enabled: false,
            requests_per_minute: 1,
            burst_size: 1,
        });

        for _ in 0..5 {
            assert_eq!(status(&app, "/todolist").await, StatusCode::OK);
        }
    }
}

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::ConnectInfo;
use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::Response;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Fixed-window request counter keyed by client address.
#[derive(Debug)]
pub struct RateLimiter {
    max_attempts: u32,
    window: Duration,
    /// Map of client key -> (window start, attempts in window)
    attempts: Mutex<HashMap<String, (Instant, u32)>>,
}

impl RateLimiter {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            attempts: Mutex::new(HashMap::new()),
        }
    }

    /// Record an attempt for `key` and report whether it is allowed.
    pub async fn try_acquire(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut attempts = self.attempts.lock().await;

        attempts.retain(|_, (started, _)| now.duration_since(*started) < self.window);

        let (_, count) = attempts.entry(key.to_string()).or_insert((now, 0));
        *count += 1;

        *count <= self.max_attempts
    }
}

fn client_key(req: &Request) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(address)| address.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Middleware rejecting any request above the service-wide rate.
pub async fn limit_requests(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let client = client_key(&req);

    if !state.request_limiter.try_acquire(&client).await {
        tracing::warn!(client = %client, "Request rate limit exceeded");
        return Err(ApiError::TooManyRequests(
            "Too many requests, please try again later".to_string(),
        ));
    }

    Ok(next.run(req).await)
}

/// Middleware rejecting login attempts above the configured rate.
pub async fn limit_login(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let client = client_key(&req);

    if !state.login_limiter.try_acquire(&client).await {
        tracing::warn!(client = %client, "Login rate limit exceeded");
        return Err(ApiError::TooManyRequests(
            "Too many login attempts, please try again later".to_string(),
        ));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_blocks_after_max_attempts() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));

        assert!(limiter.try_acquire("10.0.0.1").await);
        assert!(limiter.try_acquire("10.0.0.1").await);
        assert!(!limiter.try_acquire("10.0.0.1").await);

        // Other clients have their own budget
        assert!(limiter.try_acquire("10.0.0.2").await);
    }

    #[tokio::test]
    async fn test_window_resets() {
        let limiter = RateLimiter::new(1, Duration::from_millis(50));

        assert!(limiter.try_acquire("10.0.0.1").await);
        assert!(!limiter.try_acquire("10.0.0.1").await);

        tokio::time::sleep(Duration::from_millis(80)).await;

        assert!(limiter.try_acquire("10.0.0.1").await);
    }
}

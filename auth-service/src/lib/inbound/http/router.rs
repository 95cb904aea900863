use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::header;
use axum::http::HeaderValue;
use axum::http::Method;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::AllowOrigin;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::cookies::CookieSettings;
use super::handlers::health::health;
use super::handlers::hello::hello;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::refresh_token::refresh_token;
use super::handlers::register::register;
use super::middleware::authenticate as auth_middleware;
use super::rate_limit::limit_login;
use super::rate_limit::limit_requests;
use super::rate_limit::RateLimiter;
use crate::config::Config;
use crate::domain::user::ports::AuthServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub authenticator: Arc<Authenticator>,
    pub cookies: CookieSettings,
    pub login_limiter: Arc<RateLimiter>,
    pub request_limiter: Arc<RateLimiter>,
}

/// Transport settings for the HTTP adapter.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub cookies: CookieSettings,
    pub allowed_origins: Vec<String>,
    pub login_max_attempts: u32,
    pub login_window: Duration,
    pub global_max_requests: u32,
    pub global_window: Duration,
}

impl HttpSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            cookies: CookieSettings::new(
                config.cookies.secure,
                time::Duration::days(config.jwt.refresh_token_ttl_days),
            ),
            allowed_origins: config.cors.allowed_origins.clone(),
            login_max_attempts: config.rate_limit.login_max_attempts,
            login_window: Duration::from_secs(config.rate_limit.login_window_seconds),
            global_max_requests: config.rate_limit.global_max_requests,
            global_window: Duration::from_secs(config.rate_limit.global_window_seconds),
        }
    }
}

pub fn create_router(
    auth_service: Arc<dyn AuthServicePort>,
    authenticator: Arc<Authenticator>,
    settings: HttpSettings,
) -> Router {
    let state = AppState {
        auth_service,
        authenticator,
        cookies: settings.cookies,
        login_limiter: Arc::new(RateLimiter::new(
            settings.login_max_attempts,
            settings.login_window,
        )),
        request_limiter: Arc::new(RateLimiter::new(
            settings.global_max_requests,
            settings.global_window,
        )),
    };

    let login_routes = Router::new()
        .route("/api/auth/login", post(login))
        .route_layer(middleware::from_fn_with_state(state.clone(), limit_login));

    let public_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/refresh-token", post(refresh_token))
        .route("/api/auth/logout", post(logout))
        .route("/health", get(health));

    let protected_routes = Router::new()
        .route("/api/auth/hello", get(hello))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(login_routes)
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn_with_state(state.clone(), limit_requests))
        .layer(trace_layer)
        .layer(cors_layer(&settings.allowed_origins))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=15552000; includeSubDomains"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("0"),
        ))
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter(|origin| {
            // A wildcard cannot be combined with credentials or an origin list
            if origin.trim() == "*" {
                tracing::warn!("Ignoring wildcard CORS origin");
                return false;
            }
            true
        })
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

#[cfg(test)]
mod tests {
    use auth::PasswordHasher;
    use auth::TokenSettings;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::user::service::AuthService;
    use crate::outbound::repositories::InMemoryUserRepository;

    fn test_router(login_max_attempts: u32) -> Router {
        test_router_with_limits(login_max_attempts, 100)
    }

    fn test_router_with_limits(login_max_attempts: u32, global_max_requests: u32) -> Router {
        let authenticator = Arc::new(Authenticator::new(
            TokenSettings::new("access-secret", "refresh-secret"),
            PasswordHasher::with_cost(8, 1, 1).unwrap(),
        ));
        let auth_service = Arc::new(AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::clone(&authenticator),
        ));

        create_router(
            auth_service,
            authenticator,
            HttpSettings {
                cookies: CookieSettings::new(false, time::Duration::days(7)),
                allowed_origins: vec!["http://localhost:8080".to_string()],
                login_max_attempts,
                login_window: Duration::from_secs(60),
                global_max_requests,
                global_window: Duration::from_secs(60),
            },
        )
    }

    fn login_request() -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"email":"a@x.com","password":"secret1"}"#))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_has_security_headers() {
        let response = test_router(5)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "DENY");
    }

    #[tokio::test]
    async fn test_hello_requires_token() {
        let response = test_router(5)
            .oneshot(
                Request::builder()
                    .uri("/api/auth/hello")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_limited_without_peer_address() {
        let router = test_router(1);

        let first = router.clone().oneshot(login_request()).await.unwrap();
        assert_eq!(first.status(), StatusCode::UNAUTHORIZED);

        let second = router.oneshot(login_request()).await.unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_invalid_origins_are_skipped() {
        // Construction must not panic on unparsable entries
        let _ = cors_layer(&["http://ok.example".to_string(), "bad\norigin".to_string()]);
    }

    #[test]
    fn test_wildcard_origin_is_skipped() {
        let _ = cors_layer(&["*".to_string()]);
        let _ = cors_layer(&["http://ok.example".to_string(), " * ".to_string()]);
    }

    #[tokio::test]
    async fn test_wildcard_origin_is_not_echoed() {
        let authenticator = Arc::new(Authenticator::new(
            TokenSettings::new("access-secret", "refresh-secret"),
            PasswordHasher::with_cost(8, 1, 1).unwrap(),
        ));
        let auth_service = Arc::new(AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::clone(&authenticator),
        ));
        let router = create_router(
            auth_service,
            authenticator,
            HttpSettings {
                cookies: CookieSettings::new(false, time::Duration::days(7)),
                allowed_origins: vec!["*".to_string()],
                login_max_attempts: 5,
                login_window: Duration::from_secs(60),
                global_max_requests: 100,
                global_window: Duration::from_secs(60),
            },
        );

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, "http://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(!response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn test_every_route_is_rate_limited() {
        let router = test_router_with_limits(100, 2);

        for _ in 0..2 {
            let response = router
                .clone()
                .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    }
}

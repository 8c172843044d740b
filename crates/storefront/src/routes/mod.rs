//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health               - Liveness
//! GET    /health/ready         - Readiness (database reachable)
//!
//! # Auth
//! POST   /api/auth/register    - Create account, returns token + user
//! POST   /api/auth/login       - Authenticate, returns token + user
//! GET    /api/auth/me          - Current user (bearer)
//!
//! # Products
//! GET    /api/products         - Catalog
//! GET    /api/products/{id}    - One product
//! POST   /api/products         - Create (admin)
//! PUT    /api/products/{id}    - Replace (admin)
//! DELETE /api/products/{id}    - Delete (admin)
//!
//! # Orders (bearer)
//! POST   /api/orders           - Place an order
//! GET    /api/orders           - Own orders, or all for admins
//! GET    /api/orders/{id}      - One order with its lines (owner or admin)
//!
//! # Users
//! GET    /api/users            - All accounts (admin)
//! ```

pub mod auth;
pub mod health;
pub mod orders;
pub mod products;
pub mod users;

use std::time::Duration;

use axum::{
    Router,
    http::{
        Method, Request, Response,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware,
    routing::get,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tracing::Span;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    use axum::routing::post;

    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::create))
        .route("/{id}", get(orders::show))
}

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .nest("/orders", order_routes())
        .route("/users", get(users::index))
}

/// Build the complete application: routes, state and the HTTP middleware stack.
///
/// Sentry layers are added by the binary, outside this router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri().path(),
                        request_id = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(|response: &Response<_>, latency: Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record(
                        "latency_ms",
                        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                    );
                    DefaultOnResponse::default().on_response(response, latency, span);
                }),
        )
        .layer(cors_layer())
        .with_state(state)
}

/// Bearer-token API: any origin, no cookies.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header::AUTHORIZATION},
    };
    use chrono::Duration;
    use secrecy::SecretString;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::{LogFormat, StorefrontConfig};
    use crate::db::{UserRepository, create_memory_pool};
    use crate::middleware::REQUEST_ID_HEADER;

    async fn test_app() -> (Router, AppState) {
        let config = StorefrontConfig {
            database_url: SecretString::from("sqlite::memory:"),
            host: [127, 0, 0, 1].into(),
            port: 0,
            jwt_secret: SecretString::from("k9$Qz!2mP#8vL@4xR&7nT^1wY*6bC%3d"),
            token_ttl: Duration::hours(1),
            log_format: LogFormat::Pretty,
            sentry_dsn: None,
            sentry_environment: None,
        };
        let state = AppState::new(config, create_memory_pool().await.unwrap());
        (app(state.clone()), state)
    }

    async fn json_body(response: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn token_for(state: &AppState, email: &str, role: apex_core::Role) -> String {
        let user = UserRepository::new(state.pool())
            .create("Tester", &apex_core::Email::parse(email).unwrap(), "hash", role)
            .await
            .unwrap();
        state.tokens().issue(&user).unwrap()
    }

    #[tokio::test]
    async fn test_health_sets_request_id() {
        let (app, _) = test_app().await;
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_readiness() {
        let (app, _) = test_app().await;
        let response = app
            .oneshot(Request::get("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_orders_require_token() {
        let (app, _) = test_app().await;
        let response = app
            .oneshot(Request::get("/api/orders").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error"], "Authentication required");
    }

    #[tokio::test]
    async fn test_users_require_admin() {
        let (app, state) = test_app().await;
        let token = token_for(&state, "user@x.com", apex_core::Role::User).await;

        let response = app
            .oneshot(
                Request::get("/api/users")
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (app, _) = test_app().await;
        let response = app
            .oneshot(
                Request::post("/api/auth/login")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_bad_request() {
        let (app, _) = test_app().await;
        let response = app
            .oneshot(Request::get("/api/products/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_product_is_not_found() {
        let (app, _) = test_app().await;
        let response = app
            .oneshot(Request::get("/api/products/42").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "product 42 not found");
    }
}

//! Integration test harness for Apex Storefront.
//!
//! Each [`TestContext`] serves the full router on an ephemeral local port
//! backed by a fresh in-memory database, and drives it over HTTP with
//! `reqwest`. Helpers panic on failure; this crate only backs tests.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p apex-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;

use apex_core::{Email, Role};
use apex_storefront::config::{LogFormat, StorefrontConfig};
use apex_storefront::db::{UserRepository, create_memory_pool};
use apex_storefront::routes;
use apex_storefront::services::auth::hash_password;
use apex_storefront::state::AppState;
use reqwest::{Client, Response, StatusCode};
use secrecy::SecretString;
use serde_json::{Value, json};
use sqlx::SqlitePool;

/// Signing secret used by every test server.
pub const TEST_JWT_SECRET: &str = "k9$Qz!2mP#8vL@4xR&7nT^1wY*6bC%3d";

/// A running storefront with its own database.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub pool: SqlitePool,
}

impl TestContext {
    /// Start a server on `127.0.0.1:0` with a migrated in-memory database.
    ///
    /// # Panics
    ///
    /// Panics if the database or listener cannot be set up.
    pub async fn new() -> Self {
        let pool = create_memory_pool()
            .await
            .expect("in-memory database should migrate");

        let config = StorefrontConfig {
            database_url: SecretString::from("sqlite::memory:"),
            host: [127, 0, 0, 1].into(),
            port: 0,
            jwt_secret: SecretString::from(TEST_JWT_SECRET),
            token_ttl: chrono::Duration::hours(1),
            log_format: LogFormat::Pretty,
            sentry_dsn: None,
            sentry_environment: None,
        };
        let app = routes::app(AppState::new(config.clone(), pool.clone()));

        let listener = tokio::net::TcpListener::bind(config.socket_addr())
            .await
            .expect("ephemeral port should bind");
        let addr: SocketAddr = listener.local_addr().expect("listener has an address");
        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("test server should run");
        });

        Self {
            client: Client::new(),
            base_url: format!("http://{addr}"),
            pool,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `GET path`, optionally with a bearer token.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str, token: Option<&str>) -> Response {
        let mut request = self.client.get(self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("request should be sent")
    }

    /// `method path` with a JSON body, optionally with a bearer token.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn send_json(
        &self,
        method: reqwest::Method,
        path: &str,
        token: Option<&str>,
        body: &Value,
    ) -> Response {
        let mut request = self.client.request(method, self.url(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("request should be sent")
    }

    /// `POST path` with a JSON body.
    pub async fn post(&self, path: &str, token: Option<&str>, body: &Value) -> Response {
        self.send_json(reqwest::Method::POST, path, token, body).await
    }

    /// Register an account through the API and return its token.
    ///
    /// # Panics
    ///
    /// Panics if registration does not succeed.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> String {
        let response = self
            .post(
                "/api/auth/register",
                None,
                &json!({ "name": name, "email": email, "password": password }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK, "registration failed");
        token_of(response).await
    }

    /// Create an admin directly in the database, log in, and return its token.
    ///
    /// # Panics
    ///
    /// Panics if the account cannot be created or login fails.
    pub async fn admin_token(&self) -> String {
        let email = "root@apex.com";
        let password = "admin-pass-1";
        let hash = hash_password(password).expect("password should hash");
        UserRepository::new(&self.pool)
            .create(
                "Root",
                &Email::parse(email).expect("valid email"),
                &hash,
                Role::Admin,
            )
            .await
            .expect("admin should be created");

        let response = self
            .post(
                "/api/auth/login",
                None,
                &json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK, "admin login failed");
        token_of(response).await
    }

    /// Create a product through the admin API and return its id.
    ///
    /// # Panics
    ///
    /// Panics if creation does not succeed.
    pub async fn create_product(&self, admin: &str, price: &str, stock: u32) -> i64 {
        let response = self
            .post(
                "/api/products",
                Some(admin),
                &json!({
                    "name": "Apex Sneakers Runner Pro",
                    "description": "Light and breathable.",
                    "price": price,
                    "image": "/img/runner.jpg",
                    "stock": stock,
                    "sizes": ["40", "41", "42"],
                    "featured": false,
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED, "product creation failed");
        json_of(response).await["id"]
            .as_i64()
            .expect("product id is a number")
    }

    /// Current stock of a product, read through the public API.
    ///
    /// # Panics
    ///
    /// Panics if the product cannot be read.
    pub async fn stock_of(&self, product_id: i64) -> u64 {
        let response = self.get(&format!("/api/products/{product_id}"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        json_of(response).await["stock"]
            .as_u64()
            .expect("stock is a number")
    }

    /// Number of rows in `table`.
    ///
    /// # Panics
    ///
    /// Panics if the query fails.
    pub async fn count_rows(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .expect("count query should run")
    }
}

/// A complete order body with `(product id, size, quantity)` lines.
#[must_use]
pub fn order_body(lines: &[(i64, &str, u32)]) -> Value {
    let items: Vec<Value> = lines
        .iter()
        .map(|(product_id, size, quantity)| {
            json!({ "productId": product_id, "size": size, "quantity": quantity })
        })
        .collect();

    json!({
        "items": items,
        "shippingInfo": {
            "firstName": "Linh",
            "lastName": "Tran",
            "address": "12 Le Loi",
            "city": "Ho Chi Minh City",
            "postalCode": "700000",
            "country": "Vietnam",
        },
        "paymentMethod": "cod",
    })
}

/// Parse a JSON response body.
///
/// # Panics
///
/// Panics if the body is not JSON.
pub async fn json_of(response: Response) -> Value {
    response.json().await.expect("response body should be JSON")
}

/// The `token` field of an auth response.
///
/// # Panics
///
/// Panics if the body has no token.
pub async fn token_of(response: Response) -> String {
    json_of(response).await["token"]
        .as_str()
        .expect("auth response carries a token")
        .to_owned()
}

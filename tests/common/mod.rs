//! Router test utilities.
//! Note: #[allow(dead_code)] because each test file compiles common/ separately.

use axum::Router;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Request, StatusCode};
use axum::routing::get;
use ceramika_maintenance::config::{AppConfig, database};
use ceramika_maintenance::web::cookie::MAINTENANCE_COOKIE;
use ceramika_maintenance::web::{AppState, create_router};
use serde_json::Value;
use tower::ServiceExt;

/// Token accepted by the admin endpoints in tests.
#[allow(dead_code)]
pub const ADMIN_TOKEN: &str = "test-admin-token";

/// A router wired like production, with a stub storefront.
#[allow(dead_code)]
pub struct TestServer {
    pub router: Router,
    pub state: AppState,
}

#[allow(dead_code)]
impl TestServer {
    /// Server over a fresh in-memory database with no maintenance row.
    pub async fn new() -> Self {
        Self::with_config(test_config(), true).await
    }

    /// Server whose store fails every query.
    pub async fn unreachable() -> Self {
        Self::with_config(test_config(), false).await
    }

    /// Server with a custom configuration.
    pub async fn with_config(config: AppConfig, create_tables: bool) -> Self {
        let db = database::create_connection("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");
        if create_tables {
            database::create_tables(&db)
                .await
                .expect("Failed to create tables");
        }

        let state = AppState::new(db, &config);
        let router = create_router(state.clone(), storefront());
        Self { router, state }
    }

    /// Send a request and collect the parts tests look at.
    pub async fn send(&self, request: TestRequest<'_>) -> TestResponse {
        let mut builder = Request::builder().method(request.method).uri(request.uri);

        if let Some(value) = request.cookie {
            builder = builder.header(COOKIE, format!("{MAINTENANCE_COOKIE}={value}"));
        }
        if let Some(token) = request.token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match request.body {
            Some(raw) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Body::from(raw.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let set_cookie = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with(&format!("{MAINTENANCE_COOKIE}=")))
            .map(str::to_string);

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            location,
            set_cookie,
            json,
        }
    }
}

/// A request description for [`TestServer::send`].
#[allow(dead_code)]
#[derive(Clone, Copy)]
pub struct TestRequest<'a> {
    pub method: &'a str,
    pub uri: &'a str,
    pub cookie: Option<&'a str>,
    pub token: Option<&'a str>,
    pub body: Option<&'a str>,
}

#[allow(dead_code)]
impl<'a> TestRequest<'a> {
    pub const fn get(uri: &'a str) -> Self {
        Self {
            method: "GET",
            uri,
            cookie: None,
            token: None,
            body: None,
        }
    }

    pub const fn post(uri: &'a str) -> Self {
        Self {
            method: "POST",
            uri,
            cookie: None,
            token: None,
            body: None,
        }
    }

    pub fn cookie(mut self, value: &'a str) -> Self {
        self.cookie = Some(value);
        self
    }

    pub fn token(mut self, token: &'a str) -> Self {
        self.token = Some(token);
        self
    }

    pub fn body(mut self, body: &'a str) -> Self {
        self.body = Some(body);
        self
    }
}

/// What tests inspect on a response.
#[allow(dead_code)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub set_cookie: Option<String>,
    pub json: Value,
}

#[allow(dead_code)]
impl TestResponse {
    /// Value of the maintenance cookie set by this response, if any.
    pub fn maintenance_cookie(&self) -> Option<&str> {
        let raw = self.set_cookie.as_deref()?;
        let pair = raw.split(';').next()?;
        pair.split_once('=').map(|(_, value)| value)
    }
}

/// Test-friendly configuration with an admin token and no env default.
#[allow(dead_code)]
pub fn test_config() -> AppConfig {
    AppConfig {
        admin_token: Some(ADMIN_TOKEN.to_string()),
        maintenance_default: None,
        ..AppConfig::default()
    }
}

fn storefront() -> Router {
    Router::new()
        .route("/", get(|| async { "home" }))
        .route("/collections", get(|| async { "collections" }))
        .route("/products/{id}", get(|| async { "product" }))
        .route("/admin/dashboard", get(|| async { "dashboard" }))
        .route("/customer/login", get(|| async { "login" }))
}

//! Web layer - HTTP routes, gate middleware and shared request state
//!
//! This module exposes the maintenance API, mounts the storefront behind the
//! maintenance gate, and owns the state every handler receives.

/// Admin bearer-token check
pub mod auth;
/// Maintenance cookie construction and parsing
pub mod cookie;
/// API error type and JSON error body
pub mod error;
/// Route handlers
pub mod handlers;
/// Gate middleware
pub mod middleware;

use crate::cache::MaintenanceCache;
use crate::config::AppConfig;
use crate::core::gate::{EdgeGate, MAINTENANCE_PATH};
use crate::web::cookie::CookieSettings;
use axum::Router;
use axum::routing::{get, post};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared data available to all handlers.
///
/// Only the handlers see the database connection; the gate middleware is
/// handed the [`EdgeGate`] alone.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database connection for the settings store
    pub database: DatabaseConnection,
    /// Maintenance gate and, through it, the memory cache
    pub gate: Arc<EdgeGate>,
    /// Attributes of issued maintenance cookies
    pub cookie: CookieSettings,
    /// `MAINTENANCE_MODE` default, reused when the admin view cannot read the store
    pub maintenance_default: Option<bool>,
    /// SHA-256 (hex) of the admin bearer token, if one is configured
    pub admin_token_hash: Option<Arc<str>>,
}

impl AppState {
    /// Builds the state from a connection and the loaded configuration.
    #[must_use]
    pub fn new(database: DatabaseConnection, config: &AppConfig) -> Self {
        let cache = Arc::new(MaintenanceCache::new(config.cache_ttl()));
        Self {
            database,
            gate: Arc::new(EdgeGate::new(cache, config.maintenance_default)),
            cookie: CookieSettings::new(config.cookie_max_age_days, config.cookie_secure),
            maintenance_default: config.maintenance_default,
            admin_token_hash: config
                .admin_token
                .as_deref()
                .map(|token| Arc::from(auth::hash_token(token))),
        }
    }

    /// The process memory cache shared with the gate.
    #[must_use]
    pub fn cache(&self) -> &Arc<MaintenanceCache> {
        self.gate.cache()
    }
}

/// Create the application router.
///
/// `storefront` carries the site's own pages; it must not define routes under
/// the maintenance API or `/maintenance`. The gate wraps every route and the
/// fallback, so unknown paths are gated too.
pub fn create_router(state: AppState, storefront: Router) -> Router {
    let api_routes = Router::new()
        // Public synchronization endpoints
        .route("/api/maintenance/status", get(handlers::status))
        .route("/api/maintenance/init", get(handlers::init))
        .route("/api/maintenance/sync", get(handlers::sync))
        // Admin endpoints
        .route(
            "/api/admin/maintenance",
            get(handlers::get_state).post(handlers::set_state),
        )
        .route("/api/admin/maintenance/activate", post(handlers::activate))
        .route(
            "/api/admin/maintenance/deactivate",
            post(handlers::deactivate),
        )
        .route(MAINTENANCE_PATH, get(handlers::maintenance_page))
        .with_state(state.clone());

    Router::new()
        .merge(api_routes)
        .merge(storefront)
        .layer(axum::middleware::from_fn_with_state(
            Arc::clone(&state.gate),
            middleware::maintenance_gate,
        ))
        .layer(TraceLayer::new_for_http())
}

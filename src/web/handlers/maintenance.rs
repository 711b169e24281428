//! Public maintenance endpoints: status, init and sync.
//!
//! All three re-read the durable setting and emit the maintenance cookie. A
//! store failure resolves to "not in maintenance" and a `false` cookie.

use crate::cache::refresh_maintenance_cache;
use crate::core::setting::load_maintenance_setting;
use crate::web::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

/// Body of `GET /api/maintenance/status`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Current maintenance state
    pub maintenance: bool,
    /// Last write of the setting (ISO 8601), or the response time if never written
    pub updated_at: String,
    /// Present when the store could not be read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of `GET /api/maintenance/init`.
#[derive(Debug, Serialize)]
pub struct InitResponse {
    /// Whether the store was read successfully
    pub success: bool,
    /// Maintenance state now in effect
    pub maintenance: bool,
    /// Human-readable outcome
    pub message: String,
}

/// Success body of `GET /api/maintenance/sync`.
#[derive(Debug, Serialize)]
pub struct SyncResponse {
    /// Maintenance state now in effect
    pub maintenance: bool,
}

/// Failure body of `GET /api/maintenance/sync`.
#[derive(Debug, Serialize)]
pub struct SyncErrorResponse {
    /// Always `false`: a failed sync never blocks traffic
    pub maintenance: bool,
    /// Human-readable failure
    pub error: String,
}

/// Reports the persisted maintenance state and mirrors it into the cookie.
pub async fn status(State(state): State<AppState>, jar: CookieJar) -> Response {
    match load_maintenance_setting(&state.database).await {
        Ok(setting) => {
            let updated_at = setting
                .updated_at
                .map_or_else(Utc::now, |at| at.and_utc())
                .to_rfc3339_opts(SecondsFormat::Millis, true);
            let jar = state.cookie.apply(jar, setting.active);
            (
                jar,
                Json(StatusResponse {
                    maintenance: setting.active,
                    updated_at,
                    error: None,
                }),
            )
                .into_response()
        }
        Err(e) => {
            warn!("Maintenance status unavailable, reporting off: {}", e);
            let jar = state.cookie.apply(jar, false);
            (
                jar,
                Json(StatusResponse {
                    maintenance: false,
                    updated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                    error: Some("Database unavailable".to_string()),
                }),
            )
                .into_response()
        }
    }
}

/// Startup synchronization: refreshes the memory cache and the cookie.
pub async fn init(State(state): State<AppState>, jar: CookieJar) -> Response {
    match refresh_maintenance_cache(&state.database, state.cache()).await {
        Ok(active) => {
            info!("Maintenance cache initialized: {}", active);
            let jar = state.cookie.apply(jar, active);
            (
                jar,
                Json(InitResponse {
                    success: true,
                    maintenance: active,
                    message: "Maintenance state synchronized with the database".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!("Maintenance init failed, forcing maintenance off: {}", e);
            let jar = state.cookie.apply(jar, false);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                jar,
                Json(InitResponse {
                    success: false,
                    maintenance: false,
                    message: "Database error - maintenance disabled".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// On-demand synchronization: refreshes the memory cache and the cookie.
pub async fn sync(State(state): State<AppState>, jar: CookieJar) -> Response {
    match refresh_maintenance_cache(&state.database, state.cache()).await {
        Ok(active) => {
            let jar = state.cookie.apply(jar, active);
            (jar, Json(SyncResponse { maintenance: active })).into_response()
        }
        Err(e) => {
            error!("Maintenance sync failed: {}", e);
            let jar = state.cookie.apply(jar, false);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                jar,
                Json(SyncErrorResponse {
                    maintenance: false,
                    error: "Synchronization failed".to_string(),
                }),
            )
                .into_response()
        }
    }
}

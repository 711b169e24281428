//! Admin maintenance endpoints.
//!
//! Every write persists the setting first. Only once the store has accepted it
//! are the memory cache and the cookie updated; a failed write changes nothing.

use crate::core::setting::{load_maintenance_setting, write_maintenance_mode};
use crate::web::AppState;
use crate::web::auth::AdminSession;
use crate::web::error::{ApiError, ApiResult};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Body of the activate/deactivate responses.
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    /// Always `true` on success; failures use the error body
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
}

/// Body of `GET /api/admin/maintenance`.
#[derive(Debug, Serialize)]
pub struct AdminStateResponse {
    /// Persisted maintenance state
    #[serde(rename = "maintenanceMode")]
    pub maintenance_mode: bool,
}

/// Request body of `POST /api/admin/maintenance`.
#[derive(Debug, Deserialize)]
pub struct SetMaintenanceRequest {
    /// Desired maintenance state
    pub maintenance: bool,
}

/// Body of `POST /api/admin/maintenance`.
#[derive(Debug, Serialize)]
pub struct SetMaintenanceResponse {
    /// Always `true` on success
    pub success: bool,
    /// Maintenance state now persisted
    #[serde(rename = "maintenanceMode")]
    pub maintenance_mode: bool,
    /// Human-readable outcome
    pub message: String,
}

async fn persist_and_propagate(state: &AppState, jar: CookieJar, active: bool) -> ApiResult<CookieJar> {
    write_maintenance_mode(&state.database, active).await?;
    state.cache().refresh(active);
    info!("Maintenance mode switched {}", if active { "on" } else { "off" });
    Ok(state.cookie.apply(jar, active))
}

const fn toggle_message(active: bool) -> &'static str {
    if active {
        "Maintenance mode activated"
    } else {
        "Maintenance mode deactivated"
    }
}

/// Turns maintenance on.
pub async fn activate(
    _admin: AdminSession,
    State(state): State<AppState>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Json<ToggleResponse>)> {
    let jar = persist_and_propagate(&state, jar, true).await?;
    Ok((
        jar,
        Json(ToggleResponse {
            success: true,
            message: toggle_message(true).to_string(),
        }),
    ))
}

/// Turns maintenance off.
pub async fn deactivate(
    _admin: AdminSession,
    State(state): State<AppState>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Json<ToggleResponse>)> {
    let jar = persist_and_propagate(&state, jar, false).await?;
    Ok((
        jar,
        Json(ToggleResponse {
            success: true,
            message: toggle_message(false).to_string(),
        }),
    ))
}

/// Reports the persisted state to the admin dashboard.
///
/// Falls back to the configured environment default when the store fails.
pub async fn get_state(_admin: AdminSession, State(state): State<AppState>) -> Json<AdminStateResponse> {
    let maintenance_mode = match load_maintenance_setting(&state.database).await {
        Ok(setting) => setting.active,
        Err(e) => {
            warn!("Maintenance store unavailable, using environment default: {}", e);
            state.maintenance_default.unwrap_or(false)
        }
    };
    Json(AdminStateResponse { maintenance_mode })
}

/// Sets maintenance from a `{ "maintenance": bool }` body.
pub async fn set_state(
    _admin: AdminSession,
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<SetMaintenanceRequest>, JsonRejection>,
) -> ApiResult<(CookieJar, Json<SetMaintenanceResponse>)> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let jar = persist_and_propagate(&state, jar, request.maintenance).await?;
    Ok((
        jar,
        Json(SetMaintenanceResponse {
            success: true,
            maintenance_mode: request.maintenance,
            message: toggle_message(request.maintenance).to_string(),
        }),
    ))
}

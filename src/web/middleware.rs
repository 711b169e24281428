//! Maintenance gate middleware.

use crate::core::gate::{EdgeGate, GateDecision, MAINTENANCE_PATH};
use crate::web::cookie::read_maintenance_cookie;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::debug;

/// Runs the gate ahead of every route and redirects blocked requests to the
/// maintenance page.
pub async fn maintenance_gate(
    State(gate): State<Arc<EdgeGate>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let decision = gate.decide(request.uri().path(), read_maintenance_cookie(&jar));

    match decision {
        GateDecision::Allow => next.run(request).await,
        GateDecision::Redirect => {
            debug!(path = %request.uri().path(), "Maintenance active, redirecting");
            Redirect::temporary(MAINTENANCE_PATH).into_response()
        }
    }
}

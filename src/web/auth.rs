//! Admin authentication for the maintenance API.
//!
//! Session issuance belongs to the storefront; this module only checks the
//! bearer token an admin caller presents against the configured one.

use crate::web::AppState;
use crate::web::error::ApiError;
use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use sha2::{Digest, Sha256};
use tracing::warn;

/// Proof that the request comes from an authenticated admin.
#[derive(Debug, Clone, Copy)]
pub struct AdminSession;

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.admin_token_hash.as_deref() else {
            warn!("Admin request rejected: no admin token configured");
            return Err(ApiError::Unauthorized("admin access is not configured".to_string()));
        };

        let token = extract_bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::Unauthorized("missing bearer token".to_string()))?;

        if hash_token(token) == expected {
            Ok(Self)
        } else {
            warn!(path = %parts.uri.path(), "Admin request rejected: invalid token");
            Err(ApiError::Unauthorized("invalid admin token".to_string()))
        }
    }
}

/// Extract bearer token from Authorization header.
/// Per RFC 6750, the "Bearer" scheme is case-insensitive.
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            let (scheme, token) = v.split_once(' ')?;
            scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
        })
        .filter(|token| !token.is_empty())
}

/// Hash a token for comparison.
#[must_use]
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

//! Request gate for maintenance mode.
//!
//! Decides, before any route runs, whether a request may proceed or must be
//! sent to the maintenance page. The gate only holds the memory cache and the
//! configured default; it has no database handle and performs no I/O.

use crate::cache::MaintenanceCache;
use crate::core::resolve::{ResolveInputs, StateSource, resolve};
use std::sync::Arc;
use std::time::Instant;
use tracing::trace;

/// Path of the static maintenance notice.
pub const MAINTENANCE_PATH: &str = "/maintenance";

/// Path prefixes that stay reachable during maintenance, so the admin can
/// always get back to the switch.
pub const ALLOWED_PATH_PREFIXES: [&str; 11] = [
    "/admin",
    "/customer/login",
    "/customer/forgot-password",
    "/api/auth",
    "/api/admin",
    "/api/maintenance",
    MAINTENANCE_PATH,
    "/_next",
    "/static",
    "/assets",
    "/favicon",
];

/// File extensions served as static assets; never gated.
const STATIC_ASSET_EXTENSIONS: [&str; 21] = [
    "html", "htm", "css", "js", "jpg", "jpeg", "webp", "png", "gif", "svg", "ttf", "woff",
    "woff2", "ico", "csv", "doc", "docx", "xls", "xlsx", "zip", "webmanifest",
];

/// Outcome of the gate for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Let the request through
    Allow,
    /// Redirect to [`MAINTENANCE_PATH`]
    Redirect,
}

/// Returns true when `path` must bypass the maintenance check.
#[must_use]
pub fn is_path_allowed(path: &str) -> bool {
    ALLOWED_PATH_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
        || is_static_asset(path)
}

fn is_static_asset(path: &str) -> bool {
    let last_segment = path.rsplit('/').next().unwrap_or(path);
    last_segment
        .rsplit_once('.')
        .is_some_and(|(stem, ext)| {
            !stem.is_empty()
                && STATIC_ASSET_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Synchronous maintenance gate shared by every request of the process.
#[derive(Debug)]
pub struct EdgeGate {
    cache: Arc<MaintenanceCache>,
    env_default: Option<bool>,
}

impl EdgeGate {
    /// Builds a gate over the shared cache and the environment default.
    #[must_use]
    pub const fn new(cache: Arc<MaintenanceCache>, env_default: Option<bool>) -> Self {
        Self { cache, env_default }
    }

    /// The memory cache this gate reads.
    #[must_use]
    pub const fn cache(&self) -> &Arc<MaintenanceCache> {
        &self.cache
    }

    /// Decides for `path`, given the raw maintenance cookie value if any.
    #[must_use]
    pub fn decide(&self, path: &str, cookie: Option<&str>) -> GateDecision {
        self.decide_at(path, cookie, Instant::now())
    }

    /// Same as [`Self::decide`] with an explicit clock reading.
    #[must_use]
    pub fn decide_at(&self, path: &str, cookie: Option<&str>, now: Instant) -> GateDecision {
        if is_path_allowed(path) {
            return GateDecision::Allow;
        }

        let (active, source) = self.resolve_at(cookie, now);
        trace!(path, active, ?source, "Maintenance state resolved");

        if active && path != MAINTENANCE_PATH {
            GateDecision::Redirect
        } else {
            GateDecision::Allow
        }
    }

    /// Resolves the current state without looking at any path.
    #[must_use]
    pub fn resolve_at(&self, cookie: Option<&str>, now: Instant) -> (bool, StateSource) {
        resolve(&ResolveInputs {
            cookie,
            cache: &self.cache,
            now,
            env_default: self.env_default,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const TTL: Duration = Duration::from_secs(30);

    fn gate(env_default: Option<bool>) -> EdgeGate {
        EdgeGate::new(Arc::new(MaintenanceCache::new(TTL)), env_default)
    }

    #[test]
    fn test_allow_listed_paths_always_pass() {
        let gate = gate(Some(true));
        gate.cache().refresh(true);

        let paths = [
            "/admin",
            "/admin/dashboard",
            "/admin/login",
            "/customer/login",
            "/customer/forgot-password",
            "/api/auth/session",
            "/api/admin/maintenance/activate",
            "/api/maintenance/status",
            "/maintenance",
            "/_next/static/chunks/main.js",
            "/favicon.ico",
            "/static/logo.svg",
        ];
        for path in paths {
            assert_eq!(
                gate.decide(path, Some("true")),
                GateDecision::Allow,
                "{path} should bypass maintenance"
            );
        }
    }

    #[test]
    fn test_static_assets_bypass_gate() {
        assert!(is_path_allowed("/images/vase.PNG"));
        assert!(is_path_allowed("/fonts/serif.woff2"));
        assert!(is_path_allowed("/site.webmanifest"));
        assert!(!is_path_allowed("/api/products.json"));
        assert!(!is_path_allowed("/collections/.hidden"));
        assert!(!is_path_allowed("/collections"));
    }

    #[test]
    fn test_customer_area_is_not_fully_allowed() {
        assert!(!is_path_allowed("/customer/dashboard"));
        assert!(!is_path_allowed("/cart"));
        assert!(!is_path_allowed("/"));
    }

    #[test]
    fn test_cookie_true_redirects() {
        let gate = gate(None);
        assert_eq!(gate.decide("/collections", Some("true")), GateDecision::Redirect);
        assert_eq!(gate.decide("/", Some("true")), GateDecision::Redirect);
    }

    #[test]
    fn test_cookie_false_overrides_env_default() {
        let gate = gate(Some(true));
        assert_eq!(gate.decide("/collections", Some("false")), GateDecision::Allow);
    }

    #[test]
    fn test_fresh_cache_blocks_without_cookie() {
        let gate = gate(Some(false));
        let now = Instant::now();
        gate.cache().set(true, now);

        assert_eq!(
            gate.decide_at("/products/42", None, now + Duration::from_secs(5)),
            GateDecision::Redirect
        );
    }

    #[test]
    fn test_stale_cache_falls_back_to_env_default() {
        let gate = gate(Some(false));
        let now = Instant::now();
        gate.cache().set(true, now);

        assert_eq!(
            gate.decide_at("/products/42", None, now + TTL + Duration::from_secs(1)),
            GateDecision::Allow
        );
    }

    #[test]
    fn test_env_default_applies_when_nothing_else_known() {
        assert_eq!(gate(Some(true)).decide("/artists", None), GateDecision::Redirect);
        assert_eq!(gate(Some(false)).decide("/artists", None), GateDecision::Allow);
        assert_eq!(gate(None).decide("/artists", None), GateDecision::Allow);
    }
}

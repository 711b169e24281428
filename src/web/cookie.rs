//! The `ceramika-maintenance` cookie.
//!
//! Set by the server on every toggle and every sync so that the next request of
//! the same browser carries the state, whatever the memory cache says.

use crate::config::app::MAX_COOKIE_MAX_AGE_DAYS;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// Name of the maintenance cookie.
pub const MAINTENANCE_COOKIE: &str = "ceramika-maintenance";

/// Attributes applied to every maintenance cookie the server issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieSettings {
    max_age: time::Duration,
    secure: bool,
}

impl CookieSettings {
    /// Cookie lasting `max_age_days`, optionally restricted to HTTPS.
    ///
    /// The lifetime is clamped to `1..=MAX_COOKIE_MAX_AGE_DAYS` days.
    #[must_use]
    pub const fn new(max_age_days: i64, secure: bool) -> Self {
        let days = if max_age_days < 1 {
            1
        } else if max_age_days > MAX_COOKIE_MAX_AGE_DAYS {
            MAX_COOKIE_MAX_AGE_DAYS
        } else {
            max_age_days
        };
        Self {
            max_age: time::Duration::days(days),
            secure,
        }
    }

    /// Builds the cookie for `active`.
    #[must_use]
    pub fn build(&self, active: bool) -> Cookie<'static> {
        Cookie::build((MAINTENANCE_COOKIE, active.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(self.max_age)
            .build()
    }

    /// Adds the cookie for `active` to `jar`, replacing any previous one.
    #[must_use]
    pub fn apply(&self, jar: CookieJar, active: bool) -> CookieJar {
        jar.add(self.build(active))
    }
}

/// Raw maintenance cookie value carried by the request, if any.
#[must_use]
pub fn read_maintenance_cookie(jar: &CookieJar) -> Option<&str> {
    jar.get(MAINTENANCE_COOKIE).map(Cookie::value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_attributes() {
        let cookie = CookieSettings::new(7, false).build(true);

        assert_eq!(cookie.name(), MAINTENANCE_COOKIE);
        assert_eq!(cookie.value(), "true");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(7)));
        assert_ne!(cookie.secure(), Some(true));
    }

    #[test]
    fn test_secure_flag() {
        let cookie = CookieSettings::new(7, true).build(false);
        assert_eq!(cookie.value(), "false");
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn test_apply_and_read_back() {
        let settings = CookieSettings::new(7, false);
        let jar = settings.apply(CookieJar::new(), true);
        assert_eq!(read_maintenance_cookie(&jar), Some("true"));

        let jar = settings.apply(jar, false);
        assert_eq!(read_maintenance_cookie(&jar), Some("false"));
    }

    #[test]
    fn test_out_of_range_lifetime_is_clamped() {
        let short = CookieSettings::new(-1, false).build(true);
        assert_eq!(short.max_age(), Some(time::Duration::days(1)));

        let long = CookieSettings::new(i64::MAX, false).build(true);
        assert_eq!(
            long.max_age(),
            Some(time::Duration::days(MAX_COOKIE_MAX_AGE_DAYS))
        );
    }

    #[test]
    fn test_missing_cookie() {
        assert_eq!(read_maintenance_cookie(&CookieJar::new()), None);
    }
}

//! Maintenance state resolution.
//!
//! The gate asks an ordered list of sources for the current state. Each source
//! answers `Some(bool)` when it knows, `None` to pass; the first answer wins and
//! later sources are never consulted.

use crate::cache::MaintenanceCache;
use crate::config::parse_flag;
use std::time::Instant;

/// Where a resolved maintenance state came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateSource {
    /// The `ceramika-maintenance` cookie sent with the request
    Cookie,
    /// The process memory cache, while fresh
    MemoryCache,
    /// The `MAINTENANCE_MODE` environment default
    Environment,
    /// Nothing answered; maintenance is assumed off
    Fallback,
}

/// Everything a resolver may look at. None of it performs I/O.
#[derive(Debug, Clone, Copy)]
pub struct ResolveInputs<'a> {
    /// Raw value of the maintenance cookie, if the request carried one
    pub cookie: Option<&'a str>,
    /// Shared memory cache
    pub cache: &'a MaintenanceCache,
    /// Instant used to judge cache freshness
    pub now: Instant,
    /// Configured environment default
    pub env_default: Option<bool>,
}

/// A single source of maintenance state.
pub type Resolver = fn(&ResolveInputs<'_>) -> Option<bool>;

/// Sources in precedence order: cookie, then fresh cache, then environment.
pub const RESOLUTION_ORDER: [(StateSource, Resolver); 3] = [
    (StateSource::Cookie, from_cookie),
    (StateSource::MemoryCache, from_memory_cache),
    (StateSource::Environment, from_environment),
];

fn from_cookie(inputs: &ResolveInputs<'_>) -> Option<bool> {
    inputs.cookie.and_then(parse_flag)
}

fn from_memory_cache(inputs: &ResolveInputs<'_>) -> Option<bool> {
    inputs.cache.get(inputs.now)
}

const fn from_environment(inputs: &ResolveInputs<'_>) -> Option<bool> {
    inputs.env_default
}

/// Resolves the state with [`RESOLUTION_ORDER`].
#[must_use]
pub fn resolve(inputs: &ResolveInputs<'_>) -> (bool, StateSource) {
    resolve_with(&RESOLUTION_ORDER, inputs)
}

/// Folds `resolvers` left to right; the first defined answer wins.
#[must_use]
pub fn resolve_with(
    resolvers: &[(StateSource, Resolver)],
    inputs: &ResolveInputs<'_>,
) -> (bool, StateSource) {
    resolvers
        .iter()
        .find_map(|(source, resolver)| resolver(inputs).map(|value| (value, *source)))
        .unwrap_or((false, StateSource::Fallback))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic)]
    use super::*;
    use std::time::Duration;

    fn inputs<'a>(
        cookie: Option<&'a str>,
        cache: &'a MaintenanceCache,
        env_default: Option<bool>,
    ) -> ResolveInputs<'a> {
        ResolveInputs {
            cookie,
            cache,
            now: Instant::now(),
            env_default,
        }
    }

    #[test]
    fn test_cookie_wins_over_cache_and_env() {
        let cache = MaintenanceCache::new(Duration::from_secs(30));
        cache.refresh(false);

        let resolved = resolve(&inputs(Some("true"), &cache, Some(false)));
        assert_eq!(resolved, (true, StateSource::Cookie));

        let resolved = resolve(&inputs(Some("false"), &cache, Some(true)));
        assert_eq!(resolved, (false, StateSource::Cookie));
    }

    #[test]
    fn test_fresh_cache_wins_over_env() {
        let cache = MaintenanceCache::new(Duration::from_secs(30));
        cache.refresh(true);

        let resolved = resolve(&inputs(None, &cache, Some(false)));
        assert_eq!(resolved, (true, StateSource::MemoryCache));
    }

    #[test]
    fn test_stale_cache_falls_through_to_env() {
        let cache = MaintenanceCache::new(Duration::from_secs(30));
        let stored = Instant::now();
        cache.set(true, stored);

        let resolved = resolve(&ResolveInputs {
            cookie: None,
            cache: &cache,
            now: stored + Duration::from_secs(31),
            env_default: Some(false),
        });
        assert_eq!(resolved, (false, StateSource::Environment));
    }

    #[test]
    fn test_garbage_cookie_is_ignored() {
        let cache = MaintenanceCache::new(Duration::from_secs(30));
        let resolved = resolve(&inputs(Some("yes please"), &cache, Some(true)));
        assert_eq!(resolved, (true, StateSource::Environment));
    }

    #[test]
    fn test_nothing_known_resolves_off() {
        let cache = MaintenanceCache::new(Duration::from_secs(30));
        let resolved = resolve(&inputs(None, &cache, None));
        assert_eq!(resolved, (false, StateSource::Fallback));
    }

    #[test]
    fn test_later_sources_are_not_consulted() {
        let cache = MaintenanceCache::new(Duration::from_secs(30));
        let resolvers: [(StateSource, Resolver); 2] = [
            (StateSource::Cookie, |_| Some(true)),
            (StateSource::MemoryCache, |_| {
                panic!("resolver after a definite answer must not run")
            }),
        ];

        let resolved = resolve_with(&resolvers, &inputs(None, &cache, None));
        assert_eq!(resolved, (true, StateSource::Cookie));
    }
}

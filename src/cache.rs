//! Process-local maintenance cache and its refresh routines.
//!
//! The request gate cannot touch the database, so it reads this cache instead.
//! An entry is only trusted inside the freshness window; afterwards the gate
//! falls through to its next source.

use crate::core::setting::load_maintenance_setting;
use crate::errors::Result;
use sea_orm::DatabaseConnection;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    value: bool,
    stored_at: Instant,
}

/// Last known maintenance state plus the instant it was stored.
///
/// Writes replace the pair as one unit and the last write wins.
#[derive(Debug)]
pub struct MaintenanceCache {
    ttl: Duration,
    entry: RwLock<Option<CacheEntry>>,
}

impl MaintenanceCache {
    /// Creates an empty cache with the given freshness window.
    #[must_use]
    pub const fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: RwLock::new(None),
        }
    }

    /// Freshness window of this cache.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Stores `value` as observed at `now`.
    pub fn set(&self, value: bool, now: Instant) {
        // A poisoned lock still holds a plain Copy pair, so keep using it.
        let mut guard = self.entry.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(CacheEntry {
            value,
            stored_at: now,
        });
    }

    /// Returns the cached value if it is younger than the freshness window at `now`.
    #[must_use]
    pub fn get(&self, now: Instant) -> Option<bool> {
        let entry = (*self.entry.read().unwrap_or_else(PoisonError::into_inner))?;
        let age = now.saturating_duration_since(entry.stored_at);
        if age < self.ttl {
            Some(entry.value)
        } else {
            debug!("Maintenance cache entry is stale ({:?} old)", age);
            None
        }
    }

    /// Stores `value` as observed right now.
    pub fn refresh(&self, value: bool) {
        self.set(value, Instant::now());
    }

    /// Returns the cached value if it is fresh right now.
    #[must_use]
    pub fn current(&self) -> Option<bool> {
        self.get(Instant::now())
    }
}

/// Re-reads the durable setting and stores it in the cache.
///
/// On a store error the cache is left untouched and the error is returned, so
/// the old entry simply ages out.
pub async fn refresh_maintenance_cache(
    db: &DatabaseConnection,
    cache: &MaintenanceCache,
) -> Result<bool> {
    debug!("Refreshing maintenance cache...");
    let setting = load_maintenance_setting(db).await?;
    cache.refresh(setting.active);
    debug!("Maintenance cache refreshed with {}", setting.active);
    Ok(setting.active)
}

/// Spawns a task that refreshes the cache from the store every `interval`.
pub fn spawn_cache_refresher(
    db: DatabaseConnection,
    cache: Arc<MaintenanceCache>,
    interval: Duration,
) -> JoinHandle<()> {
    info!("Starting maintenance cache refresher every {:?}", interval);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = refresh_maintenance_cache(&db, &cache).await {
                warn!("Background maintenance refresh failed: {}", e);
            }
        }
    })
}

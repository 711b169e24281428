//! Durable maintenance setting.
//!
//! The single source of truth for maintenance mode is one row of the
//! `site_config` table keyed by [`MAINTENANCE_MODE_KEY`]. Cookies and the memory
//! cache are derived from it and may lag behind.

use crate::{
    config::parse_flag,
    entities::{SiteConfig, site_config},
    errors::Result,
};
use chrono::{NaiveDateTime, Utc};
use sea_orm::{Set, prelude::*, sea_query::OnConflict};
use tracing::{debug, info, instrument, warn};

/// Key of the maintenance row in `site_config`.
pub const MAINTENANCE_MODE_KEY: &str = "maintenance_mode";

/// Snapshot of the persisted maintenance setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaintenanceSetting {
    /// Whether the site is in maintenance
    pub active: bool,
    /// Last write of the row, `None` when the row has never been written
    pub updated_at: Option<NaiveDateTime>,
}

impl MaintenanceSetting {
    /// State reported when no row exists: the feature starts disabled.
    pub const ABSENT: Self = Self {
        active: false,
        updated_at: None,
    };
}

/// Loads the maintenance row, propagating store errors.
///
/// A missing row is not an error and yields [`MaintenanceSetting::ABSENT`]. A
/// stored value other than `"true"`/`"false"` is treated as not active.
#[instrument(skip(db))]
pub async fn load_maintenance_setting<C>(db: &C) -> Result<MaintenanceSetting>
where
    C: ConnectionTrait,
{
    let row = SiteConfig::find_by_id(MAINTENANCE_MODE_KEY.to_string())
        .one(db)
        .await?;

    let setting = row.map_or(MaintenanceSetting::ABSENT, |row| {
        let active = parse_flag(&row.value).unwrap_or_else(|| {
            warn!("Unrecognized maintenance value {:?}, treating as off", row.value);
            false
        });
        MaintenanceSetting {
            active,
            updated_at: Some(row.updated_at),
        }
    });
    debug!("Maintenance setting loaded: {:?}", setting);
    Ok(setting)
}

/// Reads whether maintenance is active, failing open.
///
/// Any store error is logged and resolves to `false`, so a database outage
/// never locks every visitor out of the site.
pub async fn read_maintenance_mode<C>(db: &C) -> bool
where
    C: ConnectionTrait,
{
    match load_maintenance_setting(db).await {
        Ok(setting) => setting.active,
        Err(e) => {
            warn!("Maintenance store unavailable, assuming off: {}", e);
            false
        }
    }
}

/// Persists the maintenance flag, inserting or updating the single keyed row.
///
/// Writing the same value twice is harmless; only `updated_at` moves.
#[instrument(skip(db))]
pub async fn write_maintenance_mode<C>(db: &C, active: bool) -> Result<MaintenanceSetting>
where
    C: ConnectionTrait,
{
    let now = Utc::now().naive_utc();

    let row = site_config::ActiveModel {
        key: Set(MAINTENANCE_MODE_KEY.to_string()),
        value: Set(active.to_string()),
        updated_at: Set(now),
    };

    SiteConfig::insert(row)
        .on_conflict(
            OnConflict::column(site_config::Column::Key)
                .update_columns([site_config::Column::Value, site_config::Column::UpdatedAt])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    info!("Maintenance mode persisted: {}", active);
    Ok(MaintenanceSetting {
        active,
        updated_at: Some(now),
    })
}

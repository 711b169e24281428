//! Application configuration loading.
//!
//! Settings come from an optional TOML file and are then overridden by
//! environment variables (which `dotenvy` may have populated from `.env`).

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::{fmt::Display, fs, path::Path, path::PathBuf, str::FromStr, time::Duration};
use tracing::{debug, info, warn};

/// Environment variable holding the path of the optional TOML config file.
pub const CONFIG_PATH_VAR: &str = "CERAMIKA_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Longest accepted maintenance cookie lifetime, in days.
pub const MAX_COOKIE_MAX_AGE_DAYS: i64 = 3650;

/// Runtime configuration for the maintenance gate server.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to
    pub bind_address: String,
    /// `SeaORM` connection string for the site configuration store
    pub database_url: String,
    /// Last-resort maintenance state when neither cookie nor cache answers (`MAINTENANCE_MODE`)
    pub maintenance_default: Option<bool>,
    /// Freshness window of the in-process maintenance cache, in seconds
    pub cache_ttl_secs: u64,
    /// Interval of the background store re-read, in seconds; `0` disables it
    pub sync_interval_secs: u64,
    /// Lifetime of the maintenance cookie, in days
    pub cookie_max_age_days: i64,
    /// Whether the maintenance cookie carries the `Secure` attribute
    pub cookie_secure: bool,
    /// Bearer token accepted on the admin API; the admin API is locked when unset
    pub admin_token: Option<String>,
    /// Directory holding the built storefront, served behind the gate
    pub storefront_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            database_url: "sqlite://ceramika.sqlite?mode=rwc".to_string(),
            maintenance_default: None,
            cache_ttl_secs: 30,
            sync_interval_secs: 15,
            cookie_max_age_days: 7,
            cookie_secure: false,
            admin_token: None,
            storefront_dir: None,
        }
    }
}

impl AppConfig {
    /// Freshness window of the memory cache.
    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Background refresh interval, or `None` when the refresher is disabled.
    #[must_use]
    pub const fn sync_interval(&self) -> Option<Duration> {
        if self.sync_interval_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.sync_interval_secs))
        }
    }

    /// Applies environment overrides on top of the current values.
    ///
    /// `lookup` abstracts `std::env::var` so tests can feed a fixed map.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("BIND_ADDRESS") {
            self.bind_address = v;
        }
        if let Some(v) = get("DATABASE_URL") {
            self.database_url = v;
        }
        if let Some(v) = get("MAINTENANCE_MODE") {
            self.maintenance_default = Some(parse_flag(&v).ok_or_else(|| Error::Config {
                message: format!("MAINTENANCE_MODE must be \"true\" or \"false\", got {v:?}"),
            })?);
        }
        if let Some(v) = get("MAINTENANCE_CACHE_TTL_SECS") {
            self.cache_ttl_secs = parse_var("MAINTENANCE_CACHE_TTL_SECS", &v)?;
        }
        if let Some(v) = get("MAINTENANCE_SYNC_INTERVAL_SECS") {
            self.sync_interval_secs = parse_var("MAINTENANCE_SYNC_INTERVAL_SECS", &v)?;
        }
        if let Some(v) = get("MAINTENANCE_COOKIE_MAX_AGE_DAYS") {
            self.cookie_max_age_days = parse_var("MAINTENANCE_COOKIE_MAX_AGE_DAYS", &v)?;
        }
        if let Some(v) = get("MAINTENANCE_COOKIE_SECURE") {
            self.cookie_secure = parse_flag(&v).ok_or_else(|| Error::Config {
                message: format!("MAINTENANCE_COOKIE_SECURE must be \"true\" or \"false\", got {v:?}"),
            })?;
        }
        if let Some(v) = get("ADMIN_API_TOKEN") {
            self.admin_token = Some(v);
        }
        if let Some(v) = get("STOREFRONT_DIR") {
            self.storefront_dir = Some(PathBuf::from(v));
        }

        self.validate()
    }

    /// Rejects values that would make the issued cookie useless or unbuildable.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_COOKIE_MAX_AGE_DAYS).contains(&self.cookie_max_age_days) {
            return Err(Error::Config {
                message: format!(
                    "cookie_max_age_days must be between 1 and {MAX_COOKIE_MAX_AGE_DAYS}, got {}",
                    self.cookie_max_age_days
                ),
            });
        }
        Ok(())
    }
}

/// Parses the `"true"`/`"false"` strings used for flags, ignoring case and
/// surrounding whitespace.
#[must_use]
pub fn parse_flag(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim().parse().map_err(|e| Error::Config {
        message: format!("Invalid {key} value {raw:?}: {e}"),
    })
}

/// Reads and parses a TOML configuration file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;
    let config: AppConfig = toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse TOML from config file {path_ref:?}: {e}"),
    })?;
    config.validate()?;
    Ok(config)
}

/// Builds the effective configuration: TOML file (if present), then environment.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let mut config = if Path::new(&path).exists() {
        info!("Loading configuration file {}", path);
        load_config(&path)?
    } else {
        debug!("No configuration file at {}, using defaults", path);
        AppConfig::default()
    };

    config.apply_env_overrides(|key| std::env::var(key).ok())?;

    if config.admin_token.is_none() {
        warn!("ADMIN_API_TOKEN is not set; admin maintenance endpoints will reject every caller");
    }
    info!(
        bind_address = %config.bind_address,
        cache_ttl_secs = config.cache_ttl_secs,
        sync_interval_secs = config.sync_interval_secs,
        maintenance_default = ?config.maintenance_default,
        "Configuration loaded"
    );

    Ok(config)
}

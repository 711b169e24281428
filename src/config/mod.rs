/// Application settings from the TOML file and environment
pub mod app;

/// Database connection and table creation
pub mod database;

pub use app::{AppConfig, load_app_configuration, parse_flag};

//! Entity module - Contains the SeaORM entity definitions for the database.
//! Only the site configuration table is owned by this crate; catalog and order
//! tables belong to the storefront.

pub mod site_config;

pub use site_config::{Entity as SiteConfig, Model as SiteConfigModel};

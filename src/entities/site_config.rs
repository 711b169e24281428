//! Site configuration entity - Stores key-value pairs for site-wide settings.
//! The maintenance switch lives here under the `maintenance_mode` key.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Site configuration database model - one row per setting key
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "site_config")]
pub struct Model {
    /// Setting key (e.g., `"maintenance_mode"`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    /// Setting value stored as string
    pub value: String,
    /// When this setting was last written (UTC)
    pub updated_at: DateTime,
}

/// `SiteConfig` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

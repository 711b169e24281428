//! HTTP handlers.

/// Admin-only maintenance switch
pub mod admin;
/// Public status, init and sync endpoints
pub mod maintenance;
/// Maintenance notice page
pub mod page;

pub use admin::{activate, deactivate, get_state, set_state};
pub use maintenance::{init, status, sync};
pub use page::maintenance_page;

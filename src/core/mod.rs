//! Core maintenance logic, independent of the HTTP framework.

/// Request gate: allow-list and allow/redirect decision
pub mod gate;
/// Ordered maintenance state sources
pub mod resolve;
/// Durable maintenance setting in the `site_config` table
pub mod setting;

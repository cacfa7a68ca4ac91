//! `gfc-api` — HTTP surface for the product catalog.
//!
//! Read endpoints for browsing/filtering/search plus the two public
//! submission endpoints (contact, newsletter). Products are read-only
//! here; all catalog writes go through the administrative store API.

pub mod app;
pub mod telemetry;

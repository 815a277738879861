//! KickTV HTTP surface
//!
//! Exposes the manifest relay and channel resolution endpoints over axum.

pub mod http;

pub use http::{create_router, AppState};

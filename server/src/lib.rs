//! HTTP API for Ttobak.
//!
//! Every request is resolved to an [`ttobak_types::Identity`] first
//! ([`auth`]), then routed through the entitlement gate before any text is
//! sent to the generator.

pub mod auth;
pub mod config;
mod error;
mod routes;
mod state;

pub use auth::{SupabaseAuth, SupabaseConfig, DEVICE_ID_HEADER};
pub use config::Args;
pub use error::ApiError;
pub use routes::build_router;
pub use state::{AppState, Session};

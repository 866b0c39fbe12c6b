//! HTTP transport for the alerting ruler.
//!
//! Exposes the namespace/group operations of [`ruler_rules::RulerService`]
//! under `/api/ruler/rules`, plus health and OpenAPI docs.

pub mod api;
pub mod auth;
pub mod error;
pub mod router;
pub mod rules;
pub mod state;

pub use router::build_router;
pub use state::AppState;

//! Ruler API: rule group documents per namespace.
//!
//! Every route is scoped to the organization of the signed-in user taken
//! from the request headers (see [`crate::auth`]).

pub mod handlers;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub use handlers::*;

/// Build the ruler sub-router.
pub fn rules_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/ruler/rules", get(get_org_rules))
        .route(
            "/api/ruler/rules/{namespace}",
            get(get_namespace_rules)
                .post(upsert_rule_group)
                .delete(delete_namespace_rules),
        )
        .route(
            "/api/ruler/rules/{namespace}/{groupname}",
            get(get_rule_group).delete(delete_rule_group),
        )
}

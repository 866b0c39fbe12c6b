//! Axum handler functions for the ruler endpoints.
//!
//! Successful calls answer `202 Accepted`, reads included.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use tracing::debug;

use ruler_rules::schema::{Ack, NamespaceConfig, RuleGroupConfig};

use crate::auth::extract_user;
use crate::error::{ApiError, ErrorResponse};
use crate::state::AppState;

type Accepted<T> = (StatusCode, Json<T>);

fn accepted<T>(body: T) -> Accepted<T> {
    (StatusCode::ACCEPTED, Json(body))
}

// ── Organization ────────────────────────────────────────────────────

/// Every rule group of the caller's organization, keyed by namespace title.
#[utoipa::path(
    get,
    path = "/api/ruler/rules",
    tag = "Ruler",
    responses(
        (status = 202, description = "Namespace title to rule groups", body = Object),
        (status = 401, description = "Missing or invalid org header", body = ErrorResponse),
        (status = 500, description = "Namespace lookup, store or interval failure", body = ErrorResponse)
    )
)]
pub async fn get_org_rules(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Accepted<NamespaceConfig>, ApiError> {
    let user = extract_user(&headers)?;
    debug!(org_id = user.org_id, "get org rules");
    Ok(accepted(state.ruler.get_org_rules(&user)?))
}

// ── Namespace ───────────────────────────────────────────────────────

/// All rule groups of one namespace.
#[utoipa::path(
    get,
    path = "/api/ruler/rules/{namespace}",
    tag = "Ruler",
    params(
        ("namespace" = String, Path, description = "Namespace slug")
    ),
    responses(
        (status = 202, description = "Namespace to rule groups; empty object when the namespace has no rules", body = Object),
        (status = 401, description = "Missing or invalid org header", body = ErrorResponse),
        (status = 500, description = "Unknown namespace, store or interval failure", body = ErrorResponse)
    )
)]
pub async fn get_namespace_rules(
    State(state): State<Arc<AppState>>,
    Path(namespace): Path<String>,
    headers: HeaderMap,
) -> Result<Accepted<NamespaceConfig>, ApiError> {
    let user = extract_user(&headers)?;
    Ok(accepted(state.ruler.get_namespace_rules(&namespace, &user)?))
}

/// Create or replace the rule group named in the body.
#[utoipa::path(
    post,
    path = "/api/ruler/rules/{namespace}",
    tag = "Ruler",
    params(
        ("namespace" = String, Path, description = "Namespace slug")
    ),
    request_body(content = Object, content_type = "application/json", description = "Rule group document: name, interval and grafana_alert rules"),
    responses(
        (status = 202, description = "Group stored", body = Object),
        (status = 400, description = "Malformed or rejected group document, e.g. a sub-second interval", body = ErrorResponse),
        (status = 401, description = "Missing or invalid org header", body = ErrorResponse),
        (status = 403, description = "Caller may not modify this namespace", body = ErrorResponse),
        (status = 500, description = "Unknown namespace or store failure", body = ErrorResponse)
    )
)]
pub async fn upsert_rule_group(
    State(state): State<Arc<AppState>>,
    Path(namespace): Path<String>,
    headers: HeaderMap,
    body: Result<Json<RuleGroupConfig>, JsonRejection>,
) -> Result<Accepted<Ack>, ApiError> {
    let user = extract_user(&headers)?;
    let Json(config) = body.map_err(|rejection| {
        ApiError::new(StatusCode::BAD_REQUEST, "invalid rule group document")
            .with_cause(Some(rejection.body_text()))
    })?;
    debug!(namespace = %namespace, group = %config.name, rules = config.rules.len(), "upsert rule group");
    Ok(accepted(state.ruler.upsert_rule_group(&namespace, config, &user)?))
}

/// Delete every rule in a namespace.
#[utoipa::path(
    delete,
    path = "/api/ruler/rules/{namespace}",
    tag = "Ruler",
    params(
        ("namespace" = String, Path, description = "Namespace slug")
    ),
    responses(
        (status = 202, description = "Namespace rules deleted", body = Object),
        (status = 401, description = "Missing or invalid org header", body = ErrorResponse),
        (status = 500, description = "Unknown namespace or store failure", body = ErrorResponse)
    )
)]
pub async fn delete_namespace_rules(
    State(state): State<Arc<AppState>>,
    Path(namespace): Path<String>,
    headers: HeaderMap,
) -> Result<Accepted<Ack>, ApiError> {
    let user = extract_user(&headers)?;
    Ok(accepted(state.ruler.delete_namespace_rules(&namespace, &user)?))
}

// ── Group ───────────────────────────────────────────────────────────

/// One rule group.
#[utoipa::path(
    get,
    path = "/api/ruler/rules/{namespace}/{groupname}",
    tag = "Ruler",
    params(
        ("namespace" = String, Path, description = "Namespace slug"),
        ("groupname" = String, Path, description = "Rule group name")
    ),
    responses(
        (status = 202, description = "Rule group; no rules when the group is unknown", body = Object),
        (status = 401, description = "Missing or invalid org header", body = ErrorResponse),
        (status = 500, description = "Unknown namespace, store or interval failure", body = ErrorResponse)
    )
)]
pub async fn get_rule_group(
    State(state): State<Arc<AppState>>,
    Path((namespace, group)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Accepted<RuleGroupConfig>, ApiError> {
    let user = extract_user(&headers)?;
    Ok(accepted(state.ruler.get_rule_group(&namespace, &group, &user)?))
}

/// Delete every rule of one group.
#[utoipa::path(
    delete,
    path = "/api/ruler/rules/{namespace}/{groupname}",
    tag = "Ruler",
    params(
        ("namespace" = String, Path, description = "Namespace slug"),
        ("groupname" = String, Path, description = "Rule group name")
    ),
    responses(
        (status = 202, description = "Rule group deleted", body = Object),
        (status = 401, description = "Missing or invalid org header", body = ErrorResponse),
        (status = 500, description = "Unknown namespace or store failure", body = ErrorResponse)
    )
)]
pub async fn delete_rule_group(
    State(state): State<Arc<AppState>>,
    Path((namespace, group)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Accepted<Ack>, ApiError> {
    let user = extract_user(&headers)?;
    Ok(accepted(state.ruler.delete_rule_group(&namespace, &group, &user)?))
}

//! OpenAPI documentation aggregator.
//!
//! Collects the `#[utoipa::path]`-annotated handlers into a single OpenAPI
//! document, served via Scalar UI at `/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ruler API",
        version = "0.1.0",
        description = "Alert rule groups organised by namespace: read, replace and delete.",
    ),
    tags(
        (name = "Health", description = "Server liveness"),
        (name = "Ruler", description = "Rule group documents per namespace and organization"),
    ),
    paths(
        crate::api::health::health,
        crate::rules::handlers::get_org_rules,
        crate::rules::handlers::get_namespace_rules,
        crate::rules::handlers::upsert_rule_group,
        crate::rules::handlers::delete_namespace_rules,
        crate::rules::handlers::get_rule_group,
        crate::rules::handlers::delete_rule_group,
    ),
    components(schemas(
        crate::api::health::HealthResponse,
        crate::error::ErrorResponse,
    ))
)]
pub struct ApiDoc;

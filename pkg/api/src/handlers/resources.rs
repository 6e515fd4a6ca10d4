use std::sync::Arc;

use axum::{
    Json,
    extract::{Path as AxumPath, Query, State},
    response::{IntoResponse, Response},
};
use pkg_aggregator::AggregationRequest;
use pkg_rbac::RoleAssignment;
use pkg_state::ResourceStore;
use pkg_types::{ApiError, Kind, Labels};
use serde::Deserialize;

use crate::AppState;
use crate::auth::Caller;
use crate::error::{AppError, with_deadline};

/// Query parameters for listing resources.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Only objects whose link label carries this value.
    #[serde(default)]
    pub linked_name: Option<String>,
    /// `k=v,k=v` selector used when an object declares none.
    #[serde(default)]
    pub label_selector: Option<String>,
}

fn parse_kind(raw: &str) -> Result<Kind, ApiError> {
    match Kind::from_plural(raw) {
        Some(Kind::Namespace) | None => {
            Err(ApiError::validation(format!("unsupported resource kind '{}'", raw)))
        }
        Some(kind) => Ok(kind),
    }
}

fn parse_selector(raw: &str) -> Result<Labels, ApiError> {
    raw.split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(|term| {
            term.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                .filter(|(k, _)| !k.is_empty())
                .ok_or_else(|| {
                    ApiError::validation(format!("invalid label selector term '{}'", term))
                })
        })
        .collect()
}

fn build_request(
    namespace: String,
    role: Arc<RoleAssignment>,
    query: ListQuery,
) -> Result<AggregationRequest<RoleAssignment>, ApiError> {
    let mut req = AggregationRequest::new(namespace, role);
    if let Some(linked) = query.linked_name.filter(|n| !n.is_empty()) {
        req = req.linked(linked);
    }
    if let Some(raw) = query.label_selector {
        let selector = parse_selector(&raw)?;
        if !selector.is_empty() {
            req = req.with_selector(selector);
        }
    }
    Ok(req)
}

async fn list_kind<S: ResourceStore>(
    state: &AppState<S>,
    kind: Kind,
    req: AggregationRequest<RoleAssignment>,
) -> Result<Response, AppError> {
    let agg = &state.aggregator;
    with_deadline(state.request_timeout, async {
        let response = match kind {
            Kind::Service => Json(agg.services(&req).await?).into_response(),
            Kind::Deployment => Json(agg.deployments(&req).await?).into_response(),
            Kind::DaemonSet => Json(agg.daemon_sets(&req).await?).into_response(),
            Kind::Job => Json(agg.jobs(&req).await?).into_response(),
            Kind::ReplicaSet => Json(agg.replica_sets(&req).await?).into_response(),
            Kind::Pod => Json(agg.pods(&req).await?).into_response(),
            Kind::ConfigMap => Json(agg.config_maps(&req).await?).into_response(),
            Kind::Namespace => {
                return Err(ApiError::validation("namespaces are listed at /api/v1/namespaces"));
            }
        };
        Ok(response)
    })
    .await
}

// ============================================================
// Lists
// ============================================================

/// GET /api/v1/{kind} — one kind across every namespace.
pub async fn list_all<S: ResourceStore>(
    State(state): State<AppState<S>>,
    Caller(role): Caller,
    AxumPath(kind): AxumPath<String>,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    let kind = parse_kind(&kind)?;
    let req = build_request(String::new(), role, query)?;
    list_kind(&state, kind, req).await
}

/// GET /api/v1/namespaces/{ns}/{kind}
pub async fn list_resources<S: ResourceStore>(
    State(state): State<AppState<S>>,
    Caller(role): Caller,
    AxumPath((ns, kind)): AxumPath<(String, String)>,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    let kind = parse_kind(&kind)?;
    let req = build_request(ns, role, query)?;
    list_kind(&state, kind, req).await
}

// ============================================================
// Details
// ============================================================

/// GET /api/v1/namespaces/{ns}/{kind}/{name}
pub async fn get_resource<S: ResourceStore>(
    State(state): State<AppState<S>>,
    Caller(role): Caller,
    AxumPath((ns, kind, name)): AxumPath<(String, String, String)>,
) -> Result<Response, AppError> {
    let kind = parse_kind(&kind)?;
    let req = AggregationRequest::new(ns, role);
    let agg = &state.aggregator;
    with_deadline(state.request_timeout, async {
        let response = match kind {
            Kind::Service => Json(agg.service(&req, &name).await?).into_response(),
            Kind::Deployment => Json(agg.deployment(&req, &name).await?).into_response(),
            Kind::DaemonSet => Json(agg.daemon_set(&req, &name).await?).into_response(),
            Kind::Job => Json(agg.job(&req, &name).await?).into_response(),
            Kind::ReplicaSet => Json(agg.replica_set(&req, &name).await?).into_response(),
            Kind::Pod => Json(agg.pod(&req, &name).await?).into_response(),
            Kind::ConfigMap => Json(agg.config_map(&req, &name).await?).into_response(),
            Kind::Namespace => return Err(ApiError::validation("namespaces have no detail view")),
        };
        Ok(response)
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kind_plurals() {
        assert_eq!(parse_kind("daemonsets").unwrap(), Kind::DaemonSet);
        assert!(matches!(parse_kind("namespaces"), Err(ApiError::Validation(_))));
        assert!(matches!(parse_kind("secrets"), Err(ApiError::Validation(_))));
    }

    #[test]
    fn parses_selector_terms() {
        let selector = parse_selector("app=web, tier = front,").unwrap();
        assert_eq!(selector.get("app").map(String::as_str), Some("web"));
        assert_eq!(selector.get("tier").map(String::as_str), Some("front"));
        assert!(parse_selector("").unwrap().is_empty());
        assert!(matches!(parse_selector("app"), Err(ApiError::Validation(_))));
        assert!(matches!(parse_selector("=web"), Err(ApiError::Validation(_))));
    }
}

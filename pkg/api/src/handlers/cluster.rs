use axum::{
    Json,
    extract::{Path as AxumPath, Query, State},
};
use pkg_aggregator::{AggregationRequest, Overview, OverviewLink};
use pkg_state::ResourceStore;
use pkg_types::ApiError;
use pkg_types::namespace::Namespace;
use serde::Deserialize;

use crate::AppState;
use crate::auth::Caller;
use crate::error::{AppError, with_deadline};

#[derive(Debug, Default, Deserialize)]
pub struct OverviewQuery {
    #[serde(default)]
    pub namespace: Option<String>,
}

/// GET /healthz
pub async fn healthz() -> &'static str {
    "ok"
}

/// GET /api/v1/namespaces — namespaces the caller is not excluded from.
pub async fn list_namespaces<S: ResourceStore>(
    State(state): State<AppState<S>>,
    Caller(role): Caller,
) -> Result<Json<Vec<Namespace>>, AppError> {
    let namespaces = with_deadline(
        state.request_timeout,
        state.aggregator.namespaces(role.as_ref()),
    )
    .await?;
    Ok(Json(namespaces))
}

/// GET /api/v1/overviews — one link per application across the cluster.
pub async fn list_overviews<S: ResourceStore>(
    State(state): State<AppState<S>>,
    Caller(role): Caller,
) -> Result<Json<Vec<OverviewLink>>, AppError> {
    let links = with_deadline(state.request_timeout, state.aggregator.overviews(role)).await?;
    Ok(Json(links))
}

/// GET /api/v1/overviews/{linked_name}?namespace= — every kind of one application.
pub async fn get_overview<S: ResourceStore>(
    State(state): State<AppState<S>>,
    Caller(role): Caller,
    AxumPath(linked_name): AxumPath<String>,
    Query(query): Query<OverviewQuery>,
) -> Result<Json<Overview>, AppError> {
    if linked_name.trim().is_empty() {
        return Err(ApiError::validation("linked name must be provided").into());
    }
    let req = AggregationRequest::new(query.namespace.unwrap_or_default(), role).linked(linked_name);
    let overview = with_deadline(state.request_timeout, state.aggregator.overview(&req)).await?;
    Ok(Json(overview))
}

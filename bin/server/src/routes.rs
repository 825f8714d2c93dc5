//! HTTP routes for the workflow API.

use crate::error::{ApiError, HttpError};
use crate::state::AppState;
use crate::types::{RestWorkflowDefinition, RestWorkflowSessionTime};
use almanac_core::{SiteId, WorkflowDefinitionId};
use axum::{
    Json, Router,
    extract::{FromRef, FromRequestParts, Path, Query, State},
    http::request::Parts,
    routing::get,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::instrument;

/// Header naming the caller's site.
pub const SITE_HEADER: &str = "x-site-id";

/// Builds the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/workflow", get(get_workflow))
        .route("/api/workflows/{id}", get(get_workflow_by_id))
        .route(
            "/api/workflows/{id}/truncated_session_time",
            get(get_truncated_session_time),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Extractor for the caller's site.
///
/// Read from the `X-Site-Id` header, falling back to the configured default.
#[derive(Debug, Clone, Copy)]
pub struct SiteScope(pub SiteId);

impl<S> FromRequestParts<S> for SiteScope
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(SITE_HEADER) else {
            let app_state = Arc::<AppState>::from_ref(state);
            return Ok(SiteScope(app_state.default_site_id));
        };

        let site_id = value
            .to_str()
            .ok()
            .and_then(|v| v.parse::<SiteId>().ok())
            .ok_or_else(|| ApiError::invalid_argument("X-Site-Id must be an integer"))?;
        Ok(SiteScope(site_id))
    }
}

/// Query parameters for looking up a workflow by name.
#[derive(Debug, Deserialize)]
pub struct WorkflowQuery {
    repository: Option<String>,
    revision: Option<String>,
    name: Option<String>,
}

/// Query parameters for computing a session time.
#[derive(Debug, Deserialize)]
pub struct SessionTimeQuery {
    session_time: Option<String>,
    mode: Option<String>,
}

fn parse_workflow_id(id: &str) -> Result<WorkflowDefinitionId, HttpError> {
    id.parse()
        .map_err(|e: almanac_core::ParseIdError| ApiError::invalid_argument(e.to_string()).into())
}

/// `GET /api/workflow?repository=&revision=&name=`
#[instrument(skip(state))]
pub async fn get_workflow(
    State(state): State<Arc<AppState>>,
    SiteScope(site_id): SiteScope,
    Query(query): Query<WorkflowQuery>,
) -> Result<Json<RestWorkflowDefinition>, HttpError> {
    let workflow = state
        .service
        .get_workflow_by_name(
            site_id,
            query.repository.as_deref(),
            query.revision.as_deref(),
            query.name.as_deref(),
        )
        .await?;
    Ok(Json(workflow))
}

/// `GET /api/workflows/{id}`
#[instrument(skip(state))]
pub async fn get_workflow_by_id(
    State(state): State<Arc<AppState>>,
    SiteScope(site_id): SiteScope,
    Path(id): Path<String>,
) -> Result<Json<RestWorkflowDefinition>, HttpError> {
    let workflow_id = parse_workflow_id(&id)?;
    let workflow = state.service.get_workflow_by_id(site_id, workflow_id).await?;
    Ok(Json(workflow))
}

/// `GET /api/workflows/{id}/truncated_session_time?session_time=&mode=`
#[instrument(skip(state))]
pub async fn get_truncated_session_time(
    State(state): State<Arc<AppState>>,
    SiteScope(site_id): SiteScope,
    Path(id): Path<String>,
    Query(query): Query<SessionTimeQuery>,
) -> Result<Json<RestWorkflowSessionTime>, HttpError> {
    let workflow_id = parse_workflow_id(&id)?;
    let session_time = state
        .service
        .get_truncated_session_time(
            site_id,
            workflow_id,
            query.session_time.as_deref(),
            query.mode.as_deref(),
        )
        .await?;
    Ok(Json(session_time))
}

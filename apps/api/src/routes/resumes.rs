use axum::{
    extract::{Path, Query, State},
    response::{Html, Response},
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::form::Notification;
use crate::models::stored::StoredResume;
use crate::render::html::to_html;
use crate::render::{RenderedView, Viewport};
use crate::routes::forms::PreviewQuery;
use crate::routes::{deliver_export, require_user};
use crate::state::AppState;

#[derive(Serialize)]
pub struct ResumeListResponse {
    pub resumes: Vec<StoredResume>,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub notification: Notification,
    pub resumes: Vec<StoredResume>,
}

/// GET /api/v1/resumes
pub async fn handle_list(
    State(state): State<AppState>,
) -> Result<Json<ResumeListResponse>, AppError> {
    let user = require_user(&state).await?;
    let resumes = state
        .store
        .list(user.id)
        .await
        .map_err(|e| AppError::persistence(e, Notification::history_failed()))?;
    Ok(Json(ResumeListResponse { resumes }))
}

/// GET /api/v1/resumes/:id/preview?width=<px>
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PreviewQuery>,
) -> Result<Html<String>, AppError> {
    let view = load_view(&state, id, query.viewport()).await?;
    Ok(Html(to_html(&view.document)))
}

/// GET /api/v1/resumes/:id/export
pub async fn handle_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let view = load_view(&state, id, Viewport::default()).await?;
    deliver_export(&state, Some(view)).await
}

/// DELETE /api/v1/resumes/:id
///
/// Deletes after an ownership check, then returns the re-fetched history.
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, AppError> {
    let user = require_user(&state).await?;

    state
        .store
        .get(id, user.id)
        .await
        .map_err(|e| AppError::persistence(e, Notification::delete_failed()))?;
    state
        .store
        .delete(id)
        .await
        .map_err(|e| AppError::persistence(e, Notification::delete_failed()))?;
    info!(resume_id = %id, user_id = %user.id, "Resume removed from history");

    let resumes = state
        .store
        .list(user.id)
        .await
        .map_err(|e| AppError::persistence(e, Notification::history_failed()))?;

    Ok(Json(DeleteResponse {
        notification: Notification::resume_deleted(),
        resumes,
    }))
}

/// Re-hydrates a stored record owned by the current user and renders it.
async fn load_view(state: &AppState, id: Uuid, viewport: Viewport) -> Result<RenderedView, AppError> {
    let user = require_user(state).await?;
    let stored = state
        .store
        .get(id, user.id)
        .await
        .map_err(|e| AppError::persistence(e, Notification::history_failed()))?;
    Ok(RenderedView::mount(stored.record, viewport))
}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::form::drafts::DraftSlot;
use crate::form::{FormCommand, FormState, Notification};
use crate::models::resume::ResumeRecord;
use crate::render::html::to_html;
use crate::render::Viewport;
use crate::routes::{deliver_export, require_user};
use crate::state::AppState;

#[derive(Serialize)]
pub struct FormResponse {
    pub id: Uuid,
    pub state: FormState,
    pub record: ResumeRecord,
    pub preview_mounted: bool,
}

impl FormResponse {
    fn from_slot(id: Uuid, slot: &DraftSlot) -> Self {
        Self {
            id,
            state: slot.form.state(),
            record: slot.form.record().clone(),
            preview_mounted: slot.preview().is_some(),
        }
    }
}

#[derive(Serialize)]
pub struct SubmitResponse {
    pub id: Uuid,
    pub record: ResumeRecord,
    pub notification: Notification,
}

#[derive(Deserialize)]
pub struct PreviewQuery {
    pub width: Option<u32>,
}

impl PreviewQuery {
    pub fn viewport(&self) -> Viewport {
        self.width.map(Viewport::new).unwrap_or_default()
    }
}

/// POST /api/v1/forms
pub async fn handle_open(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<FormResponse>), AppError> {
    let id = state.drafts.open();
    let response = state.drafts.with(id, |slot| FormResponse::from_slot(id, slot))?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/forms/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FormResponse>, AppError> {
    let response = state.drafts.with(id, |slot| FormResponse::from_slot(id, slot))?;
    Ok(Json(response))
}

/// DELETE /api/v1/forms/:id
pub async fn handle_discard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.drafts.discard(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/forms/:id/commands
pub async fn handle_command(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(command): Json<FormCommand>,
) -> Result<Json<FormResponse>, AppError> {
    let response = state.drafts.with(id, |slot| {
        slot.form.apply(command)?;
        slot.refresh_preview();
        Ok::<_, AppError>(FormResponse::from_slot(id, slot))
    })??;
    Ok(Json(response))
}

/// POST /api/v1/forms/:id/profile-image
pub async fn handle_profile_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<FormResponse>, AppError> {
    let response = state.drafts.with(id, |slot| {
        slot.form.set_profile_image(&body)?;
        slot.refresh_preview();
        Ok::<_, AppError>(FormResponse::from_slot(id, slot))
    })??;
    Ok(Json(response))
}

/// POST /api/v1/forms/:id/submit
///
/// Validates and freezes the record, persists it for the signed-in user, then mounts the
/// preview. Missing fields are reported before the session is consulted. The draft lock is
/// released while the session and store calls are in flight.
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let snapshot = state.drafts.with(id, |slot| slot.form.begin_submit())??;

    let user = match require_user(&state).await {
        Ok(user) => user,
        Err(e) => {
            state
                .drafts
                .with(id, |slot| slot.form.finish_submit(&Err::<(), _>(&e)))?;
            return Err(e);
        }
    };

    let result = state.store.create(&snapshot, user.id).await;

    let notification = state.drafts.with(id, |slot| {
        let notification = slot.form.finish_submit(&result);
        if result.is_ok() {
            let viewport = slot
                .preview()
                .map(|view| view.document.viewport)
                .unwrap_or_default();
            slot.mount_preview(viewport);
        }
        notification
    })?;

    match result {
        Ok(resume_id) => {
            info!(draft_id = %id, resume_id = %resume_id, "Draft submitted");
            Ok((
                StatusCode::CREATED,
                Json(SubmitResponse {
                    id: resume_id,
                    record: snapshot,
                    notification,
                }),
            ))
        }
        Err(e) => Err(AppError::persistence(e, notification)),
    }
}

/// GET /api/v1/forms/:id/preview?width=<px>
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PreviewQuery>,
) -> Result<Html<String>, AppError> {
    let viewport = query.viewport();
    let html = state
        .drafts
        .with(id, |slot| to_html(&slot.mount_preview(viewport).document))?;
    Ok(Html(html))
}

/// GET /api/v1/forms/:id/export
pub async fn handle_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let view = state.drafts.with(id, |slot| slot.preview().cloned())?;
    deliver_export(&state, view).await
}

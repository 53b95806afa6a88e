use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::models::user::Identity;
use crate::state::AppState;

#[derive(Serialize)]
pub struct SessionResponse {
    pub user: Option<Identity>,
}

/// GET /api/v1/session
pub async fn handle_current_user(State(state): State<AppState>) -> Json<SessionResponse> {
    Json(SessionResponse {
        user: state.session.current_user().await,
    })
}

/// POST /api/v1/session/sign-out
pub async fn handle_sign_out(State(state): State<AppState>) -> StatusCode {
    state.session.sign_out().await;
    StatusCode::NO_CONTENT
}

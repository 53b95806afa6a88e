pub mod forms;
pub mod health;
pub mod resumes;
pub mod session;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::export::{export_in_background, ExportOptions, ExportedDocument};
use crate::form::image::MAX_PROFILE_IMAGE_BYTES;
use crate::models::user::Identity;
use crate::render::RenderedView;
use crate::state::AppState;

/// Upload bodies up to this size reach the image size check, so oversized images get
/// the "Image too large" notification rather than a bare 413.
const PROFILE_IMAGE_BODY_LIMIT: usize = MAX_PROFILE_IMAGE_BYTES * 2;

async fn not_implemented() -> Result<(), AppError> {
    Err(AppError::NotImplemented)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::landing_handler))
        .route("/health", get(health::health_handler))
        // Creation view
        .route("/api/v1/forms", post(forms::handle_open))
        .route(
            "/api/v1/forms/:id",
            get(forms::handle_get).delete(forms::handle_discard),
        )
        .route("/api/v1/forms/:id/commands", post(forms::handle_command))
        .route(
            "/api/v1/forms/:id/profile-image",
            post(forms::handle_profile_image)
                .layer(DefaultBodyLimit::max(PROFILE_IMAGE_BODY_LIMIT)),
        )
        .route("/api/v1/forms/:id/submit", post(forms::handle_submit))
        .route("/api/v1/forms/:id/preview", get(forms::handle_preview))
        .route("/api/v1/forms/:id/export", get(forms::handle_export))
        // AI enhancement placeholder
        .route("/api/v1/forms/:id/enhance", post(not_implemented))
        // History view
        .route("/api/v1/resumes", get(resumes::handle_list))
        .route("/api/v1/resumes/:id", axum::routing::delete(resumes::handle_delete))
        .route("/api/v1/resumes/:id/preview", get(resumes::handle_preview))
        .route("/api/v1/resumes/:id/export", get(resumes::handle_export))
        // Session
        .route("/api/v1/session", get(session::handle_current_user))
        .route("/api/v1/session/sign-out", post(session::handle_sign_out))
        .with_state(state)
}

pub(crate) async fn require_user(state: &AppState) -> Result<Identity, AppError> {
    state
        .session
        .current_user()
        .await
        .ok_or(AppError::Unauthorized)
}

/// Exports `view` and answers with the PDF as an attachment. A copy goes to `EXPORT_DIR`
/// when configured; failing to write it does not fail the download.
pub(crate) async fn deliver_export(
    state: &AppState,
    view: Option<RenderedView>,
) -> Result<Response, AppError> {
    let options = ExportOptions {
        created_at: Some(Utc::now()),
        ..ExportOptions::default()
    };
    let document = export_in_background(view, options).await?;

    if let Some(dir) = &state.config.export_dir {
        match document.save_to(dir).await {
            Ok(path) => info!(path = %path.display(), "Saved exported resume"),
            Err(e) => warn!("Could not save exported resume: {e}"),
        }
    }

    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        document.file_name.replace(['"', '\\'], "_")
    ))
    .map_err(|e| AppError::Internal(anyhow::Error::new(e)))?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static(ExportedDocument::CONTENT_TYPE),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{Body, Bytes};
    use axum::http::{HeaderMap, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::config::Config;
    use crate::form::image::tests::tiny_jpeg;
    use crate::models::resume::ResumeRecord;
    use crate::models::stored::StoredResume;
    use crate::session::ConfiguredSession;
    use crate::store::{InMemoryRecordStore, RecordStore, StoreError};

    struct UnavailableStore;

    #[async_trait]
    impl RecordStore for UnavailableStore {
        async fn create(&self, _: &ResumeRecord, _: Uuid) -> Result<Uuid, StoreError> {
            Err(StoreError::Unavailable("store offline".into()))
        }

        async fn list(&self, _: Uuid) -> Result<Vec<StoredResume>, StoreError> {
            Err(StoreError::Unavailable("store offline".into()))
        }

        async fn get(&self, _: Uuid, _: Uuid) -> Result<StoredResume, StoreError> {
            Err(StoreError::Unavailable("store offline".into()))
        }

        async fn delete(&self, _: Uuid) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("store offline".into()))
        }
    }

    fn jane() -> Identity {
        Identity {
            id: Uuid::new_v4(),
            email: Some("jane@x.com".to_string()),
        }
    }

    fn app_with(store: Arc<dyn RecordStore>, user: Option<Identity>) -> (Router, AppState) {
        let state = AppState::new(
            Config::default(),
            store,
            Arc::new(ConfiguredSession::new(user)),
        );
        (build_router(state.clone()), state)
    }

    fn app(user: Option<Identity>) -> (Router, AppState) {
        app_with(Arc::new(InMemoryRecordStore::default()), user)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, body)
    }

    async fn send_json(app: &Router, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, _, bytes) = send(app, request).await;
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, HeaderMap, Bytes) {
        send(app, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn open_form(app: &Router) -> String {
        let (status, body) = send_json(app, Method::POST, "/api/v1/forms", Value::Null).await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    async fn command(app: &Router, form: &str, cmd: Value) -> (StatusCode, Value) {
        send_json(app, Method::POST, &format!("/api/v1/forms/{form}/commands"), cmd).await
    }

    async fn fill_jane(app: &Router, form: &str) {
        for cmd in [
            json!({"op": "update_scalar", "field": "fullName", "value": "Jane Doe"}),
            json!({"op": "update_scalar", "field": "email", "value": "jane@x.com"}),
            json!({"op": "update_scalar", "field": "template", "value": "classic"}),
            json!({"op": "update_entry", "section": "experience", "index": 0, "field": "title", "value": "Engineer"}),
            json!({"op": "update_entry", "section": "experience", "index": 0, "field": "duration", "value": "2020-2022"}),
        ] {
            let (status, _) = command(app, form, cmd).await;
            assert_eq!(status, StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_health_and_landing() {
        let (app, _) = app(None);
        let (status, _, body) = get(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "resumeforge");

        let (status, headers, body) = get(&app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
        assert!(String::from_utf8_lossy(&body).contains("/api/v1/resumes"));
    }

    #[tokio::test]
    async fn test_create_preview_export_submit_and_history() {
        let user = jane();
        let (app, _) = app(Some(user));
        let form = open_form(&app).await;
        fill_jane(&app, &form).await;

        let (status, _, html) = get(&app, &format!("/api/v1/forms/{form}/preview?width=900")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8_lossy(&html).contains("Jane Doe"));

        let (status, headers, pdf) = get(&app, &format!("/api/v1/forms/{form}/export")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Jane_Doe_Resume.pdf\""
        );
        assert!(pdf.starts_with(b"%PDF-1.4"));

        let (status, body) =
            send_json(&app, Method::POST, &format!("/api/v1/forms/{form}/submit"), Value::Null)
                .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["notification"]["title"], "Resume Generated!");
        assert_eq!(body["record"]["fullName"], "Jane Doe");
        // Blank repeated rows are not part of the frozen snapshot.
        assert_eq!(body["record"]["projects"], json!([]));
        let resume_id = body["id"].as_str().unwrap().to_string();

        let (status, body) = send_json(&app, Method::GET, "/api/v1/resumes", Value::Null).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resumes"].as_array().unwrap().len(), 1);
        assert_eq!(body["resumes"][0]["id"], resume_id.as_str());

        let (status, _, html) = get(&app, &format!("/api/v1/resumes/{resume_id}/preview")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8_lossy(&html).contains("Jane Doe"));

        let (status, _, pdf) = get(&app, &format!("/api/v1/resumes/{resume_id}/export")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(pdf.starts_with(b"%PDF-1.4"));

        let (status, body) = send_json(
            &app,
            Method::DELETE,
            &format!("/api/v1/resumes/{resume_id}"),
            Value::Null,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["notification"]["title"], "Resume deleted");
        assert_eq!(body["resumes"], json!([]));
    }

    #[tokio::test]
    async fn test_form_keeps_editing_after_submit() {
        let (app, _) = app(Some(jane()));
        let form = open_form(&app).await;
        fill_jane(&app, &form).await;
        send_json(&app, Method::POST, &format!("/api/v1/forms/{form}/submit"), Value::Null).await;

        let (status, body) =
            send_json(&app, Method::GET, &format!("/api/v1/forms/{form}"), Value::Null).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "editing");
        assert_eq!(body["preview_mounted"], true);
        assert_eq!(body["record"]["fullName"], "Jane Doe");
    }

    #[tokio::test]
    async fn test_export_without_preview_is_conflict() {
        let (app, _) = app(None);
        let form = open_form(&app).await;
        fill_jane(&app, &form).await;
        let (status, _, body) = get(&app, &format!("/api/v1/forms/{form}/export")).await;
        assert_eq!(status, StatusCode::CONFLICT);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"]["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_export_follows_later_edits() {
        let (app, _) = app(None);
        let form = open_form(&app).await;
        fill_jane(&app, &form).await;
        get(&app, &format!("/api/v1/forms/{form}/preview")).await;
        command(
            &app,
            &form,
            json!({"op": "update_scalar", "field": "fullName", "value": "Janet Roe"}),
        )
        .await;

        let (status, headers, _) = get(&app, &format!("/api/v1/forms/{form}/export")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Janet_Roe_Resume.pdf\""
        );
    }

    #[tokio::test]
    async fn test_submit_missing_fields_stores_nothing() {
        let user = jane();
        let store = Arc::new(InMemoryRecordStore::default());
        let (app, _) = app_with(store.clone(), Some(user.clone()));
        let form = open_form(&app).await;
        command(
            &app,
            &form,
            json!({"op": "update_scalar", "field": "fullName", "value": "Jane"}),
        )
        .await;

        let (status, body) =
            send_json(&app, Method::POST, &format!("/api/v1/forms/{form}/submit"), Value::Null)
                .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["notification"]["title"], "Missing Information");
        assert_eq!(body["notification"]["variant"], "destructive");
        assert!(store.list(user.id).await.unwrap().is_empty());

        let (_, body) =
            send_json(&app, Method::GET, &format!("/api/v1/forms/{form}"), Value::Null).await;
        assert_eq!(body["state"], "editing");
    }

    #[tokio::test]
    async fn test_persistence_requires_user() {
        let (app, _) = app(None);
        let form = open_form(&app).await;
        fill_jane(&app, &form).await;
        let (status, body) =
            send_json(&app, Method::POST, &format!("/api/v1/forms/{form}/submit"), Value::Null)
                .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["notification"]["title"], "Error");
        assert_eq!(body["notification"]["description"], "User not authenticated");
        assert_eq!(body["notification"]["variant"], "destructive");

        // The form went back to editing and can be submitted again later.
        let (_, body) =
            send_json(&app, Method::GET, &format!("/api/v1/forms/{form}"), Value::Null).await;
        assert_eq!(body["state"], "editing");

        let (status, _) = send_json(&app, Method::GET, "/api/v1/resumes", Value::Null).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_empty_form_without_user_reports_missing_fields() {
        let (app, _) = app(None);
        let form = open_form(&app).await;

        let (status, body) =
            send_json(&app, Method::POST, &format!("/api/v1/forms/{form}/submit"), Value::Null)
                .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "MISSING_INFORMATION");
        assert_eq!(body["notification"]["title"], "Missing Information");
    }

    #[tokio::test(start_paused = true)]
    async fn test_opening_forms_evicts_idle_drafts() {
        let config = Config {
            draft_idle_timeout: std::time::Duration::from_secs(60),
            ..Config::default()
        };
        let state = AppState::new(
            config,
            Arc::new(InMemoryRecordStore::default()),
            Arc::new(ConfiguredSession::new(None)),
        );
        let app = build_router(state.clone());

        let stale = open_form(&app).await;
        for _ in 0..9 {
            open_form(&app).await;
        }
        assert_eq!(state.drafts.len(), 10);

        tokio::time::advance(std::time::Duration::from_secs(61)).await;
        open_form(&app).await;
        assert_eq!(state.drafts.len(), 1);

        let (status, _, _) = get(&app, &format!("/api/v1/forms/{stale}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_store_failure_keeps_form_and_notifies() {
        let (app, _) = app_with(Arc::new(UnavailableStore), Some(jane()));
        let form = open_form(&app).await;
        fill_jane(&app, &form).await;

        let (status, body) =
            send_json(&app, Method::POST, &format!("/api/v1/forms/{form}/submit"), Value::Null)
                .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["notification"]["title"], "Error");
        assert_eq!(body["notification"]["description"], "Store unavailable: store offline");

        let (_, body) =
            send_json(&app, Method::GET, &format!("/api/v1/forms/{form}"), Value::Null).await;
        assert_eq!(body["state"], "editing");
        assert_eq!(body["record"]["fullName"], "Jane Doe");
    }

    #[tokio::test]
    async fn test_history_failure_is_distinct_from_empty() {
        let (app, _) = app_with(Arc::new(UnavailableStore), Some(jane()));
        let (status, body) = send_json(&app, Method::GET, "/api/v1/resumes", Value::Null).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "PERSISTENCE_ERROR");
        assert_eq!(body["notification"]["description"], "Failed to load resume history.");
    }

    #[tokio::test]
    async fn test_delete_failure_notifies() {
        let (app, _) = app_with(Arc::new(UnavailableStore), Some(jane()));
        let (status, body) = send_json(
            &app,
            Method::DELETE,
            &format!("/api/v1/resumes/{}", Uuid::new_v4()),
            Value::Null,
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["notification"]["description"], "Failed to delete resume.");
    }

    #[tokio::test]
    async fn test_cannot_touch_other_users_resume() {
        let owner = jane();
        let store = Arc::new(InMemoryRecordStore::default());
        let resume_id = store
            .create(
                &ResumeRecord {
                    full_name: "Jane Doe".to_string(),
                    email: "jane@x.com".to_string(),
                    ..ResumeRecord::default()
                },
                owner.id,
            )
            .await
            .unwrap();

        let (app, _) = app_with(store.clone(), Some(jane()));
        let (status, _) = send_json(
            &app,
            Method::DELETE,
            &format!("/api/v1/resumes/{resume_id}"),
            Value::Null,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _, _) = get(&app, &format!("/api/v1/resumes/{resume_id}/preview")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(store.list(owner.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_profile_image_upload() {
        let (app, _) = app(None);
        let form = open_form(&app).await;
        let uri = format!("/api/v1/forms/{form}/profile-image");

        let (status, _, body) = send(
            &app,
            Request::post(&uri).body(Body::from(tiny_jpeg())).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert!(body["record"]["profileImage"]
            .as_str()
            .unwrap()
            .starts_with("data:image/jpeg;base64,"));

        let oversized = vec![0xFFu8; MAX_PROFILE_IMAGE_BYTES + 1];
        let (status, _, body) =
            send(&app, Request::post(&uri).body(Body::from(oversized)).unwrap()).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["notification"]["title"], "Image too large");

        // The rejected upload left the previous image in place.
        let (_, body) =
            send_json(&app, Method::GET, &format!("/api/v1/forms/{form}"), Value::Null).await;
        assert!(body["record"]["profileImage"].is_string());
    }

    #[tokio::test]
    async fn test_bad_command_leaves_record_unchanged() {
        let (app, _) = app(None);
        let form = open_form(&app).await;
        let (status, body) = command(
            &app,
            &form,
            json!({"op": "update_entry", "section": "education", "index": 3, "field": "degree", "value": "BSc"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (_, body) =
            send_json(&app, Method::GET, &format!("/api/v1/forms/{form}"), Value::Null).await;
        assert_eq!(body["record"]["education"].as_array().unwrap().len(), 1);
        assert_eq!(body["record"]["education"][0]["degree"], "");
    }

    #[tokio::test]
    async fn test_discarded_draft_is_gone() {
        let (app, state) = app(None);
        let form = open_form(&app).await;
        let (status, _, _) = send(
            &app,
            Request::delete(format!("/api/v1/forms/{form}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(state.drafts.is_empty());

        let (status, _, _) = get(&app, &format!("/api/v1/forms/{form}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_enhance_is_not_implemented() {
        let (app, _) = app(None);
        let form = open_form(&app).await;
        let (status, body) = send_json(
            &app,
            Method::POST,
            &format!("/api/v1/forms/{form}/enhance"),
            Value::Null,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(body["error"]["code"], "NOT_IMPLEMENTED");
    }

    #[tokio::test]
    async fn test_sign_out_ends_session() {
        let (app, _) = app(Some(jane()));
        let (_, body) = send_json(&app, Method::GET, "/api/v1/session", Value::Null).await;
        assert_eq!(body["user"]["email"], "jane@x.com");

        let (status, _) =
            send_json(&app, Method::POST, "/api/v1/session/sign-out", Value::Null).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send_json(&app, Method::GET, "/api/v1/session", Value::Null).await;
        assert!(body["user"].is_null());
        let (status, _) = send_json(&app, Method::GET, "/api/v1/resumes", Value::Null).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

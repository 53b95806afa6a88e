use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::export::ExportError;
use crate::form::drafts::DraftError;
use crate::form::image::UploadError;
use crate::form::validation::ValidationError;
use crate::form::{FormError, Notification};
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    MissingFields(#[from] ValidationError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Persistence error: {source}")]
    Persistence {
        #[source]
        source: StoreError,
        notification: Notification,
    },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Not implemented")]
    NotImplemented,
}

impl AppError {
    /// A store failure surfaced with the toast for the operation that hit it.
    /// A missing row is a plain 404.
    pub fn persistence(source: StoreError, notification: Notification) -> Self {
        match source {
            StoreError::NotFound(id) => AppError::NotFound(format!("Resume {id} not found")),
            source => AppError::Persistence {
                source,
                notification,
            },
        }
    }

    fn notification(&self) -> Option<Notification> {
        match self {
            AppError::MissingFields(_) => Some(Notification::missing_information()),
            AppError::Upload(UploadError::TooLarge { .. }) => Some(Notification::image_too_large()),
            AppError::Upload(e) => Some(Notification::error("Error", e.to_string())),
            AppError::Persistence { notification, .. } => Some(notification.clone()),
            AppError::Unauthorized => Some(Notification::not_authenticated()),
            _ => None,
        }
    }
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Validation(e) => AppError::MissingFields(e),
            FormError::Upload(e) => AppError::Upload(e),
            other => AppError::Validation(other.to_string()),
        }
    }
}

impl From<DraftError> for AppError {
    fn from(err: DraftError) -> Self {
        AppError::NotFound(err.to_string())
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::MissingRenderTarget => AppError::Conflict(err.to_string()),
            other => AppError::Internal(anyhow::Error::new(other)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let notification = self.notification();
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::MissingFields(e) => {
                (StatusCode::BAD_REQUEST, "MISSING_INFORMATION", e.to_string())
            }
            AppError::Upload(e @ UploadError::TooLarge { .. }) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "IMAGE_TOO_LARGE", e.to_string())
            }
            AppError::Upload(e) => (StatusCode::BAD_REQUEST, "UPLOAD_ERROR", e.to_string()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Persistence { source, .. } => {
                tracing::error!("Persistence error: {source}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PERSISTENCE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
            AppError::NotImplemented => (
                StatusCode::NOT_IMPLEMENTED,
                "NOT_IMPLEMENTED",
                "This endpoint is not yet implemented".to_string(),
            ),
        };

        let mut body = json!({
            "error": {
                "code": code,
                "message": message
            }
        });
        if let Some(notification) = notification {
            body["notification"] = json!(notification);
        }

        (status, Json(body)).into_response()
    }
}

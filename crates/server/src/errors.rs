use axum::extract::rejection::{FormRejection, JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::ModelError;
use service::ServiceError;
use thiserror::Error;
use tracing::error;

/// Error body returned by every handler:
/// `{"status": 404, "title": "Not Found", "detail": "user u1 not found"}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, detail: Option<String>) -> Self {
        Self { status, title, detail }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "status": self.status.as_u16(),
            "title": self.title,
            "detail": self.detail,
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => Self::new(StatusCode::UNPROCESSABLE_ENTITY, "Validation Error", Some(msg)),
            ServiceError::Model(e) => e.into(),
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, "Not Found", Some(msg)),
            ServiceError::Conflict(msg) => Self::new(StatusCode::CONFLICT, "Conflict", Some(msg)),
            ServiceError::Storage(_) | ServiceError::Internal(_) => {
                error!(error = %e, "request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some(e.to_string()))
            }
        }
    }
}

impl From<ModelError> for JsonApiError {
    fn from(e: ModelError) -> Self {
        let ModelError::Validation(msg) = e;
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "Validation Error", Some(msg))
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(r: JsonRejection) -> Self {
        Self::new(r.status(), "Invalid Request Body", Some(r.body_text()))
    }
}

impl From<FormRejection> for JsonApiError {
    fn from(r: FormRejection) -> Self {
        Self::new(r.status(), "Invalid Form Body", Some(r.body_text()))
    }
}

impl From<PathRejection> for JsonApiError {
    fn from(r: PathRejection) -> Self {
        Self::new(r.status(), "Invalid Path", Some(r.body_text()))
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("storage initialization failed: {0}")]
    Storage(#[from] ServiceError),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

use crate::models::TrackerKind;
use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown tracker '{0}'")]
    UnknownTracker(String),

    #[error("invalid {tracker} data: {message}")]
    InvalidSlice { tracker: TrackerKind, message: String },

    #[error("no record for user '{0}'")]
    UserNotFound(String),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnknownTracker(_) | StoreError::InvalidSlice { .. } => {
                Self::bad_request(err.to_string())
            }
            StoreError::UserNotFound(_) => Self::not_found(err.to_string()),
            StoreError::Io(_) | StoreError::Json(_) => Self::internal(err),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

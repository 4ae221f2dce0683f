//! HTTP error responses.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    domain::{RepositoryError, ValueObjectError},
    usecase::AccountError,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Session Id Needed")]
    MissingSession,

    #[error("invalid session id")]
    InvalidSession,

    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error(transparent)]
    Validation(#[from] ValueObjectError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Account(#[from] AccountError),

    /// Request body missing, not JSON, or missing fields
    #[error("invalid request body: {0}")]
    InvalidBody(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

fn repository_status(error: &RepositoryError) -> StatusCode {
    match error {
        RepositoryError::DuplicateUsername(_) => StatusCode::BAD_REQUEST,
        RepositoryError::UserNotFound(_) | RepositoryError::SessionNotFound(_) => {
            StatusCode::UNAUTHORIZED
        }
        RepositoryError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingSession | ApiError::InvalidSession => StatusCode::UNAUTHORIZED,
            ApiError::RoomNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Repository(e) => repository_status(e),
            ApiError::Account(e) => match e {
                AccountError::Validation(_) => StatusCode::BAD_REQUEST,
                AccountError::Repository(e) => repository_status(e),
                AccountError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AccountError::Hashing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "request rejected");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

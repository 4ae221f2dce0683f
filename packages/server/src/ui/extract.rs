//! Request extractors: the auth boundary and JSON bodies with JSON errors.

use std::sync::Arc;

use axum::{
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
};

use super::{error::ApiError, state::AppState};
use crate::domain::{Session, SessionId};

/// Header carrying the session identifier issued at registration
pub const SESSION_HEADER: &str = "session_id";

/// An authenticated session. Handlers taking this never run for anonymous requests.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession(pub Session);

impl FromRequestParts<Arc<AppState>> for AuthenticatedSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .ok_or(ApiError::MissingSession)?;

        let session_id: SessionId = raw.parse().map_err(|_| ApiError::InvalidSession)?;
        let session = state.users.get_session(&session_id).await?;

        Ok(Self(session))
    }
}

/// `axum::Json` whose rejection is reported as an [`ApiError`] JSON body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    domain::{RoomId, Session, User},
    hub::Room,
    infrastructure::dto::http::{
        LoginRequest, RegisterRequest, RoomSummaryDto, SessionCreatedDto, SessionDto, UserDto,
    },
    ui::{
        error::ApiError,
        extract::{ApiJson, AuthenticatedSession},
        state::AppState,
    },
};

/// Server name and version
pub async fn version() -> String {
    format!("Parlor v{}", env!("CARGO_PKG_VERSION"))
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Register a user and open a session for it
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<Json<SessionCreatedDto>, ApiError> {
    let session_id = state
        .accounts
        .register(request.name, request.username, request.password)
        .await?;

    Ok(Json(SessionCreatedDto {
        session_id: session_id.to_string(),
    }))
}

/// Open a new session for a registered user
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<SessionCreatedDto>, ApiError> {
    let session_id = state
        .accounts
        .login(request.username, request.password)
        .await?;

    Ok(Json(SessionCreatedDto {
        session_id: session_id.to_string(),
    }))
}

/// Echo the caller's session
pub async fn echo(AuthenticatedSession(session): AuthenticatedSession) -> Json<SessionDto> {
    Json(session_to_dto(&session))
}

/// Get list of rooms
pub async fn get_rooms(
    State(state): State<Arc<AppState>>,
    _session: AuthenticatedSession,
) -> Json<Vec<RoomSummaryDto>> {
    let mut summaries = Vec::new();
    for room in state.chat.registry().rooms().await {
        summaries.push(room_to_dto(&room).await);
    }
    Json(summaries)
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    _session: AuthenticatedSession,
    Path(room_id): Path<String>,
) -> Result<Json<RoomSummaryDto>, ApiError> {
    let id = RoomId::new(room_id.clone())?;
    let room = state
        .chat
        .registry()
        .get(&id)
        .await
        .ok_or(ApiError::RoomNotFound(room_id))?;

    Ok(Json(room_to_dto(&room).await))
}

async fn room_to_dto(room: &Room) -> RoomSummaryDto {
    let mut members: Vec<String> = room
        .members()
        .await
        .into_iter()
        .map(|user| user.id.into_string())
        .collect();
    members.dedup();

    RoomSummaryDto {
        id: room.id().to_string(),
        name: room.name().to_string(),
        members,
        created_at: room.created_at().to_rfc3339(),
    }
}

fn session_to_dto(session: &Session) -> SessionDto {
    SessionDto {
        id: session.id.to_string(),
        user: user_to_dto(&session.user),
        created_at: session.created_at.to_rfc3339(),
    }
}

fn user_to_dto(user: &User) -> UserDto {
    UserDto {
        id: user.id.to_string(),
        name: user.name.clone(),
        username: user.username.clone(),
        created_at: user.created_at.to_rfc3339(),
    }
}

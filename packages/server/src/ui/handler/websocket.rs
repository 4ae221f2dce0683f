//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State, ws::WebSocketUpgrade},
    response::Response,
};

use crate::{
    domain::{RoomId, RoomIdFactory, User},
    ui::{error::ApiError, extract::AuthenticatedSession, state::AppState},
};

/// Join the room named in the path
pub async fn chat_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(room_id): Path<String>,
) -> Result<Response, ApiError> {
    let room_id = RoomId::new(room_id)?;
    Ok(upgrade(ws, state, room_id, session.user))
}

/// Join a freshly generated room
pub async fn chat_in_new_room_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    AuthenticatedSession(session): AuthenticatedSession,
) -> Result<Response, ApiError> {
    let room_id = RoomIdFactory::generate()?;
    Ok(upgrade(ws, state, room_id, session.user))
}

fn upgrade(ws: WebSocketUpgrade, state: Arc<AppState>, room_id: RoomId, user: User) -> Response {
    tracing::info!(room_id = %room_id, user_id = %user.id, "upgrading chat connection");

    ws.on_failed_upgrade(|e| tracing::warn!(error = %e, "websocket upgrade failed"))
        .on_upgrade(move |socket| async move {
            let user_id = user.id.clone();
            if let Err(e) = state
                .chat
                .accept_connection(room_id.clone(), user, socket)
                .await
            {
                tracing::warn!(
                    room_id = %room_id,
                    user_id = %user_id,
                    error = %e,
                    "chat connection rejected"
                );
            }
        })
}

//! Route table.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use super::{handler, state::AppState};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handler::version))
        .route("/register", post(handler::register))
        .route("/login", post(handler::login))
        .route("/api/health", get(handler::health_check))
        .route("/api/echo", get(handler::echo))
        .route("/api/rooms", get(handler::get_rooms))
        .route("/api/rooms/{room_id}", get(handler::get_room_detail))
        .route("/api/chat", get(handler::chat_in_new_room_handler))
        .route("/api/chat/{room_id}", get(handler::chat_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

//! Handler modules for HTTP and WebSocket endpoints.

pub mod http;
pub mod websocket;

// Re-export HTTP handlers
pub use http::{echo, get_room_detail, get_rooms, health_check, login, register, version};

// Re-export WebSocket handlers
pub use websocket::{chat_handler, chat_in_new_room_handler};

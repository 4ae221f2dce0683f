//! Parlor chat server library.
//!
//! Clients register, then open a WebSocket to `/api/chat/{room_id}` with their
//! `session_id` header. Every message is persisted and broadcast to all
//! connections in the room, the sender included.

pub mod config;
pub mod domain;
pub mod error;
pub mod hub;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use hub::ChatServer;
pub use ui::run as run_server;

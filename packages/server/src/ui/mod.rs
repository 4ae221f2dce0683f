//! HTTP / WebSocket surface of the chat server.

pub mod error;
pub mod extract;
mod handler;
pub mod router;
mod runner;
mod signal;
pub mod state;

pub use router::create_router;
pub use runner::{run, serve};
pub use signal::shutdown_signal;

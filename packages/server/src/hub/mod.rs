//! Room registry and message fan-out engine.
//!
//! ```text
//! ChatServer ──owns──> RoomRegistry ──Arc──> Room ──members──> Connection
//!     │
//!     └─ accept_connection ─ spawns ─> MessagePipeline (one task per connection)
//! ```
//!
//! Every room serializes `join` / `leave` / `broadcast` behind its own mutex.
//! A pipeline task always leaves its room before it finishes.

pub mod connection;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod room;
pub mod server;

pub use connection::{Connection, ConnectionState, FrameReceiver};
pub use error::{ChatError, TransportError};
pub use pipeline::MessagePipeline;
pub use registry::RoomRegistry;
pub use room::{BroadcastOutcome, Room};
pub use server::ChatServer;

//! One live bidirectional stream bound to a user.

use tokio::sync::mpsc;

use super::error::{InvalidTransition, TransportError};
use crate::{domain::ConnectionId, infrastructure::dto::websocket::ServerFrame};

/// Receiving half of a connection's outbound queue, drained by its writer task.
pub type FrameReceiver = mpsc::UnboundedReceiver<ServerFrame>;

/// Handle used to push frames to one connection.
///
/// Cloning is cheap; the room keeps one clone and the owning pipeline another.
/// Once the writer task drops the [`FrameReceiver`], every `send` fails.
#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnectionId,
    outbound: mpsc::UnboundedSender<ServerFrame>,
}

impl Connection {
    /// Create a connection handle and the receiver its writer task drains.
    pub fn channel() -> (Self, FrameReceiver) {
        let (outbound, rx) = mpsc::unbounded_channel();
        let connection = Self {
            id: ConnectionId::generate(),
            outbound,
        };
        (connection, rx)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue a frame for delivery.
    pub fn send(&self, frame: ServerFrame) -> Result<(), TransportError> {
        self.outbound
            .send(frame)
            .map_err(|_| TransportError::ConnectionClosed(self.id))
    }

    pub fn is_closed(&self) -> bool {
        self.outbound.is_closed()
    }

    /// Resolves once the writer side has gone away.
    pub async fn closed(&self) {
        self.outbound.closed().await
    }
}

/// Lifecycle of a connection.
///
/// `Connecting -> Joined -> {Receiving <-> Broadcasting} -> Closed`.
/// Any state but `Connecting` may close; `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Joined,
    Receiving,
    Broadcasting,
    Closed,
}

impl ConnectionState {
    pub fn can_transition_to(self, next: ConnectionState) -> bool {
        use ConnectionState::*;

        matches!(
            (self, next),
            (Connecting, Joined)
                | (Joined, Receiving)
                | (Receiving, Broadcasting)
                | (Broadcasting, Receiving)
                | (Joined | Receiving | Broadcasting, Closed)
        )
    }

    /// Move to `next`, leaving `self` untouched when the move is not allowed.
    pub fn transition(&mut self, next: ConnectionState) -> Result<(), InvalidTransition> {
        if !self.can_transition_to(next) {
            return Err(InvalidTransition {
                from: *self,
                to: next,
            });
        }
        *self = next;
        Ok(())
    }

    pub fn is_closed(self) -> bool {
        self == ConnectionState::Closed
    }
}

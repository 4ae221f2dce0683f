//! Hub error definitions.

use thiserror::Error;

use super::connection::ConnectionState;
use crate::{domain::{ConnectionId, RepositoryError}, usecase::SendMessageError};

/// Failure of the stream underneath one connection. Fatal to that connection only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The connection's writer has stopped; nothing more can be delivered.
    #[error("connection {0} is closed")]
    ConnectionClosed(ConnectionId),

    #[error("socket error: {0}")]
    Socket(String),

    #[error("failed to encode frame: {0}")]
    Encode(String),
}

/// Errors surfaced while serving one chat connection
#[derive(Debug, Error)]
pub enum ChatError {
    /// Malformed inbound frame. Reported to the sender; the loop continues.
    #[error("invalid message: {0}")]
    Protocol(String),

    /// The store rejected the message. Reported to the sender; the message is dropped.
    #[error("failed to save message: {0}")]
    Persistence(#[from] RepositoryError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl From<SendMessageError> for ChatError {
    fn from(err: SendMessageError) -> Self {
        match err {
            SendMessageError::Persistence(e) => Self::Persistence(e),
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("invalid connection state transition: {from:?} -> {to:?}")]
pub struct InvalidTransition {
    pub from: ConnectionState,
    pub to: ConnectionState,
}

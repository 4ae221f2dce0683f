//! Per-connection read loop: decode, persist, broadcast.

use std::{ops::ControlFlow, sync::Arc};

use axum::extract::ws::Message;
use futures_util::{Stream, StreamExt};
use tokio::sync::watch;

use super::{
    connection::{Connection, ConnectionState},
    error::{ChatError, TransportError},
    room::Room,
};
use crate::{
    domain::{ChatRepository, MessageContent, User},
    infrastructure::dto::websocket::{InboundChatFrame, ServerFrame},
    usecase::SendMessageUseCase,
};

/// Drives one joined connection until its stream ends.
///
/// The pipeline owns the connection's membership: whatever ends the loop
/// (stream error, close frame, writer gone, server shutdown), `run` calls
/// [`Room::leave`] exactly once before returning.
pub struct MessagePipeline {
    room: Arc<Room>,
    connection: Connection,
    user: User,
    send_message: SendMessageUseCase,
    state: ConnectionState,
}

impl MessagePipeline {
    /// Build a pipeline for a connection that has already joined `room`.
    pub fn new(
        room: Arc<Room>,
        connection: Connection,
        user: User,
        repository: Arc<dyn ChatRepository>,
    ) -> Self {
        Self {
            room,
            connection,
            user,
            send_message: SendMessageUseCase::new(repository),
            state: ConnectionState::Joined,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Run the read loop. Returns the final state, always `Closed`.
    pub async fn run<S>(mut self, mut inbound: S, mut shutdown: watch::Receiver<bool>) -> ConnectionState
    where
        S: Stream<Item = Result<Message, axum::Error>> + Unpin,
    {
        self.advance(ConnectionState::Receiving);

        loop {
            let next = tokio::select! {
                _ = wait_for_shutdown(&mut shutdown) => {
                    tracing::info!(connection_id = %self.connection.id(), "server shutting down, closing connection");
                    break;
                }
                _ = self.connection.closed() => {
                    tracing::debug!(connection_id = %self.connection.id(), "writer stopped");
                    break;
                }
                next = inbound.next() => next,
            };

            let message = match next {
                Some(Ok(message)) => message,
                Some(Err(e)) => {
                    let error = TransportError::Socket(e.to_string());
                    tracing::debug!(connection_id = %self.connection.id(), error = %error, "read failed");
                    break;
                }
                None => {
                    tracing::debug!(connection_id = %self.connection.id(), "stream ended");
                    break;
                }
            };

            if self.handle_message(message).await.is_break() {
                break;
            }
        }

        self.close().await
    }

    async fn handle_message(&mut self, message: Message) -> ControlFlow<()> {
        match message {
            Message::Text(text) => self.handle_payload(text.as_str().as_bytes()).await,
            Message::Binary(bytes) => self.handle_payload(&bytes).await,
            Message::Close(frame) => {
                tracing::info!(
                    connection_id = %self.connection.id(),
                    user_id = %self.user.id,
                    reason = ?frame.map(|f| f.reason.as_str().to_string()),
                    "client requested close"
                );
                ControlFlow::Break(())
            }
            // Ping/pong is handled by the WebSocket implementation
            Message::Ping(_) | Message::Pong(_) => ControlFlow::Continue(()),
        }
    }

    async fn handle_payload(&mut self, payload: &[u8]) -> ControlFlow<()> {
        let content = match decode(payload) {
            Ok(content) => content,
            Err(e) => return self.report(e),
        };

        self.advance(ConnectionState::Broadcasting);
        let result = self
            .send_message
            .execute(&self.room, &self.user.id, content)
            .await;
        self.advance(ConnectionState::Receiving);

        match result {
            Ok(_) => ControlFlow::Continue(()),
            Err(e) => self.report(e.into()),
        }
    }

    /// Send an error frame back to this connection only.
    fn report(&self, error: ChatError) -> ControlFlow<()> {
        tracing::warn!(
            connection_id = %self.connection.id(),
            user_id = %self.user.id,
            error = %error,
            "message rejected"
        );

        match self.connection.send(ServerFrame::error(&error)) {
            Ok(()) => ControlFlow::Continue(()),
            Err(_) => ControlFlow::Break(()),
        }
    }

    async fn close(mut self) -> ConnectionState {
        self.room.leave(&self.connection.id()).await;
        self.advance(ConnectionState::Closed);

        tracing::info!(
            room_id = %self.room.id(),
            connection_id = %self.connection.id(),
            user_id = %self.user.id,
            "connection closed"
        );
        self.state
    }

    fn advance(&mut self, next: ConnectionState) {
        if let Err(e) = self.state.transition(next) {
            tracing::error!(connection_id = %self.connection.id(), error = %e, "bug: illegal state change");
        }
    }
}

/// Decode and validate one inbound chat frame.
fn decode(payload: &[u8]) -> Result<MessageContent, ChatError> {
    let frame: InboundChatFrame =
        serde_json::from_slice(payload).map_err(|e| ChatError::Protocol(e.to_string()))?;
    MessageContent::new(frame.content).map_err(|e| ChatError::Protocol(e.to_string()))
}

/// Resolves once shutdown is requested. Never resolves if the sender is gone.
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}

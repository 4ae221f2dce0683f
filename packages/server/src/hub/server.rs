//! Composition of registry and pipelines behind the HTTP boundary.

use std::{sync::Arc, time::Duration};

use axum::extract::ws::Message;
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::{sync::watch, task::JoinHandle};

use super::{
    connection::{Connection, FrameReceiver},
    error::{ChatError, TransportError},
    pipeline::MessagePipeline,
    registry::RoomRegistry,
};
use crate::{
    domain::{ChatRepository, ConnectionId, RoomId, User},
    infrastructure::dto::websocket::ServerFrame,
};

/// How long a closing session may spend flushing queued frames.
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Owns the room registry and spawns one session task per accepted connection.
pub struct ChatServer {
    registry: RoomRegistry,
    repository: Arc<dyn ChatRepository>,
    shutdown: watch::Sender<bool>,
}

impl ChatServer {
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            registry: RoomRegistry::new(),
            repository,
            shutdown,
        }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    /// Join `user` to `room_id` over an upgraded socket and start its session.
    ///
    /// The confirmation notice is written before this returns. The session
    /// itself runs on its own task; the returned handle resolves once the
    /// connection has left its room.
    ///
    /// # Errors
    ///
    /// `ChatError::Transport` if the confirmation cannot be written. The
    /// connection has already left the room in that case.
    pub async fn accept_connection<W>(
        &self,
        room_id: RoomId,
        user: User,
        socket: W,
    ) -> Result<JoinHandle<()>, ChatError>
    where
        W: Stream<Item = Result<Message, axum::Error>>
            + Sink<Message, Error = axum::Error>
            + Send
            + 'static,
    {
        let room = self.registry.get_or_create(&room_id).await;
        let (connection, outbound) = Connection::channel();
        let connection_id = connection.id();
        room.join(connection.clone(), user.clone()).await;

        let (mut sink, inbound) = socket.split();
        if let Err(e) = write_frame(&mut sink, &ServerFrame::connected(&room_id)).await {
            tracing::warn!(
                room_id = %room_id,
                connection_id = %connection_id,
                error = %e,
                "failed to confirm connection"
            );
            room.leave(&connection_id).await;
            return Err(e.into());
        }

        let pipeline = MessagePipeline::new(room, connection, user, self.repository.clone());
        let shutdown = self.shutdown.subscribe();

        Ok(tokio::spawn(run_session(
            pipeline, inbound, sink, outbound, shutdown,
        )))
    }

    /// Ask every running session to close. Sessions leave their rooms promptly.
    pub fn shutdown(&self) {
        tracing::info!("closing all chat sessions");
        self.shutdown.send_replace(true);
    }
}

async fn run_session<St, Si>(
    pipeline: MessagePipeline,
    inbound: St,
    sink: Si,
    outbound: FrameReceiver,
    shutdown: watch::Receiver<bool>,
) where
    St: Stream<Item = Result<Message, axum::Error>> + Unpin,
    Si: Sink<Message, Error = axum::Error> + Unpin + Send + 'static,
{
    let connection_id = pipeline.connection().id();
    let mut writer = tokio::spawn(forward_frames(sink, outbound, connection_id));

    pipeline.run(inbound, shutdown).await;

    // Every sender is gone now, so the writer drains what is queued and exits.
    if tokio::time::timeout(WRITER_DRAIN_TIMEOUT, &mut writer)
        .await
        .is_err()
    {
        tracing::warn!(connection_id = %connection_id, "writer did not drain in time");
        writer.abort();
    }
}

/// Writer task: move queued frames onto the socket until the queue closes.
async fn forward_frames<Si>(mut sink: Si, mut outbound: FrameReceiver, connection_id: ConnectionId)
where
    Si: Sink<Message, Error = axum::Error> + Unpin,
{
    while let Some(frame) = outbound.recv().await {
        if let Err(e) = write_frame(&mut sink, &frame).await {
            tracing::debug!(connection_id = %connection_id, error = %e, "write failed");
            return;
        }
    }
    let _ = sink.close().await;
}

async fn write_frame<Si>(sink: &mut Si, frame: &ServerFrame) -> Result<(), TransportError>
where
    Si: Sink<Message, Error = axum::Error> + Unpin,
{
    let json = frame
        .to_json()
        .map_err(|e| TransportError::Encode(e.to_string()))?;
    sink.send(Message::Text(json.into()))
        .await
        .map_err(|e| TransportError::Socket(e.to_string()))
}

//! Shared test fixtures: an in-process server plus HTTP / WebSocket helpers.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use parlor_server::{
    domain::{ChatId, ChatRepository, CreateChatRequest, RepositoryError},
    infrastructure::repository::{InMemoryChatRepository, InMemoryUserRepository},
    ui::{serve, state::AppState},
};
use tokio::{net::TcpStream, sync::oneshot, task::JoinHandle};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{self, Message, client::IntoClientRequest, http::HeaderValue},
};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// Password every fixture user registers with
pub const PASSWORD: &str = "hunter2";

/// Chat store that rejects every write
pub struct FailingChatRepository;

#[async_trait]
impl ChatRepository for FailingChatRepository {
    async fn create_chat(&self, _request: CreateChatRequest) -> Result<ChatId, RepositoryError> {
        Err(RepositoryError::Unavailable("database is down".to_string()))
    }
}

pub struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server on an ephemeral port, backed by `chats`.
    pub async fn start(chats: Arc<dyn ChatRepository>) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(AppState::new(Arc::new(InMemoryUserRepository::new()), chats));
        let (shutdown, shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            serve(listener, state, async move {
                let _ = shutdown_rx.await;
            })
            .await
            .expect("Server failed");
        });

        Self {
            addr,
            shutdown: Some(shutdown),
            handle,
        }
    }

    pub async fn start_in_memory() -> (Self, Arc<InMemoryChatRepository>) {
        let chats = Arc::new(InMemoryChatRepository::new());
        (Self::start(chats.clone()).await, chats)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self, path: &str) -> String {
        format!("ws://{}{}", self.addr, path)
    }

    /// Register `username` and return its session id.
    pub async fn register(&self, username: &str) -> String {
        let response = reqwest::Client::new()
            .post(format!("{}/register", self.base_url()))
            .json(&serde_json::json!({
                "name": username.to_uppercase(),
                "username": username,
                "password": PASSWORD,
            }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 200);

        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        body["session_id"].as_str().unwrap().to_string()
    }

    /// User id behind a session.
    pub async fn user_id(&self, session_id: &str) -> String {
        let body: serde_json::Value = reqwest::Client::new()
            .get(format!("{}/api/echo", self.base_url()))
            .header("session_id", session_id)
            .send()
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse JSON");
        body["user"]["id"].as_str().unwrap().to_string()
    }

    /// Open a chat connection on `path` (e.g. `/api/chat/lobby`).
    pub async fn try_connect(
        &self,
        path: &str,
        session_id: Option<&str>,
    ) -> Result<WsClient, tungstenite::Error> {
        let mut request = self.ws_url(path).into_client_request()?;
        if let Some(session_id) = session_id {
            request
                .headers_mut()
                .insert("session_id", HeaderValue::from_str(session_id).unwrap());
        }
        connect_async(request).await.map(|(ws, _)| ws)
    }

    /// Join `room` and consume the confirmation notice.
    pub async fn join(&self, room: &str, session_id: &str) -> WsClient {
        let mut ws = self
            .try_connect(&format!("/api/chat/{room}"), Some(session_id))
            .await
            .expect("Failed to connect");
        let notice = recv_json(&mut ws).await;
        assert_eq!(notice["msg"], format!("Connected to room: {room}"));
        ws
    }

    /// Poll the room detail endpoint as `session_id` until it reports `expected` members.
    pub async fn wait_for_members(
        &self,
        session_id: &str,
        room: &str,
        expected: usize,
    ) -> serde_json::Value {
        let client = reqwest::Client::new();
        let deadline = tokio::time::Instant::now() + RECV_TIMEOUT;
        loop {
            let body: serde_json::Value = client
                .get(format!("{}/api/rooms/{room}", self.base_url()))
                .header("session_id", session_id)
                .send()
                .await
                .expect("Failed to send request")
                .json()
                .await
                .expect("Failed to parse JSON");
            if body["members"].as_array().map(Vec::len) == Some(expected) {
                return body;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "room {room} never reached {expected} members: {body}"
            );
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        self.handle.abort();
    }
}

pub async fn send_json(ws: &mut WsClient, value: serde_json::Value) {
    ws.send(Message::Text(value.to_string().into()))
        .await
        .expect("Failed to send frame");
}

/// Next text frame as JSON. Panics on timeout.
pub async fn recv_json(ws: &mut WsClient) -> serde_json::Value {
    loop {
        let message = tokio::time::timeout(RECV_TIMEOUT, ws.next())
            .await
            .expect("Timed out waiting for frame")
            .expect("Stream ended")
            .expect("WebSocket error");
        if let Message::Text(text) = message {
            return serde_json::from_str(text.as_str()).expect("Frame is not JSON");
        }
    }
}

/// Assert that no text frame arrives within `wait`.
pub async fn assert_no_frame(ws: &mut WsClient, wait: Duration) {
    let result = tokio::time::timeout(wait, async {
        loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => return Some(text.to_string()),
                Some(Ok(_)) => continue,
                _ => return None,
            }
        }
    })
    .await;
    if let Ok(Some(text)) = result {
        panic!("Unexpected frame: {text}");
    }
}

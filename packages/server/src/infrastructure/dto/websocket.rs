//! WebSocket frame DTOs for the chat application.
//!
//! Frames are JSON objects without a type tag; the set of keys tells them
//! apart on the client.

use serde::{Deserialize, Serialize};

use crate::domain::{ChatMessage, RoomId};

/// Frame sent by clients. Extra keys (e.g. a self-reported `user_id`) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InboundChatFrame {
    pub content: String,
}

/// Chat message broadcast to every member of a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatFrame {
    pub content: String,
    pub user_id: String,
    /// RFC 3339
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorFrame {
    pub error: String,
}

/// Control notice such as the join confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeFrame {
    pub msg: String,
}

/// Every frame the server writes to a connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerFrame {
    Chat(ChatFrame),
    Error(ErrorFrame),
    Notice(NoticeFrame),
}

impl ServerFrame {
    pub fn chat(message: &ChatMessage) -> Self {
        Self::Chat(ChatFrame {
            content: message.content.as_str().to_string(),
            user_id: message.user_id.as_str().to_string(),
            created_at: message.created_at.to_rfc3339(),
        })
    }

    pub fn error(error: impl std::fmt::Display) -> Self {
        Self::Error(ErrorFrame {
            error: error.to_string(),
        })
    }

    /// Confirmation sent right after a connection joins `room_id`.
    pub fn connected(room_id: &RoomId) -> Self {
        Self::Notice(NoticeFrame {
            msg: format!("Connected to room: {room_id}"),
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

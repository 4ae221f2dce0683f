//! Core domain models for the chat application.

use serde::{Deserialize, Serialize};

use super::value_object::{ChatId, MessageContent, RoomId, SessionId, Timestamp, UserId};

/// An authenticated identity.
///
/// Loaded by the auth boundary and handed to the hub by value; never mutated
/// after that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub created_at: Timestamp,
}

impl User {
    pub fn new(id: UserId, name: String, username: String, created_at: Timestamp) -> Self {
        Self {
            id,
            name,
            username,
            created_at,
        }
    }
}

/// A login session resolved from the `session_id` request header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub user: User,
    pub created_at: Timestamp,
}

/// A chat message as it travels through the hub.
///
/// Transient: built when a frame arrives, persisted, broadcast, then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Sender's user ID
    pub user_id: UserId,
    /// Message content
    pub content: MessageContent,
    /// Server-assigned time of receipt
    pub created_at: Timestamp,
}

impl ChatMessage {
    pub fn new(user_id: UserId, content: MessageContent, created_at: Timestamp) -> Self {
        Self {
            user_id,
            content,
            created_at,
        }
    }
}

/// Input of [`ChatRepository::create_chat`](super::ChatRepository::create_chat)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateChatRequest {
    pub content: MessageContent,
    pub user_id: UserId,
    pub room_id: RoomId,
}

/// The durable record of a chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: ChatId,
    pub content: MessageContent,
    pub user_id: UserId,
    pub room_id: RoomId,
    pub created_at: Timestamp,
}

//! InMemory Chat Repository 実装

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Chat, ChatId, ChatRepository, CreateChatRequest, RepositoryError, RoomId, Timestamp,
};

/// インメモリ Chat Repository 実装
///
/// 永続化されたチャットを挿入順に保持します。
#[derive(Default)]
pub struct InMemoryChatRepository {
    chats: Mutex<Vec<Chat>>,
}

impl InMemoryChatRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored chats, oldest first.
    pub async fn chats(&self) -> Vec<Chat> {
        self.chats.lock().await.clone()
    }

    /// Stored chats of one room, oldest first.
    pub async fn chats_in_room(&self, room_id: &RoomId) -> Vec<Chat> {
        let chats = self.chats.lock().await;
        chats
            .iter()
            .filter(|chat| &chat.room_id == room_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn create_chat(&self, request: CreateChatRequest) -> Result<ChatId, RepositoryError> {
        let id = ChatId::generate();
        let chat = Chat {
            id,
            content: request.content,
            user_id: request.user_id,
            room_id: request.room_id,
            created_at: Timestamp::now(),
        };

        self.chats.lock().await.push(chat);
        tracing::debug!(chat_id = %id, "chat stored");

        Ok(id)
    }
}

//! Server state shared by every handler.

use std::sync::Arc;

use crate::{
    domain::{ChatRepository, UserRepository},
    hub::ChatServer,
    infrastructure::repository::{InMemoryChatRepository, InMemoryUserRepository},
    usecase::AccountUseCase,
};

/// Shared application state
pub struct AppState {
    /// Room registry and per-connection sessions
    pub chat: Arc<ChatServer>,
    /// Users and sessions（認証境界）
    pub users: Arc<dyn UserRepository>,
    /// Registration and login
    pub accounts: AccountUseCase,
}

impl AppState {
    pub fn new(users: Arc<dyn UserRepository>, chats: Arc<dyn ChatRepository>) -> Self {
        Self {
            chat: Arc::new(ChatServer::new(chats)),
            accounts: AccountUseCase::new(users.clone()),
            users,
        }
    }

    /// State backed by the in-memory repositories.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryChatRepository::new()),
        )
    }
}

//! Persistence boundary.
//!
//! The hub only talks to these traits; concrete stores live in
//! `infrastructure::repository`.

use async_trait::async_trait;

use super::{
    entity::{CreateChatRequest, Session, User},
    error::RepositoryError,
    value_object::{ChatId, PasswordHash, SessionId, UserId},
};

/// Durable storage of chat messages
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Persist one chat message and return its new identifier.
    async fn create_chat(&self, request: CreateChatRequest) -> Result<ChatId, RepositoryError>;
}

/// Users and their login sessions
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Register a user. Usernames are unique.
    async fn create_user(
        &self,
        name: String,
        username: String,
        password_hash: PasswordHash,
    ) -> Result<User, RepositoryError>;

    async fn get_user(&self, id: &UserId) -> Result<User, RepositoryError>;

    /// Look a user up by username together with its stored password hash.
    async fn get_credentials(&self, username: &str) -> Result<(User, PasswordHash), RepositoryError>;

    /// Issue a new session for an existing user.
    async fn create_session(&self, user_id: &UserId) -> Result<SessionId, RepositoryError>;

    async fn get_session(&self, id: &SessionId) -> Result<Session, RepositoryError>;
}

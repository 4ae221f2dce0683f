//! Domain layer for the chat application.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use entity::{Chat, ChatMessage, CreateChatRequest, Session, User};
pub use error::{RepositoryError, ValueObjectError};
pub use factory::{RoomIdFactory, UserIdFactory};
pub use repository::{ChatRepository, UserRepository};
#[cfg(test)]
pub use repository::{MockChatRepository, MockUserRepository};
pub use value_object::{
    ChatId, ConnectionId, MessageContent, PasswordHash, RoomId, SessionId, Timestamp, UserId,
};

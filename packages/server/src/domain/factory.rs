//! Domain factories for creating domain entities and value objects.

use super::{RoomId, UserId, error::ValueObjectError};

/// Length of generated room identifiers
pub const GENERATED_ROOM_ID_LEN: usize = 8;

/// Factory for generating RoomId instances.
///
/// Used when a client opens a chat connection without naming a room.
pub struct RoomIdFactory;

impl RoomIdFactory {
    /// Generate a short random RoomId (lowercase hex, taken from a UUID v4).
    ///
    /// # Errors
    ///
    /// This method should not fail in practice, but returns Result for consistency
    /// with the domain error handling pattern.
    pub fn generate() -> Result<RoomId, ValueObjectError> {
        let mut id = uuid::Uuid::new_v4().simple().to_string();
        id.truncate(GENERATED_ROOM_ID_LEN);
        RoomId::new(id)
    }
}

/// Factory for generating UserId instances.
pub struct UserIdFactory;

impl UserIdFactory {
    pub fn generate() -> Result<UserId, ValueObjectError> {
        UserId::new(uuid::Uuid::new_v4().simple().to_string())
    }
}

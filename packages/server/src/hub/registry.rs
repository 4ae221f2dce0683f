//! Room lookup by identifier.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;

use super::room::Room;
use crate::domain::{RoomId, Timestamp};

/// Maps room identifiers to rooms, creating them on first reference.
///
/// Rooms are never removed; an emptied room stays registered until the
/// registry itself is dropped.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: Mutex<HashMap<RoomId, Arc<Room>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the room for `room_id`, creating an empty one if needed.
    ///
    /// Lookup and insertion happen under one lock, so concurrent first
    /// joiners of the same id all receive the same instance.
    pub async fn get_or_create(&self, room_id: &RoomId) -> Arc<Room> {
        let mut rooms = self.rooms.lock().await;
        rooms
            .entry(room_id.clone())
            .or_insert_with(|| {
                tracing::info!(room_id = %room_id, "room created");
                Arc::new(Room::new(room_id.clone(), Timestamp::now()))
            })
            .clone()
    }

    pub async fn get(&self, room_id: &RoomId) -> Option<Arc<Room>> {
        self.rooms.lock().await.get(room_id).cloned()
    }

    /// Snapshot of every room, sorted by identifier.
    pub async fn rooms(&self) -> Vec<Arc<Room>> {
        let mut rooms: Vec<Arc<Room>> = self.rooms.lock().await.values().cloned().collect();
        rooms.sort_by(|a, b| a.id().cmp(b.id()));
        rooms
    }

    pub async fn len(&self) -> usize {
        self.rooms.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rooms.lock().await.is_empty()
    }
}

//! Repository trait for rooms.
//!
//! The use cases depend on this trait only; the in-memory registry lives in
//! the infrastructure layer.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use super::{Room, RoomId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Room '{0}' not found")]
    RoomNotFound(String),

    #[error("Room '{0}' already exists")]
    RoomAlreadyExists(String),
}

/// Process-wide registry of rooms keyed by id.
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Register a freshly created room.
    async fn insert_room(&self, room: Room) -> Result<Arc<Room>, RepositoryError>;

    async fn get_room(&self, room_id: &RoomId) -> Result<Arc<Room>, RepositoryError>;

    async fn remove_room(&self, room_id: &RoomId) -> Option<Arc<Room>>;

    /// Remove the room only if it currently has no members.
    ///
    /// Returns `true` if the room was removed.
    async fn remove_room_if_empty(&self, room_id: &RoomId) -> bool;

    /// All rooms, oldest first.
    async fn list_rooms(&self) -> Vec<Arc<Room>>;

    async fn count_rooms(&self) -> usize;
}

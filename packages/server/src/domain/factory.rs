//! Domain factories for creating identifiers.

use super::{RoomId, UserId};

/// Factory for generating RoomId instances.
///
/// Keeps identifier generation apart from the validation in `RoomId::new`.
pub struct RoomIdFactory;

impl RoomIdFactory {
    /// Generate a new RoomId with a random UUID v4.
    pub fn generate() -> RoomId {
        RoomId::from_uuid(uuid::Uuid::new_v4())
    }
}

/// Factory for generating UserId instances.
pub struct UserIdFactory;

impl UserIdFactory {
    /// Generate a new UserId with a random UUID v4.
    pub fn generate() -> UserId {
        UserId::from_uuid(uuid::Uuid::new_v4())
    }
}

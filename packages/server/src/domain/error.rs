//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// UserId validation error
    #[error("UserId cannot be empty")]
    UserIdEmpty,

    /// UserId too long error
    #[error("UserId cannot exceed {max} characters (got {actual})")]
    UserIdTooLong { max: usize, actual: usize },

    /// RoomId validation error
    #[error("RoomId cannot be empty")]
    RoomIdEmpty,

    /// RoomId too long error
    #[error("RoomId cannot exceed {max} characters (got {actual})")]
    RoomIdTooLong { max: usize, actual: usize },

    /// Display name (room or user) validation error
    #[error("Display name cannot be empty")]
    DisplayNameEmpty,
}

/// Errors related to Room domain logic
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomError {
    /// A member with the same user id already exists in the room
    #[error("User '{0}' is already a member of this room")]
    DuplicateUser(String),

    /// No member with the given user id
    #[error("User '{0}' is not a member of this room")]
    UserNotFound(String),

    /// A round cannot start or resolve a drawer without members
    #[error("Room has no members")]
    EmptyRoom,

    /// The room drained its last member and is being torn down
    #[error("Room is closed")]
    Closed,
}

//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{RepositoryError, ValueObjectError};

/// Errors of `CreateRoomUseCase`
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CreateRoomError {
    #[error("Invalid room name: {0}")]
    InvalidRoomName(#[from] ValueObjectError),

    #[error("Room '{0}' already exists")]
    RoomAlreadyExists(String),
}

/// Errors of `JoinRoomUseCase`
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JoinRoomError {
    #[error("Room '{0}' not found")]
    RoomNotFound(String),

    #[error("Invalid user name: {0}")]
    InvalidUserName(#[from] ValueObjectError),

    #[error("User '{0}' is already a member")]
    DuplicateUser(String),
}

/// Errors of `QuitRoomUseCase`
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuitRoomError {
    #[error("Room '{0}' not found")]
    RoomNotFound(String),

    #[error("User '{0}' not found")]
    UserNotFound(String),
}

/// Errors of `StartRoundUseCase`
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StartRoundError {
    #[error("Room '{0}' not found")]
    RoomNotFound(String),

    #[error("Room has no members")]
    EmptyRoom,
}

/// Errors of `AttachChannelUseCase`
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AttachError {
    #[error("Room '{0}' not found")]
    RoomNotFound(String),

    #[error("User '{0}' not found")]
    UserNotFound(String),
}

/// Errors raised while handling an inbound frame.
///
/// Any of these ends the read loop of the connection that sent the frame.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HubError {
    #[error("Room '{0}' not found")]
    RoomNotFound(String),

    #[error("Sender '{0}' is no longer a member")]
    SenderNotFound(String),

    #[error("Malformed frame: {0}")]
    MalformedFrame(String),
}

impl From<RepositoryError> for CreateRoomError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::RoomNotFound(id) | RepositoryError::RoomAlreadyExists(id) => {
                CreateRoomError::RoomAlreadyExists(id)
            }
        }
    }
}

impl From<RepositoryError> for JoinRoomError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::RoomNotFound(id) | RepositoryError::RoomAlreadyExists(id) => {
                JoinRoomError::RoomNotFound(id)
            }
        }
    }
}

impl From<RepositoryError> for QuitRoomError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::RoomNotFound(id) | RepositoryError::RoomAlreadyExists(id) => {
                QuitRoomError::RoomNotFound(id)
            }
        }
    }
}

impl From<RepositoryError> for StartRoundError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::RoomNotFound(id) | RepositoryError::RoomAlreadyExists(id) => {
                StartRoundError::RoomNotFound(id)
            }
        }
    }
}

impl From<RepositoryError> for AttachError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::RoomNotFound(id) | RepositoryError::RoomAlreadyExists(id) => {
                AttachError::RoomNotFound(id)
            }
        }
    }
}

impl From<RepositoryError> for HubError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::RoomNotFound(id) | RepositoryError::RoomAlreadyExists(id) => {
                HubError::RoomNotFound(id)
            }
        }
    }
}

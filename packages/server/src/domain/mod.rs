//! Domain layer for the draw-and-guess game.
//!
//! Rooms, members, turn rotation and the traits the use cases depend on.
//! Nothing in here knows about HTTP, WebSocket framing or JSON DTOs.

pub mod connection;
pub mod entity;
pub mod error;
pub mod factory;
pub mod member_list;
pub mod repository;
pub mod topic;
pub mod turn;
pub mod value_object;

pub use connection::{ChannelKind, ConnectionChannel, ConnectionError, ConnectionId, Frame, Outbox};
pub use entity::{ReadyFlag, Room, RoomState, RoundDetail, UserEntry};
pub use error::{RoomError, ValueObjectError};
pub use factory::{RoomIdFactory, UserIdFactory};
pub use member_list::RoomMemberList;
pub use repository::{RepositoryError, RoomRepository};
pub use topic::{TopicPick, TopicSource};
pub use turn::{DrawAssignment, TurnScheduler};
pub use value_object::{DisplayName, RoomId, Timestamp, UserId};

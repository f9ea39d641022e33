//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod attach_channel;
pub mod broadcast;
pub mod create_room;
pub mod detach_channel;
pub mod error;
pub mod join_room;
pub mod quit_room;
pub mod room_query;
pub mod start_round;

pub use attach_channel::AttachChannelUseCase;
pub use broadcast::BroadcastHub;
pub use create_room::CreateRoomUseCase;
pub use detach_channel::{DetachChannelUseCase, DetachOutcome};
pub use error::{
    AttachError, CreateRoomError, HubError, JoinRoomError, QuitRoomError, StartRoundError,
};
pub use join_room::{JoinRoomUseCase, Membership};
pub use quit_room::QuitRoomUseCase;
pub use room_query::{RoomQueryUseCase, RoomSnapshot};
pub use start_round::StartRoundUseCase;

//! UseCase: ルーム作成

use std::sync::Arc;

use sketchroom_shared::time::get_jst_timestamp;

use crate::domain::{DisplayName, Room, RoomIdFactory, RoomRepository, Timestamp};

use super::error::CreateRoomError;

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl CreateRoomUseCase {
    /// 新しい CreateRoomUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ルーム作成を実行
    ///
    /// 新しい ID で空のルームを登録する。
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<Room>)` - 登録したルーム
    /// * `Err(CreateRoomError)` - ルーム名が空、または長すぎる
    pub async fn execute(&self, room_name: String) -> Result<Arc<Room>, CreateRoomError> {
        let name = DisplayName::new(room_name)?;
        let room = Room::new(
            RoomIdFactory::generate(),
            name,
            Timestamp::new(get_jst_timestamp()),
        );
        let room = self.repository.insert_room(room).await?;
        tracing::info!("Room '{}' ({}) created", room.name, room.id);
        Ok(room)
    }
}

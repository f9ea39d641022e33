//! UseCase: ルーム参加
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - ユーザー ID の採番とターン順の割り当て
//!
//! ### なぜこのテストが必要か
//! - 参加順がそのまま描き手の順番になる
//! - 閉じられたルームや存在しないルームへの参加を拒否することを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加順にターン順 0, 1, ... が振られる
//! - 異常系：存在しないルーム、空のユーザー名
//! - エッジケース：最後のメンバーが抜けた直後のルームへの参加

use std::sync::Arc;

use sketchroom_shared::time::get_jst_timestamp;

use crate::domain::{
    DisplayName, RoomError, RoomId, RoomRepository, Timestamp, UserEntry, UserId, UserIdFactory,
};

use super::error::JoinRoomError;

/// 参加・退出の結果として返すメンバー情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub room_id: RoomId,
    pub room_name: String,
    pub user_id: UserId,
    pub user_name: String,
    pub role: String,
    pub turn_order: usize,
}

impl Membership {
    pub(crate) fn from_entry(entry: &UserEntry, room_name: &str) -> Self {
        Self {
            room_id: entry.room_id.clone(),
            room_name: room_name.to_string(),
            user_id: entry.user_id.clone(),
            user_name: entry.user_name.as_str().to_string(),
            role: entry.role.clone(),
            turn_order: entry.turn_order,
        }
    }
}

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ルーム参加を実行
    ///
    /// 新しいユーザー ID でターン順の末尾に追加する。
    /// 接続は後から WebSocket エンドポイントでアタッチされる。
    ///
    /// # Returns
    ///
    /// * `Ok(Membership)` - 参加したメンバー
    /// * `Err(JoinRoomError)` - ルームが存在しない・閉じている、またはユーザー名が不正
    pub async fn execute(
        &self,
        room_id: &RoomId,
        user_name: String,
        role: String,
    ) -> Result<Membership, JoinRoomError> {
        let user_name = DisplayName::new(user_name)?;
        let room = self.repository.get_room(room_id).await?;

        let mut entry = UserEntry::new(
            room.id.clone(),
            UserIdFactory::generate(),
            user_name,
            role,
            Timestamp::new(get_jst_timestamp()),
        );

        let mut state = room.write().await;
        entry.turn_order = state.join(entry.clone()).map_err(|e| match e {
            RoomError::DuplicateUser(id) => JoinRoomError::DuplicateUser(id),
            _ => JoinRoomError::RoomNotFound(room_id.as_str().to_string()),
        })?;
        drop(state);

        tracing::info!(
            "User '{}' ({}) joined room '{}' with turn order {}",
            entry.user_name,
            entry.user_id,
            room.id,
            entry.turn_order
        );
        Ok(Membership::from_entry(&entry, room.name.as_str()))
    }
}

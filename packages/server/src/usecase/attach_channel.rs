//! UseCase: WebSocket 接続のアタッチ
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - AttachChannelUseCase::ensure_member() と execute()
//!
//! ### なぜこのテストが必要か
//! - 存在しないルーム・ユーザーへの接続は upgrade 前に拒否する
//! - ルーム接続のアタッチで他のメンバーに join が届くことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：ルーム接続のアタッチと join 通知
//! - 異常系：存在しないルーム、存在しないユーザー
//! - エッジケース：再接続で古い接続が置き換えられ、クローズされる

use std::sync::Arc;

use crate::{
    domain::{ChannelKind, ConnectionChannel, RoomId, RoomRepository, UserId},
    infrastructure::dto::websocket::MessageType,
};

use super::{broadcast::BroadcastHub, error::AttachError};

/// WebSocket 接続アタッチのユースケース
pub struct AttachChannelUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl AttachChannelUseCase {
    /// 新しい AttachChannelUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// upgrade 前にルームとメンバーの存在を確認
    pub async fn ensure_member(&self, room_id: &RoomId, user_id: &UserId) -> Result<(), AttachError> {
        let room = self.repository.get_room(room_id).await?;
        if room.read().await.members.lookup(user_id).is_none() {
            return Err(AttachError::UserNotFound(user_id.as_str().to_string()));
        }
        Ok(())
    }

    /// 接続をメンバーの種別ごとのスロットにアタッチ
    ///
    /// スロットに既存の接続があれば置き換えてクローズする。
    /// ルーム接続の場合は他のメンバーに `join` を通知する。
    ///
    /// # Returns
    ///
    /// * `Ok(())` - アタッチ成功
    /// * `Err(AttachError)` - ルームまたはメンバーが存在しない
    pub async fn execute(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        channel: ConnectionChannel,
    ) -> Result<(), AttachError> {
        let room = self.repository.get_room(room_id).await?;
        let kind = channel.kind();
        let connection_id = channel.id();

        let mut state = room.write().await;
        let member = state
            .members
            .lookup_mut(user_id)
            .ok_or_else(|| AttachError::UserNotFound(user_id.as_str().to_string()))?;
        if let Some(replaced) = member.attach(channel) {
            tracing::info!(
                "Replacing {} connection {} of '{}'",
                kind,
                replaced.id(),
                user_id
            );
            replaced.close();
        }

        if kind == ChannelKind::Room {
            if let Some(member) = state.members.lookup(user_id) {
                BroadcastHub::announce(&state.members, member, MessageType::Join);
            }
        }
        drop(state);

        tracing::info!(
            "Attached {} connection {} of '{}' in room '{}'",
            kind,
            connection_id,
            user_id,
            room_id
        );
        Ok(())
    }
}

//! UseCase: WebSocket 接続のデタッチ
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DetachChannelUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - ルーム接続の切断はメンバーの離脱として扱われる
//! - 描画接続の切断はスロットを空けるだけでメンバーは残る
//! - 再接続で置き換えられた古い接続の後片付けが新しい接続を消さないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：描画接続の切断、ルーム接続の切断による離脱
//! - エッジケース：最後のメンバーの切断でルーム削除、置き換え済みの古い接続の切断

use std::sync::Arc;

use crate::domain::{ChannelKind, ConnectionId, RoomId, RoomRepository, UserId};

use super::quit_room::depart;

/// デタッチの結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetachOutcome {
    /// スロットが別の接続に置き換わっている、またはメンバーがすでにいない
    Stale,
    /// 描画接続のスロットを空けた（メンバーは残る）
    SlotCleared,
    /// ルーム接続が切れてメンバーが離脱した
    MemberLeft { room_removed: bool },
}

/// WebSocket 接続デタッチのユースケース
pub struct DetachChannelUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl DetachChannelUseCase {
    /// 新しい DetachChannelUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 閉じた接続をメンバーのスロットから外す
    ///
    /// ルーム接続の切断は明示的な退出と同じ離脱処理を行い、
    /// メンバーがいなくなったルームは削除する。
    pub async fn execute(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
        kind: ChannelKind,
        connection_id: ConnectionId,
    ) -> DetachOutcome {
        let Ok(room) = self.repository.get_room(room_id).await else {
            return DetachOutcome::Stale;
        };

        let mut state = room.write().await;
        let Some(member) = state.members.lookup_mut(user_id) else {
            return DetachOutcome::Stale;
        };
        if !member.detach(kind, connection_id) {
            tracing::debug!(
                "Stale {} connection {} of '{}' detached; slot left as is",
                kind,
                connection_id,
                user_id
            );
            return DetachOutcome::Stale;
        }
        tracing::info!(
            "Detached {} connection {} of '{}' in room '{}'",
            kind,
            connection_id,
            user_id,
            room_id
        );

        if kind == ChannelKind::Draw {
            return DetachOutcome::SlotCleared;
        }

        if let Err(e) = depart(&mut state, user_id) {
            tracing::warn!("Failed to remove '{}' from '{}': {}", user_id, room_id, e);
            return DetachOutcome::Stale;
        }
        let emptied = state.members.is_empty();
        drop(state);

        let room_removed = emptied && self.repository.remove_room_if_empty(room_id).await;
        if room_removed {
            tracing::info!("Room '{}' removed after its last member left", room_id);
        }
        DetachOutcome::MemberLeft { room_removed }
    }
}

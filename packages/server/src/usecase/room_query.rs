//! UseCase: ルーム情報の参照

use std::sync::Arc;

use crate::domain::{DisplayName, Room, RoomId, RoomRepository, RoundDetail, Timestamp, UserEntry};

/// ルームとメンバーのある時点でのコピー
#[derive(Debug, Clone)]
pub struct RoomSnapshot {
    pub id: RoomId,
    pub name: DisplayName,
    pub created_at: Timestamp,
    /// 参加順のメンバー
    pub members: Vec<UserEntry>,
}

impl RoomSnapshot {
    async fn capture(room: &Room) -> Self {
        let members = room.read().await.members.iter().cloned().collect();
        Self {
            id: room.id.clone(),
            name: room.name.clone(),
            created_at: room.created_at,
            members,
        }
    }
}

/// ルーム情報参照のユースケース
pub struct RoomQueryUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl RoomQueryUseCase {
    /// 新しい RoomQueryUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 進行中のラウンドを取得（ルームがない、メンバーがいない、未開始なら None）
    pub async fn current_round(&self, room_id: &RoomId) -> Option<RoundDetail> {
        let room = self.repository.get_room(room_id).await.ok()?;
        let state = room.read().await;
        if state.members.is_empty() {
            return None;
        }
        state.round.clone()
    }

    /// 全ルームを作成順に取得
    pub async fn list_rooms(&self) -> Vec<RoomSnapshot> {
        let mut snapshots = Vec::new();
        for room in self.repository.list_rooms().await {
            snapshots.push(RoomSnapshot::capture(&room).await);
        }
        snapshots
    }

    /// ルームとメンバー一覧を取得
    pub async fn room_members(&self, room_id: &RoomId) -> Option<RoomSnapshot> {
        let room = self.repository.get_room(room_id).await.ok()?;
        Some(RoomSnapshot::capture(&room).await)
    }
}

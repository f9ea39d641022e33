//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ## ロック順序
//!
//! レジストリのロック → ルームのロック の順でのみ取得します。
//! ルームのロックを保持したままレジストリのロックを取ることはありません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{RepositoryError, Room, RoomId, RoomRepository};

/// インメモリ Room Repository 実装
///
/// ルームごとのロックは `Room` 自身が持つため、あるルームの更新が
/// 他のルームの操作をブロックすることはありません。
#[derive(Default)]
pub struct InMemoryRoomRepository {
    rooms: RwLock<HashMap<RoomId, Arc<Room>>>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn insert_room(&self, room: Room) -> Result<Arc<Room>, RepositoryError> {
        let mut rooms = self.rooms.write().await;
        if rooms.contains_key(&room.id) {
            return Err(RepositoryError::RoomAlreadyExists(room.id.into_string()));
        }
        let room = Arc::new(room);
        rooms.insert(room.id.clone(), Arc::clone(&room));
        Ok(room)
    }

    async fn get_room(&self, room_id: &RoomId) -> Result<Arc<Room>, RepositoryError> {
        let rooms = self.rooms.read().await;
        rooms
            .get(room_id)
            .cloned()
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.as_str().to_string()))
    }

    async fn remove_room(&self, room_id: &RoomId) -> Option<Arc<Room>> {
        let mut rooms = self.rooms.write().await;
        rooms.remove(room_id)
    }

    async fn remove_room_if_empty(&self, room_id: &RoomId) -> bool {
        let mut rooms = self.rooms.write().await;
        let Some(room) = rooms.get(room_id) else {
            return false;
        };
        if room.read().await.members.is_empty() {
            rooms.remove(room_id);
            true
        } else {
            false
        }
    }

    async fn list_rooms(&self) -> Vec<Arc<Room>> {
        let rooms = self.rooms.read().await;
        let mut list: Vec<Arc<Room>> = rooms.values().cloned().collect();
        list.sort_by_key(|room| room.created_at);
        list
    }

    async fn count_rooms(&self) -> usize {
        let rooms = self.rooms.read().await;
        rooms.len()
    }
}

//! UseCase: ルーム退出
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - QuitRoomUseCase::execute() と depart()
//! - 退出時のターン順の詰め直し、quit 通知、接続のクローズ、空ルームの削除
//!
//! ### なぜこのテストが必要か
//! - 明示的な退出とルーム接続の切断は同じ離脱処理を通る
//! - 最後のメンバーが抜けたルームがレジストリに残らないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：退出したメンバー以外に quit が届き、本人の接続にはクローズフレームが届く
//! - 異常系：存在しないルーム、存在しないメンバー
//! - エッジケース：最後のメンバーの退出でルームが削除される

use std::sync::Arc;

use crate::{
    domain::{RoomError, RoomId, RoomRepository, RoomState, UserEntry, UserId},
    infrastructure::dto::websocket::MessageType,
};

use super::{broadcast::BroadcastHub, error::QuitRoomError, join_room::Membership};

/// ロック済みのルーム状態からメンバーを離脱させる
///
/// ルーム接続のある残りのメンバーに `quit` を通知し、
/// 離脱したメンバー自身の接続をクローズする。
pub(crate) fn depart(state: &mut RoomState, user_id: &UserId) -> Result<UserEntry, RoomError> {
    let departed = state.leave(user_id)?;
    BroadcastHub::announce(&state.members, &departed, MessageType::Quit);
    departed.close_connections();
    Ok(departed)
}

/// ルーム退出のユースケース
pub struct QuitRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl QuitRoomUseCase {
    /// 新しい QuitRoomUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ルーム退出を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Membership)` - 退出したメンバー
    /// * `Err(QuitRoomError)` - ルームまたはメンバーが存在しない
    pub async fn execute(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<Membership, QuitRoomError> {
        let room = self.repository.get_room(room_id).await?;

        let mut state = room.write().await;
        let departed = depart(&mut state, user_id)
            .map_err(|_| QuitRoomError::UserNotFound(user_id.as_str().to_string()))?;
        let emptied = state.members.is_empty();
        drop(state);

        tracing::info!("User '{}' quit room '{}'", departed.user_id, room.id);
        if emptied && self.repository.remove_room_if_empty(room_id).await {
            tracing::info!("Room '{}' removed after its last member left", room.id);
        }

        Ok(Membership::from_entry(&departed, room.name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            ChannelKind, ConnectionChannel, DisplayName, Frame, Room, RoomIdFactory, Timestamp,
        },
        infrastructure::{dto::websocket::RoomMessage, repository::InMemoryRoomRepository},
        usecase::JoinRoomUseCase,
    };

    async fn setup() -> (Arc<InMemoryRoomRepository>, Arc<Room>) {
        let repository = Arc::new(InMemoryRoomRepository::new());
        let room = repository
            .insert_room(Room::new(
                RoomIdFactory::generate(),
                DisplayName::new("Trivia".to_string()).unwrap(),
                Timestamp::new(0),
            ))
            .await
            .unwrap();
        (repository, room)
    }

    async fn join(repository: &Arc<InMemoryRoomRepository>, room: &Room, name: &str) -> UserId {
        JoinRoomUseCase::new(repository.clone())
            .execute(&room.id, name.to_string(), "player".to_string())
            .await
            .unwrap()
            .user_id
    }

    #[tokio::test]
    async fn test_quit_notifies_others_and_closes_own_connections() {
        // テスト項目: 退出すると他のメンバーに quit が届き、本人の接続にはクローズフレームが届く
        // given (前提条件):
        let (repository, room) = setup().await;
        let alice = join(&repository, &room, "Alice").await;
        let bob = join(&repository, &room, "Bob").await;
        let (alice_room, mut alice_outbox) = ConnectionChannel::open(ChannelKind::Room);
        let (bob_draw, mut bob_draw_outbox) = ConnectionChannel::open(ChannelKind::Draw);
        {
            let mut state = room.write().await;
            state.members.lookup_mut(&alice).unwrap().attach(alice_room);
            state.members.lookup_mut(&bob).unwrap().attach(bob_draw);
        }
        let usecase = QuitRoomUseCase::new(repository.clone());

        // when (操作):
        let departed = usecase.execute(&room.id, &bob).await.unwrap();

        // then (期待する結果):
        assert_eq!(departed.user_id, bob);
        assert_eq!(departed.user_name, "Bob");
        assert_eq!(room.size().await, 1);

        let Some(Frame::Text(text)) = alice_outbox.try_next_frame() else {
            panic!("alice should receive a quit frame");
        };
        let quit: RoomMessage = serde_json::from_str(&text).unwrap();
        assert_eq!(quit.r#type, "quit");
        assert_eq!(quit.user_id, bob.as_str());
        assert_eq!(quit.result, Some(false));

        assert_eq!(bob_draw_outbox.try_next_frame(), Some(Frame::Close));
    }

    #[tokio::test]
    async fn test_quit_last_member_removes_room() {
        // テスト項目: 最後のメンバーが退出するとルームがレジストリから削除される
        // given (前提条件):
        let (repository, room) = setup().await;
        let alice = join(&repository, &room, "Alice").await;
        let usecase = QuitRoomUseCase::new(repository.clone());

        // when (操作):
        usecase.execute(&room.id, &alice).await.unwrap();

        // then (期待する結果):
        assert_eq!(repository.count_rooms().await, 0);
        assert!(repository.get_room(&room.id).await.is_err());
    }

    #[tokio::test]
    async fn test_quit_compacts_turn_orders() {
        // テスト項目: 先頭のメンバーが退出すると残りのターン順が詰められる
        // given (前提条件):
        let (repository, room) = setup().await;
        let alice = join(&repository, &room, "Alice").await;
        let bob = join(&repository, &room, "Bob").await;
        let carol = join(&repository, &room, "Carol").await;
        let usecase = QuitRoomUseCase::new(repository.clone());

        // when (操作):
        usecase.execute(&room.id, &alice).await.unwrap();

        // then (期待する結果):
        assert_eq!(room.lookup(&bob).await.unwrap().turn_order, 0);
        assert_eq!(room.lookup(&carol).await.unwrap().turn_order, 1);
    }

    #[tokio::test]
    async fn test_quit_unknown_member_fails() {
        // テスト項目: メンバーでないユーザーの退出は UserNotFound になり、ルームは残る
        // given (前提条件):
        let (repository, room) = setup().await;
        join(&repository, &room, "Alice").await;
        let usecase = QuitRoomUseCase::new(repository.clone());
        let stranger = UserId::new("stranger".to_string()).unwrap();

        // when (操作):
        let result = usecase.execute(&room.id, &stranger).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(QuitRoomError::UserNotFound("stranger".to_string()))
        );
        assert_eq!(room.size().await, 1);
    }

    #[tokio::test]
    async fn test_quit_unknown_room_fails() {
        // テスト項目: 存在しないルームからの退出は RoomNotFound になる
        // given (前提条件):
        let (repository, _room) = setup().await;
        let usecase = QuitRoomUseCase::new(repository.clone());

        // when (操作):
        let result = usecase
            .execute(
                &RoomId::new("gone".to_string()).unwrap(),
                &UserId::new("alice".to_string()).unwrap(),
            )
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(QuitRoomError::RoomNotFound("gone".to_string())));
    }
}

//! UseCase: フレームのブロードキャスト
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - BroadcastHub::relay_drawing() と BroadcastHub::handle_room_text()
//! - 受信フレームの種類ごとの配信先と result フラグ
//!
//! ### なぜこのテストが必要か
//! - 回答判定（answer）と準備完了（ready）はラウンド進行の中核
//! - 1 人への送信失敗が他の参加者への配信を止めないことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：描画データの中継、回答の正誤判定、全員準備完了で次の描き手へ通知
//! - 異常系：不正な JSON、存在しない送信者
//! - エッジケース：接続していないメンバー、切断済みの接続

use std::sync::Arc;

use crate::{
    domain::{ChannelKind, Frame, RoomId, RoomMemberList, RoomRepository, UserEntry, UserId},
    infrastructure::dto::websocket::{MessageType, RoomMessage},
};

use super::error::HubError;

/// 受信フレームをルームのメンバーへ配信するユースケース
pub struct BroadcastHub {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl BroadcastHub {
    /// 新しい BroadcastHub を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 描画フレームを送信者以外の描画接続へそのまま中継
    ///
    /// 描画接続のないメンバーはスキップする。
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - フレームをキューに積んだ宛先の数
    /// * `Err(HubError::RoomNotFound)` - ルームが存在しない
    pub async fn relay_drawing(
        &self,
        room_id: &RoomId,
        sender_id: &UserId,
        frame: Frame,
    ) -> Result<usize, HubError> {
        let room = self.repository.get_room(room_id).await?;
        let state = room.read().await;

        let mut delivered = 0;
        state.members.for_each(|member| {
            if &member.user_id != sender_id && deliver(member, ChannelKind::Draw, frame.clone()) {
                delivered += 1;
            }
        });
        tracing::debug!(
            "Relayed drawing frame from '{}' to {} member(s)",
            sender_id,
            delivered
        );
        Ok(delivered)
    }

    /// ルーム接続の受信フレームを解釈して配信
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - キューに積んだフレームの数
    /// * `Err(HubError)` - 送信者の受信ループを終了すべきエラー
    pub async fn handle_room_text(
        &self,
        room_id: &RoomId,
        sender_id: &UserId,
        text: &str,
    ) -> Result<usize, HubError> {
        let mut message: RoomMessage =
            serde_json::from_str(text).map_err(|e| HubError::MalformedFrame(e.to_string()))?;
        let room = self.repository.get_room(room_id).await?;

        match message.message_type() {
            MessageType::Answer => {
                let state = room.read().await;
                let sender = lookup_sender(&state.members, sender_id)?;
                stamp_sender(&mut message, sender);
                let correct = state
                    .round
                    .as_ref()
                    .is_some_and(|round| !round.topic.is_empty() && round.topic == message.message);
                message.result = Some(correct);
                tracing::info!("Answer from '{}' judged {}", sender_id, correct);
                Ok(broadcast(&state.members, &message, None))
            }
            MessageType::Ready => {
                let mut state = room.write().await;
                state
                    .members
                    .lookup_mut(sender_id)
                    .ok_or_else(|| HubError::SenderNotFound(sender_id.as_str().to_string()))?
                    .mark_ready();

                if !state.members.all_ready() {
                    return Ok(0);
                }

                state.members.for_each_mut(UserEntry::clear_ready);
                let Some(target) = state
                    .next_drawer()
                    .and_then(|user_id| UserId::new(user_id.to_string()).ok())
                    .and_then(|user_id| state.members.lookup(&user_id))
                else {
                    tracing::info!("All members ready in '{}' but no next drawer is set", room_id);
                    return Ok(0);
                };

                let mut notice = RoomMessage {
                    r#type: MessageType::NextDraw.as_tag().to_string(),
                    result: Some(true),
                    ..Default::default()
                };
                stamp_sender(&mut notice, target);
                tracing::info!("All members ready; notifying next drawer '{}'", target.user_id);
                Ok(usize::from(send_message(target, &notice)))
            }
            tag if tag.is_server_only() => {
                tracing::warn!(
                    "Ignoring server-only message type '{}' from '{}'",
                    tag.as_tag(),
                    sender_id
                );
                Ok(0)
            }
            _ => {
                let state = room.read().await;
                let sender = lookup_sender(&state.members, sender_id)?;
                stamp_sender(&mut message, sender);
                message.result = Some(true);
                Ok(broadcast(&state.members, &message, None))
            }
        }
    }

    /// `subject` の参加・退出をルーム接続のある他のメンバーへ通知
    ///
    /// 呼び出し側がルームのロックを保持していること。
    pub fn announce(members: &RoomMemberList, subject: &UserEntry, action: MessageType) -> usize {
        let mut message = RoomMessage {
            r#type: action.as_tag().to_string(),
            result: Some(false),
            ..Default::default()
        };
        stamp_sender(&mut message, subject);
        let delivered = broadcast(members, &message, Some(&subject.user_id));
        tracing::info!(
            "Announced '{}' of '{}' to {} member(s)",
            action.as_tag(),
            subject.user_id,
            delivered
        );
        delivered
    }
}

fn lookup_sender<'a>(
    members: &'a RoomMemberList,
    sender_id: &UserId,
) -> Result<&'a UserEntry, HubError> {
    members
        .lookup(sender_id)
        .ok_or_else(|| HubError::SenderNotFound(sender_id.as_str().to_string()))
}

/// 送信者の識別情報はクライアントの値ではなくメンバー情報から設定する
fn stamp_sender(message: &mut RoomMessage, member: &UserEntry) {
    message.user_id = member.user_id.as_str().to_string();
    message.user_name = member.user_name.as_str().to_string();
    message.room_id = member.room_id.as_str().to_string();
}

/// ルーム接続のある全メンバーへ送信（`exclude` のメンバーは除く）
fn broadcast(members: &RoomMemberList, message: &RoomMessage, exclude: Option<&UserId>) -> usize {
    let Some(text) = encode(message) else {
        return 0;
    };
    let mut delivered = 0;
    members.for_each(|member| {
        if Some(&member.user_id) != exclude
            && deliver(member, ChannelKind::Room, Frame::Text(text.clone()))
        {
            delivered += 1;
        }
    });
    delivered
}

fn send_message(member: &UserEntry, message: &RoomMessage) -> bool {
    encode(message).is_some_and(|text| deliver(member, ChannelKind::Room, Frame::Text(text)))
}

fn encode(message: &RoomMessage) -> Option<String> {
    match serde_json::to_string(message) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::error!("Failed to encode room message: {}", e);
            None
        }
    }
}

/// 1 人のメンバーの接続にフレームを積む
///
/// 失敗はそのメンバーだけに留め、ログに残す
fn deliver(member: &UserEntry, kind: ChannelKind, frame: Frame) -> bool {
    let Some(channel) = member.connection(kind) else {
        return false;
    };
    match channel.send(frame) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(
                "Failed to send to '{}' on {} channel: {}",
                member.user_id,
                kind,
                e
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            ConnectionChannel, DisplayName, Outbox, ReadyFlag, Room, RoomIdFactory, Timestamp,
            UserIdFactory,
        },
        infrastructure::repository::InMemoryRoomRepository,
    };

    struct Member {
        id: UserId,
        room_outbox: Option<Outbox>,
        draw_outbox: Option<Outbox>,
    }

    async fn setup(
        names: &[&str],
        attach_room: bool,
        attach_draw: bool,
    ) -> (BroadcastHub, Arc<Room>, Vec<Member>) {
        let repository = Arc::new(InMemoryRoomRepository::new());
        let room = repository
            .insert_room(Room::new(
                RoomIdFactory::generate(),
                DisplayName::new("Trivia".to_string()).unwrap(),
                Timestamp::new(0),
            ))
            .await
            .unwrap();

        let mut members = Vec::new();
        let mut state = room.write().await;
        for name in names {
            let id = UserIdFactory::generate();
            let mut entry = UserEntry::new(
                room.id.clone(),
                id.clone(),
                DisplayName::new(name.to_string()).unwrap(),
                "player".to_string(),
                Timestamp::new(0),
            );
            let room_outbox = attach_room.then(|| {
                let (channel, outbox) = ConnectionChannel::open(ChannelKind::Room);
                entry.attach(channel);
                outbox
            });
            let draw_outbox = attach_draw.then(|| {
                let (channel, outbox) = ConnectionChannel::open(ChannelKind::Draw);
                entry.attach(channel);
                outbox
            });
            state.join(entry).unwrap();
            members.push(Member {
                id,
                room_outbox,
                draw_outbox,
            });
        }
        drop(state);

        (BroadcastHub::new(repository), room, members)
    }

    fn drain(outbox: &mut Outbox) -> Vec<Frame> {
        std::iter::from_fn(|| outbox.try_next_frame()).collect()
    }

    fn drain_messages(outbox: &mut Outbox) -> Vec<RoomMessage> {
        drain(outbox)
            .into_iter()
            .map(|frame| match frame {
                Frame::Text(text) => serde_json::from_str(&text).unwrap(),
                other => panic!("unexpected frame: {other:?}"),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_relay_drawing_skips_sender_and_detached() {
        // テスト項目: 描画フレームは送信者以外の描画接続にだけ届く
        // given (前提条件):
        let (hub, room, mut members) = setup(&["a", "b", "c"], false, true).await;
        {
            let mut state = room.write().await;
            let c = state.members.lookup_mut(&members[2].id).unwrap();
            let conn_id = c.connection(ChannelKind::Draw).unwrap().id();
            c.detach(ChannelKind::Draw, conn_id);
        }

        // when (操作):
        let delivered = hub
            .relay_drawing(&room.id, &members[0].id, Frame::Binary(vec![7, 7]))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(delivered, 1);
        assert!(drain(members[0].draw_outbox.as_mut().unwrap()).is_empty());
        assert_eq!(
            drain(members[1].draw_outbox.as_mut().unwrap()),
            vec![Frame::Binary(vec![7, 7])]
        );
    }

    #[tokio::test]
    async fn test_relay_drawing_preserves_order() {
        // テスト項目: 同じ送信者の描画フレームは到着順に届く
        // given (前提条件):
        let (hub, room, mut members) = setup(&["a", "b"], false, true).await;

        // when (操作):
        for i in 0..5 {
            hub.relay_drawing(&room.id, &members[0].id, Frame::Text(i.to_string()))
                .await
                .unwrap();
        }

        // then (期待する結果):
        let expected: Vec<Frame> = (0..5).map(|i| Frame::Text(i.to_string())).collect();
        assert_eq!(drain(members[1].draw_outbox.as_mut().unwrap()), expected);
    }

    #[tokio::test]
    async fn test_broken_recipient_does_not_stop_broadcast() {
        // テスト項目: 1 人への送信失敗があっても残りのメンバーには届く
        // given (前提条件):
        let (hub, room, mut members) = setup(&["a", "b", "c"], false, true).await;
        drop(members[1].draw_outbox.take());

        // when (操作):
        let delivered = hub
            .relay_drawing(&room.id, &members[0].id, Frame::Text("stroke".into()))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(delivered, 1);
        assert_eq!(
            drain(members[2].draw_outbox.as_mut().unwrap()),
            vec![Frame::Text("stroke".into())]
        );
    }

    #[tokio::test]
    async fn test_answer_is_judged_against_topic() {
        // テスト項目: 正解は result:true、不正解は result:false で全員に配信される
        // given (前提条件):
        let (hub, room, mut members) = setup(&["a", "b", "c"], true, false).await;
        room.write()
            .await
            .start_round("fruit".to_string(), "banana".to_string())
            .unwrap();

        // when (操作):
        hub.handle_room_text(&room.id, &members[1].id, r#"{"type":"answer","message":"banana"}"#)
            .await
            .unwrap();
        hub.handle_room_text(&room.id, &members[2].id, r#"{"type":"answer","message":"apple"}"#)
            .await
            .unwrap();

        // then (期待する結果):
        let guesser = members[1].id.as_str().to_string();
        for member in members.iter_mut() {
            let received = drain_messages(member.room_outbox.as_mut().unwrap());
            assert_eq!(received.len(), 2);
            assert_eq!(received[0].result, Some(true));
            assert_eq!(received[0].user_id, guesser);
            assert_eq!(received[1].result, Some(false));
            assert_eq!(received[1].message, "apple");
        }
    }

    #[tokio::test]
    async fn test_answer_is_case_sensitive() {
        // テスト項目: 回答の判定は大文字小文字を区別する
        // given (前提条件):
        let (hub, room, mut members) = setup(&["a"], true, false).await;
        room.write()
            .await
            .start_round("fruit".to_string(), "banana".to_string())
            .unwrap();

        // when (操作):
        hub.handle_room_text(&room.id, &members[0].id, r#"{"type":"answer","message":"Banana"}"#)
            .await
            .unwrap();

        // then (期待する結果):
        let received = drain_messages(members[0].room_outbox.as_mut().unwrap());
        assert_eq!(received[0].result, Some(false));
    }

    #[tokio::test]
    async fn test_answer_without_round_is_wrong() {
        // テスト項目: ラウンド開始前の回答は常に不正解になる
        // given (前提条件):
        let (hub, room, mut members) = setup(&["a"], true, false).await;

        // when (操作):
        hub.handle_room_text(&room.id, &members[0].id, r#"{"type":"answer","message":""}"#)
            .await
            .unwrap();

        // then (期待する結果):
        let received = drain_messages(members[0].room_outbox.as_mut().unwrap());
        assert_eq!(received[0].result, Some(false));
    }

    #[tokio::test]
    async fn test_all_ready_notifies_only_next_drawer() {
        // テスト項目: 3 人全員が ready を送ると次の描き手だけに nextDraw が届き、フラグはリセットされる
        // given (前提条件):
        let (hub, room, mut members) = setup(&["a", "b", "c"], true, false).await;
        let round = room
            .write()
            .await
            .start_round("fruit".to_string(), "banana".to_string())
            .unwrap()
            .clone();
        assert_eq!(round.next_draw_user_id, members[1].id.as_str());

        // when (操作):
        let mut delivered = Vec::new();
        for member in &members {
            delivered.push(
                hub.handle_room_text(&room.id, &member.id, r#"{"type":"ready"}"#)
                    .await
                    .unwrap(),
            );
        }

        // then (期待する結果):
        assert_eq!(delivered, vec![0, 0, 1]);
        let state = room.read().await;
        state
            .members
            .for_each(|m| assert_eq!(m.ready, ReadyFlag::NotReady));
        drop(state);

        assert!(drain(members[0].room_outbox.as_mut().unwrap()).is_empty());
        assert!(drain(members[2].room_outbox.as_mut().unwrap()).is_empty());
        let notice = drain_messages(members[1].room_outbox.as_mut().unwrap());
        assert_eq!(notice.len(), 1);
        assert_eq!(notice[0].r#type, "nextDraw");
        assert_eq!(notice[0].user_id, members[1].id.as_str());
        assert_eq!(notice[0].result, Some(true));
    }

    #[tokio::test]
    async fn test_all_ready_without_round_notifies_nobody() {
        // テスト項目: ラウンド開始前に全員が ready を送ってもフラグがリセットされるだけで誰にも通知されない
        // given (前提条件):
        let (hub, room, mut members) = setup(&["a", "b", "c"], true, false).await;

        // when (操作):
        let mut delivered = Vec::new();
        for member in &members {
            delivered.push(
                hub.handle_room_text(&room.id, &member.id, r#"{"type":"ready"}"#)
                    .await
                    .unwrap(),
            );
        }

        // then (期待する結果):
        assert_eq!(delivered, vec![0, 0, 0]);
        let state = room.read().await;
        assert!(state.round.is_none());
        state
            .members
            .for_each(|m| assert_eq!(m.ready, ReadyFlag::NotReady));
        drop(state);

        for member in members.iter_mut() {
            assert!(drain(member.room_outbox.as_mut().unwrap()).is_empty());
        }
    }

    #[tokio::test]
    async fn test_start_draw_is_relayed_with_result() {
        // テスト項目: startDraw は result:true を付けて全員に中継され、ラウンドは変化しない
        // given (前提条件):
        let (hub, room, mut members) = setup(&["a", "b"], true, false).await;

        // when (操作):
        let delivered = hub
            .handle_room_text(&room.id, &members[0].id, r#"{"type":"startDraw","message":"go"}"#)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(delivered, 2);
        assert!(room.read().await.round.is_none());
        let received = drain_messages(members[1].room_outbox.as_mut().unwrap());
        assert_eq!(received[0].r#type, "startDraw");
        assert_eq!(received[0].message, "go");
        assert_eq!(received[0].user_id, members[0].id.as_str());
        assert_eq!(received[0].result, Some(true));
    }

    #[tokio::test]
    async fn test_sender_identity_is_stamped() {
        // テスト項目: クライアントが送った userId は接続中のメンバーの ID で上書きされる
        // given (前提条件):
        let (hub, room, mut members) = setup(&["a", "b"], true, false).await;

        // when (操作):
        hub.handle_room_text(
            &room.id,
            &members[0].id,
            r#"{"type":"chat","userId":"someone-else","message":"hi"}"#,
        )
        .await
        .unwrap();

        // then (期待する結果):
        let received = drain_messages(members[1].room_outbox.as_mut().unwrap());
        assert_eq!(received[0].user_id, members[0].id.as_str());
        assert_eq!(received[0].user_name, "a");
        assert_eq!(received[0].room_id, room.id.as_str());
    }

    #[tokio::test]
    async fn test_server_only_types_are_ignored() {
        // テスト項目: クライアントからの nextDraw などサーバー専用タイプは配信されない
        // given (前提条件):
        let (hub, room, mut members) = setup(&["a", "b"], true, false).await;

        // when (操作):
        let delivered = hub
            .handle_room_text(&room.id, &members[0].id, r#"{"type":"nextDraw"}"#)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(delivered, 0);
        assert!(drain(members[1].room_outbox.as_mut().unwrap()).is_empty());
    }

    #[tokio::test]
    async fn test_malformed_frame_is_rejected() {
        // テスト項目: JSON として解析できないフレームは MalformedFrame になる
        // given (前提条件):
        let (hub, room, members) = setup(&["a"], true, false).await;

        // when (操作):
        let result = hub
            .handle_room_text(&room.id, &members[0].id, "not json")
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(HubError::MalformedFrame(_))));
    }

    #[tokio::test]
    async fn test_unknown_sender_is_rejected() {
        // テスト項目: メンバーでない送信者のフレームは SenderNotFound になる
        // given (前提条件):
        let (hub, room, _members) = setup(&["a"], true, false).await;
        let stranger = UserIdFactory::generate();

        // when (操作):
        let result = hub
            .handle_room_text(&room.id, &stranger, r#"{"type":"chat"}"#)
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(HubError::SenderNotFound(stranger.as_str().to_string()))
        );
    }

    #[tokio::test]
    async fn test_announce_excludes_subject() {
        // テスト項目: join 通知は本人以外のルーム接続に届く
        // given (前提条件):
        let (_hub, room, mut members) = setup(&["a", "b"], true, false).await;

        // when (操作):
        let delivered = {
            let state = room.read().await;
            let subject = state.members.lookup(&members[0].id).unwrap();
            BroadcastHub::announce(&state.members, subject, MessageType::Join)
        };

        // then (期待する結果):
        assert_eq!(delivered, 1);
        assert!(drain(members[0].room_outbox.as_mut().unwrap()).is_empty());
        let received = drain_messages(members[1].room_outbox.as_mut().unwrap());
        assert_eq!(received[0].r#type, "join");
        assert_eq!(received[0].user_id, members[0].id.as_str());
        assert_eq!(received[0].result, Some(false));
    }
}

//! UseCase: ラウンド開始
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - StartRoundUseCase::execute() メソッド
//! - お題の選択と描き手の割り当て
//!
//! ### なぜこのテストが必要か
//! - ラウンドを開始するたびに描き手が一巡することを保証
//! - お題のソースをモックに差し替えて、選ばれたお題がそのままラウンドに入ることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：Alice, Bob のルームでラウンド開始
//! - 異常系：存在しないルーム、メンバーのいないルーム
//! - エッジケース：お題カタログが空

use std::sync::Arc;

use crate::domain::{RoomId, RoomRepository, RoundDetail, TopicSource};

use super::error::StartRoundError;

/// ラウンド開始のユースケース
pub struct StartRoundUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    topics: Arc<dyn TopicSource>,
}

impl StartRoundUseCase {
    /// 新しい StartRoundUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>, topics: Arc<dyn TopicSource>) -> Self {
        Self { repository, topics }
    }

    /// ラウンド開始を実行
    ///
    /// お題を選び、描き手を進めて新しいラウンドを設定する。
    /// お題カタログが空でも、カテゴリとお題が空のままラウンドを開始する。
    ///
    /// # Returns
    ///
    /// * `Ok(RoundDetail)` - 設定したラウンド
    /// * `Err(StartRoundError)` - ルームが存在しない、またはメンバーがいない
    pub async fn execute(&self, room_id: &RoomId) -> Result<RoundDetail, StartRoundError> {
        let room = self.repository.get_room(room_id).await?;
        let pick = self.topics.random_topic().unwrap_or_else(|| {
            tracing::warn!("Topic catalog is empty; starting round in '{}' without a topic", room_id);
            Default::default()
        });

        let mut state = room.write().await;
        let round = state
            .start_round(pick.category, pick.topic)
            .map_err(|_| StartRoundError::EmptyRoom)?
            .clone();
        drop(state);

        tracing::info!(
            "Round started in '{}': drawer '{}', next '{}', category '{}'",
            room_id,
            round.current_draw_user_id,
            round.next_draw_user_id,
            round.category
        );
        Ok(round)
    }
}

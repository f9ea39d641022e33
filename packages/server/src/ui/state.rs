//! Server state shared by every handler.

use std::sync::Arc;

use serde::Deserialize;

use crate::domain::{RoomRepository, TopicSource};

/// Query parameters of the WebSocket endpoints
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    #[serde(rename = "userId", default)]
    pub user_id: String,
}

/// Shared application state
pub struct AppState {
    /// Repository（データアクセス層の抽象化）
    pub repository: Arc<dyn RoomRepository>,
    /// Topics for new rounds
    pub topics: Arc<dyn TopicSource>,
}

impl AppState {
    pub fn new(repository: Arc<dyn RoomRepository>, topics: Arc<dyn TopicSource>) -> Self {
        Self { repository, topics }
    }
}

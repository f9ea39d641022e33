//! HTTP API request/response DTOs.
//!
//! Every mutation response carries a `result` flag; when it is `false` the
//! other fields are left empty.

use serde::{Deserialize, Serialize};

use crate::domain::ReadyFlag;

/// Body of `POST /room/create`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    #[serde(default)]
    pub room_name: String,
}

/// Body of `POST /room/join`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomRequest {
    #[serde(default)]
    pub room_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub role: String,
}

/// Query of `/room/quit`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberQuery {
    #[serde(default)]
    pub room_id: String,
    #[serde(default)]
    pub user_id: String,
}

/// Query of `/room/users`, `/room/topic` and `/room/startDraw`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomQuery {
    #[serde(default)]
    pub room_id: String,
}

/// Member as listed in room responses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub room_id: String,
    pub user_id: String,
    pub user_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role: String,
    #[serde(default, skip_serializing_if = "ReadyFlag::is_unset")]
    pub ready: ReadyFlag,
    pub joined_at: String, // ISO 8601
}

/// Room summary (create, list and users endpoints)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDto {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub room_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub room_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<UserDto>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_at: String, // ISO 8601
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<bool>,
}

impl RoomDto {
    pub fn rejected() -> Self {
        Self {
            result: Some(false),
            ..Default::default()
        }
    }
}

/// Response of join and quit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipDto {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub room_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub room_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role: String,
    pub result: bool,
}

impl MembershipDto {
    pub fn rejected() -> Self {
        Self::default()
    }
}

/// Response of start round and round query
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundDetailDto {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub topic: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub current_draw_user_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub next_draw_user_id: String,
    pub result: bool,
}

impl RoundDetailDto {
    pub fn rejected() -> Self {
        Self::default()
    }
}

/// Response of `/topic/random`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RandomTopicDto {
    pub category: String,
    pub topic: String,
}

/// Per-category entry of `/topic/list`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicListDto {
    pub topics: Vec<String>,
}

//! Room channel message DTOs.

use serde::{Deserialize, Serialize};

/// Tag of a room channel message.
///
/// The wire format keeps `type` as a free string so unknown tags survive a
/// relay unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageType {
    /// Guess compared against the secret topic
    Answer,
    Ready,
    StartDraw,
    /// Server-synthesized: a room connection attached
    Join,
    /// Server-synthesized: a member left
    Quit,
    /// Server-synthesized: private notice to the next drawer
    NextDraw,
    Other(String),
}

impl MessageType {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "answer" => MessageType::Answer,
            "ready" => MessageType::Ready,
            "startDraw" => MessageType::StartDraw,
            "join" => MessageType::Join,
            "quit" => MessageType::Quit,
            "nextDraw" => MessageType::NextDraw,
            other => MessageType::Other(other.to_string()),
        }
    }

    pub fn as_tag(&self) -> &str {
        match self {
            MessageType::Answer => "answer",
            MessageType::Ready => "ready",
            MessageType::StartDraw => "startDraw",
            MessageType::Join => "join",
            MessageType::Quit => "quit",
            MessageType::NextDraw => "nextDraw",
            MessageType::Other(tag) => tag,
        }
    }

    /// Tags only the server may emit.
    pub fn is_server_only(&self) -> bool {
        matches!(
            self,
            MessageType::Join | MessageType::Quit | MessageType::NextDraw
        )
    }
}

/// Message exchanged on the room channel.
///
/// Empty strings and an absent `result` are left out of the JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomMessage {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub r#type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub room_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<bool>,
}

impl RoomMessage {
    pub fn message_type(&self) -> MessageType {
        MessageType::from_tag(&self.r#type)
    }
}

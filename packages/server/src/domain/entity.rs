//! Core domain models for the draw-and-guess game.

use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{
    connection::{ChannelKind, ConnectionChannel, ConnectionId},
    error::RoomError,
    member_list::RoomMemberList,
    turn::TurnScheduler,
    value_object::{DisplayName, RoomId, Timestamp, UserId},
};

/// Ready state of a member.
///
/// Serialized as an optional boolean: `Unset` is omitted, the other two
/// become `true` / `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum ReadyFlag {
    #[default]
    Unset,
    Ready,
    NotReady,
}

impl ReadyFlag {
    pub fn is_ready(&self) -> bool {
        matches!(self, ReadyFlag::Ready)
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, ReadyFlag::Unset)
    }
}

impl From<Option<bool>> for ReadyFlag {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => ReadyFlag::Unset,
            Some(true) => ReadyFlag::Ready,
            Some(false) => ReadyFlag::NotReady,
        }
    }
}

impl From<ReadyFlag> for Option<bool> {
    fn from(value: ReadyFlag) -> Self {
        match value {
            ReadyFlag::Unset => None,
            ReadyFlag::Ready => Some(true),
            ReadyFlag::NotReady => Some(false),
        }
    }
}

/// One participant of a room.
///
/// The entry outlives its connections: a dropped draw connection only
/// clears the slot, and a reconnect re-attaches without touching the turn
/// order.
#[derive(Debug, Clone)]
pub struct UserEntry {
    /// Back-reference to the owning room
    pub room_id: RoomId,
    pub user_id: UserId,
    pub user_name: DisplayName,
    /// Free-form role tag (e.g. "player", "spectator")
    pub role: String,
    /// Dense position in the draw rotation, assigned on join
    pub turn_order: usize,
    pub ready: ReadyFlag,
    pub joined_at: Timestamp,
    draw_conn: Option<ConnectionChannel>,
    room_conn: Option<ConnectionChannel>,
}

impl UserEntry {
    /// Create an entry with no connections attached.
    ///
    /// The turn order is assigned by `RoomMemberList::append`.
    pub fn new(
        room_id: RoomId,
        user_id: UserId,
        user_name: DisplayName,
        role: String,
        joined_at: Timestamp,
    ) -> Self {
        Self {
            room_id,
            user_id,
            user_name,
            role,
            turn_order: 0,
            ready: ReadyFlag::Unset,
            joined_at,
            draw_conn: None,
            room_conn: None,
        }
    }

    pub fn connection(&self, kind: ChannelKind) -> Option<&ConnectionChannel> {
        match kind {
            ChannelKind::Draw => self.draw_conn.as_ref(),
            ChannelKind::Room => self.room_conn.as_ref(),
        }
    }

    /// Attach a connection to its slot, returning the one it replaced.
    pub fn attach(&mut self, channel: ConnectionChannel) -> Option<ConnectionChannel> {
        let slot = self.slot_mut(channel.kind());
        slot.replace(channel)
    }

    /// Clear the slot if it still holds the given connection.
    ///
    /// Returns `false` when the slot is empty or was taken over by a newer
    /// connection.
    pub fn detach(&mut self, kind: ChannelKind, connection_id: ConnectionId) -> bool {
        let slot = self.slot_mut(kind);
        if slot.as_ref().is_some_and(|c| c.id() == connection_id) {
            *slot = None;
            true
        } else {
            false
        }
    }

    /// Close every attached connection.
    pub fn close_connections(&self) {
        for channel in [&self.draw_conn, &self.room_conn].into_iter().flatten() {
            channel.close();
        }
    }

    pub fn mark_ready(&mut self) {
        self.ready = ReadyFlag::Ready;
    }

    pub fn clear_ready(&mut self) {
        self.ready = ReadyFlag::NotReady;
    }

    fn slot_mut(&mut self, kind: ChannelKind) -> &mut Option<ConnectionChannel> {
        match kind {
            ChannelKind::Draw => &mut self.draw_conn,
            ChannelKind::Room => &mut self.room_conn,
        }
    }
}

/// State of the active round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundDetail {
    pub category: String,
    /// Secret topic, only ever compared against answers
    pub topic: String,
    /// Empty when no drawer could be resolved
    pub current_draw_user_id: String,
    /// Empty when no drawer could be resolved
    pub next_draw_user_id: String,
}

/// Mutable part of a room, guarded by the room's lock.
#[derive(Debug, Default)]
pub struct RoomState {
    pub members: RoomMemberList,
    pub turn: TurnScheduler,
    pub round: Option<RoundDetail>,
    closed: bool,
}

impl RoomState {
    /// Add a member at the end of the rotation.
    ///
    /// # Errors
    ///
    /// * `RoomError::Closed` - the room already drained its last member
    /// * `RoomError::DuplicateUser` - the user id is taken
    pub fn join(&mut self, entry: UserEntry) -> Result<usize, RoomError> {
        if self.closed {
            return Err(RoomError::Closed);
        }
        self.members.append(entry)
    }

    /// Remove a member, compact the rotation and re-resolve the next drawer.
    ///
    /// When the last member leaves, the room is marked closed so that no
    /// late join can land in it before it is dropped from the registry.
    ///
    /// # Errors
    ///
    /// Returns `RoomError::UserNotFound` if the user is not a member.
    pub fn leave(&mut self, user_id: &UserId) -> Result<UserEntry, RoomError> {
        let departed = self
            .members
            .remove(user_id)
            .ok_or_else(|| RoomError::UserNotFound(user_id.as_str().to_string()))?;

        self.turn.on_member_leave(&mut self.members, departed.turn_order);
        if let Some(round) = self.round.as_mut() {
            round.next_draw_user_id = self.turn.resolve_next(&self.members);
        }
        if self.members.is_empty() {
            self.closed = true;
        }

        Ok(departed)
    }

    /// Advance the rotation and install a new round with the given topic.
    ///
    /// # Errors
    ///
    /// Returns `RoomError::EmptyRoom` when there are no members; the previous
    /// round (if any) is kept.
    pub fn start_round(
        &mut self,
        category: String,
        topic: String,
    ) -> Result<&RoundDetail, RoomError> {
        let assignment = self.turn.start_round(&self.members)?;
        let round = self.round.insert(RoundDetail {
            category,
            topic,
            current_draw_user_id: assignment.current_draw_user_id,
            next_draw_user_id: assignment.next_draw_user_id,
        });
        Ok(round)
    }

    /// Next drawer named by the active round. `None` before the first round
    /// or when the round could not resolve one.
    pub fn next_drawer(&self) -> Option<&str> {
        self.round
            .as_ref()
            .map(|round| round.next_draw_user_id.as_str())
            .filter(|user_id| !user_id.is_empty())
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// One game session.
#[derive(Debug)]
pub struct Room {
    pub id: RoomId,
    pub name: DisplayName,
    pub created_at: Timestamp,
    state: RwLock<RoomState>,
}

impl Room {
    /// Create a new empty room
    pub fn new(id: RoomId, name: DisplayName, created_at: Timestamp) -> Self {
        Self {
            id,
            name,
            created_at,
            state: RwLock::new(RoomState::default()),
        }
    }

    /// Shared access for broadcasts and lookups.
    pub async fn read(&self) -> RwLockReadGuard<'_, RoomState> {
        self.state.read().await
    }

    /// Exclusive access for membership and turn mutation.
    pub async fn write(&self) -> RwLockWriteGuard<'_, RoomState> {
        self.state.write().await
    }

    /// Apply `f` to every member while holding the read lock for the whole
    /// traversal.
    pub async fn for_each_member<F>(&self, f: F)
    where
        F: FnMut(&UserEntry),
    {
        self.read().await.members.for_each(f);
    }

    /// Snapshot of one member.
    pub async fn lookup(&self, user_id: &UserId) -> Option<UserEntry> {
        self.read().await.members.lookup(user_id).cloned()
    }

    pub async fn size(&self) -> usize {
        self.read().await.members.size()
    }
}

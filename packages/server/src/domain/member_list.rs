//! Ordered member container of one room.
//!
//! `RoomMemberList` is a plain insertion-ordered container. It carries no lock
//! of its own: it lives inside `RoomState`, behind the room's `RwLock`, so a
//! traversal through a read guard cannot interleave with a removal.

use super::{RoomError, UserEntry, UserId};

#[derive(Debug, Default)]
pub struct RoomMemberList {
    members: Vec<UserEntry>,
}

impl RoomMemberList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the tail, assigning the turn order `size()` before insertion.
    ///
    /// # Errors
    ///
    /// Returns `RoomError::DuplicateUser` if the user id is already present.
    pub fn append(&mut self, mut user: UserEntry) -> Result<usize, RoomError> {
        if self.lookup(&user.user_id).is_some() {
            return Err(RoomError::DuplicateUser(user.user_id.into_string()));
        }
        let turn_order = self.members.len();
        user.turn_order = turn_order;
        self.members.push(user);
        Ok(turn_order)
    }

    pub fn lookup(&self, user_id: &UserId) -> Option<&UserEntry> {
        self.members.iter().find(|m| &m.user_id == user_id)
    }

    pub fn lookup_mut(&mut self, user_id: &UserId) -> Option<&mut UserEntry> {
        self.members.iter_mut().find(|m| &m.user_id == user_id)
    }

    /// Remove a member. Removing an absent id is a no-op.
    pub fn remove(&mut self, user_id: &UserId) -> Option<UserEntry> {
        let index = self.members.iter().position(|m| &m.user_id == user_id)?;
        Some(self.members.remove(index))
    }

    /// Apply `f` to every member in insertion order.
    pub fn for_each<F>(&self, f: F)
    where
        F: FnMut(&UserEntry),
    {
        self.members.iter().for_each(f);
    }

    /// Apply `f` mutably to every member in insertion order.
    pub fn for_each_mut<F>(&mut self, f: F)
    where
        F: FnMut(&mut UserEntry),
    {
        self.members.iter_mut().for_each(f);
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserEntry> {
        self.members.iter()
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The member holding the given turn order, if any.
    pub fn find_by_turn_order(&self, turn_order: usize) -> Option<&UserEntry> {
        self.members.iter().find(|m| m.turn_order == turn_order)
    }

    /// Close the gap left by a departed member's turn order.
    pub fn compact_turn_orders(&mut self, left_turn_order: usize) {
        for member in self.members.iter_mut() {
            if member.turn_order > left_turn_order {
                member.turn_order -= 1;
            }
        }
    }

    /// Whether every member has signalled ready. `false` for an empty list.
    pub fn all_ready(&self) -> bool {
        !self.members.is_empty() && self.members.iter().all(|m| m.ready.is_ready())
    }
}

//! Circular draw-turn scheduling.
//!
//! The scheduler only stores the two indices. Members carry their own dense
//! turn order (`0..n`), so every resolution is a scan of the member list for
//! the matching turn order. A failed resolution yields an empty user id,
//! which callers treat as "no drawer right now".

use super::{RoomError, RoomMemberList};

/// Drawer pair resolved when a round starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawAssignment {
    pub current_draw_user_id: String,
    pub next_draw_user_id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnScheduler {
    /// `None` until the first round starts
    current: Option<usize>,
    next: usize,
}

impl TurnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to the next drawer and name the one after.
    ///
    /// # Errors
    ///
    /// Returns `RoomError::EmptyRoom` when there are no members; the indices
    /// are left untouched.
    pub fn start_round(&mut self, members: &RoomMemberList) -> Result<DrawAssignment, RoomError> {
        let count = members.size();
        if count == 0 {
            return Err(RoomError::EmptyRoom);
        }

        let current = self.current.map_or(0, |c| (c + 1) % count);
        self.current = Some(current);
        let current_draw_user_id = resolve(members, current);
        let next_draw_user_id = self.resolve_next(members);

        Ok(DrawAssignment {
            current_draw_user_id,
            next_draw_user_id,
        })
    }

    /// Recompute the next index from the current one and resolve its member.
    pub fn resolve_next(&mut self, members: &RoomMemberList) -> String {
        let count = members.size();
        if count == 0 {
            return String::new();
        }
        self.next = self.current.map_or(0, |c| (c + 1) % count);
        resolve(members, self.next)
    }

    /// Compact turn orders after a member with `left_turn_order` was removed.
    ///
    /// `members` must already exclude the departed member. The current index
    /// steps back when the departed member sat at or before it, so rotation
    /// continues with whoever slid into the vacated position.
    pub fn on_member_leave(&mut self, members: &mut RoomMemberList, left_turn_order: usize) {
        members.compact_turn_orders(left_turn_order);

        let count = members.size();
        if count == 0 {
            *self = Self::default();
            return;
        }

        if let Some(current) = self.current {
            let current = if left_turn_order <= current {
                (current + count - 1) % count
            } else {
                current % count
            };
            self.current = Some(current);
        }
        self.next = self.current.map_or(0, |c| (c + 1) % count);
    }
}

fn resolve(members: &RoomMemberList, turn_order: usize) -> String {
    members
        .find_by_turn_order(turn_order)
        .map(|m| m.user_id.as_str().to_string())
        .unwrap_or_default()
}

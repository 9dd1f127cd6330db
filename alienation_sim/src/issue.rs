// Recoverable user-input errors from structure editing.
//
// Placing a room on top of another or expanding into an ambiguous region is
// something an editor user does all the time; it is reported as an `Issue`
// value in the `Err` arm rather than as a `StructureError`. An issue must be
// acknowledged before it is dropped, either by reading it (`kind()`,
// `Display`) or by consuming it with `handle()`.
//
// Dropping an unacknowledged issue is a bug in the calling code. It does not
// panic: it logs a warning and bumps a per-thread counter, which tests read
// through `unhandled_issue_count()` to assert that every issue produced in a
// scenario was looked at.

use std::cell::Cell;
use std::fmt;

use serde::Serialize;
use smallvec::SmallVec;
use thiserror::Error;

use crate::types::RoomId;

/// Room list carried by an issue.
pub type RoomList = SmallVec<[RoomId; 4]>;

#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
pub enum IssueKind {
    /// The new room would overlap existing rooms.
    #[error("room overlaps {} existing room(s): {rooms:?}", .rooms.len())]
    RoomIntersect { rooms: RoomList },

    /// The expansion region touches no room.
    #[error("expansion region does not touch any room")]
    NoRoomSelected,

    /// The expansion region touches more than one room.
    #[error("expansion region touches {} rooms: {rooms:?}", .rooms.len())]
    AmbiguousExpansion { rooms: RoomList },

    /// The expansion region overlaps areas the room already has.
    #[error("cannot expand {room}: region overlaps its existing areas")]
    ExpansionUnsupported { room: RoomId },
}

impl IssueKind {
    /// Rooms named by the issue, if any.
    pub fn rooms(&self) -> &[RoomId] {
        match self {
            IssueKind::RoomIntersect { rooms } | IssueKind::AmbiguousExpansion { rooms } => rooms,
            IssueKind::ExpansionUnsupported { room } => std::slice::from_ref(room),
            IssueKind::NoRoomSelected => &[],
        }
    }
}

thread_local! {
    static UNHANDLED: Cell<usize> = const { Cell::new(0) };
}

/// Issues dropped unacknowledged on this thread so far.
pub fn unhandled_issue_count() -> usize {
    UNHANDLED.with(Cell::get)
}

/// A user-input error that must be acknowledged.
#[must_use = "an issue must be acknowledged with `handle()` or by reading it"]
#[derive(Debug)]
pub struct Issue {
    kind: IssueKind,
    handled: Cell<bool>,
}

impl Issue {
    pub fn new(kind: IssueKind) -> Self {
        Self {
            kind,
            handled: Cell::new(false),
        }
    }

    /// Read the issue. Counts as acknowledging it.
    pub fn kind(&self) -> &IssueKind {
        self.handled.set(true);
        &self.kind
    }

    /// Acknowledge the issue and take its payload.
    pub fn handle(self) -> IssueKind {
        self.handled.set(true);
        self.kind.clone()
    }

    pub fn is_handled(&self) -> bool {
        self.handled.get()
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.kind(), f)
    }
}

impl Drop for Issue {
    fn drop(&mut self) {
        if !self.handled.get() {
            tracing::warn!(issue = %self.kind, "issue dropped without being handled");
            UNHANDLED.with(|c| c.set(c.get() + 1));
        }
    }
}

// Invariant violations in the structure topology.
//
// These are bugs in the calling code (asking for a room that was removed,
// holding a stale area handle) or corrupt saved state rejected on load, not
// user input. User-facing placement failures are `Issue`s instead, see
// `issue.rs`.

use thiserror::Error;

use crate::types::{AreaId, RoomId};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StructureError {
    /// A room with no areas. Rooms always hold at least one.
    #[error("{0} has no areas")]
    EmptyRoom(RoomId),

    #[error("{0} does not exist")]
    UnknownRoom(RoomId),

    /// The handle was never issued, or its area has been removed.
    #[error("{0} does not exist or was removed")]
    UnknownArea(AreaId),

    /// Two rooms share an ID, or a room's ID is free in the ID provider.
    #[error("{0} is listed twice or was never issued")]
    DuplicateRoom(RoomId),

    /// A free-list entry that is out of range, listed twice, or occupied.
    #[error("free slot {0} is out of range, duplicated or in use")]
    BadFreeSlot(u32),

    /// An area held by a room other than its owner, or by two rooms.
    #[error("{area} is not owned by {room}")]
    ForeignArea { room: RoomId, area: AreaId },

    /// A live area no room holds.
    #[error("{0} belongs to no room")]
    OrphanArea(AreaId),

    /// Two areas share volume.
    #[error("{0} overlaps {1}")]
    AreaOverlap(AreaId, AreaId),
}

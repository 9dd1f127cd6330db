// Core value types shared by the structure modules.
//
// Plan-view directions: `Orientation::Up` faces the front edge (+y in plan,
// +z in 3D), `Down` the back edge, `Right` the +x edge, `Left` the -x edge.
// `Side` adds the two vertical faces for neighbour slots, and `OpenSides` is
// the bitmask of faces that have a neighbour.
//
// Room and area handles are plain integers: `RoomId` comes from the
// structure's `IdProvider`, `AreaId` is a generational index into the area
// arena so that a handle to a removed area never aliases a new one.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Facing of a door or item in the plan view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Up,
    Right,
    Down,
    Left,
}

impl Orientation {
    /// The wall face this orientation sits on.
    pub fn side(self) -> Side {
        match self {
            Orientation::Up => Side::Front,
            Orientation::Right => Side::Right,
            Orientation::Down => Side::Back,
            Orientation::Left => Side::Left,
        }
    }

    /// Whether the long axis runs along plan `y` rather than `x`.
    pub fn is_vertical(self) -> bool {
        matches!(self, Orientation::Up | Orientation::Down)
    }
}

/// An opening cut into one wall of a room area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Door {
    /// Cosmetic selector for the frame asset.
    pub door_type: u8,
    pub orientation: Orientation,
    /// Cell offset along the wall, counted from the area's minimum corner.
    pub position: i16,
}

impl Door {
    pub const fn new(door_type: u8, orientation: Orientation, position: i16) -> Self {
        Self {
            door_type,
            orientation,
            position,
        }
    }
}

/// One of the six faces of a room area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Right,
    Left,
    Top,
    Bottom,
    Front,
    Back,
}

impl Side {
    pub const ALL: [Side; 6] = [
        Side::Right,
        Side::Left,
        Side::Top,
        Side::Bottom,
        Side::Front,
        Side::Back,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn flag(self) -> OpenSides {
        match self {
            Side::Right => OpenSides::RIGHT,
            Side::Left => OpenSides::LEFT,
            Side::Top => OpenSides::TOP,
            Side::Bottom => OpenSides::BOTTOM,
            Side::Front => OpenSides::FRONT,
            Side::Back => OpenSides::BACK,
        }
    }
}

bitflags! {
    /// Faces of a room area that have a neighbour and so get no wall.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct OpenSides: u8 {
        const FRONT = 1;
        const RIGHT = 2;
        const BACK = 4;
        const LEFT = 8;
        const BOTTOM = 16;
        const TOP = 32;
        const ALL = 63;
    }
}

/// Mesh slot a render-info record is destined for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum RoomPart {
    Wall,
    WallShort,
    WallLow,
    WallShortLow,
    DoorFrame,
    Floor,
    Ceiling,
    Railing,
    Stairs,
    None = 255,
}

impl RoomPart {
    /// Every part that can appear in generated output.
    pub const RENDERED: [RoomPart; 9] = [
        RoomPart::Wall,
        RoomPart::WallShort,
        RoomPart::WallLow,
        RoomPart::WallShortLow,
        RoomPart::DoorFrame,
        RoomPart::Floor,
        RoomPart::Ceiling,
        RoomPart::Railing,
        RoomPart::Stairs,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RoomPart::Wall => "wall",
            RoomPart::WallShort => "wall_short",
            RoomPart::WallLow => "wall_low",
            RoomPart::WallShortLow => "wall_short_low",
            RoomPart::DoorFrame => "door_frame",
            RoomPart::Floor => "floor",
            RoomPart::Ceiling => "ceiling",
            RoomPart::Railing => "railing",
            RoomPart::Stairs => "stairs",
            RoomPart::None => "none",
        }
    }
}

/// Handle to a room in a `Structure`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "room#{}", self.0)
    }
}

/// Generational handle to a room area in a `Structure`'s area arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AreaId {
    pub index: u32,
    pub generation: u32,
}

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "area#{}v{}", self.index, self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_flags_cover_all() {
        let all = Side::ALL
            .iter()
            .fold(OpenSides::empty(), |acc, s| acc | s.flag());
        assert_eq!(all, OpenSides::ALL);
    }

    #[test]
    fn orientation_maps_to_wall_side() {
        assert_eq!(Orientation::Up.side(), Side::Front);
        assert_eq!(Orientation::Down.side(), Side::Back);
        assert_eq!(Orientation::Right.side(), Side::Right);
        assert_eq!(Orientation::Left.side(), Side::Left);
    }

    #[test]
    fn room_part_keeps_wire_values() {
        assert_eq!(RoomPart::Wall as u8, 0);
        assert_eq!(RoomPart::Stairs as u8, 8);
        assert_eq!(RoomPart::None as u8, 255);
    }
}

// The two-room demo interior.
//
// Room A is built from one placed area and five expansions: a ground floor
// area with doors, the area above it, a level-1 wing behind that, a level-2
// area covering both, a front annex and a right annex. Room B is a single
// area on level 0, behind room A's ground area and under the level-1 wing,
// with a door on its front wall. Neighbour inference links across the room
// boundary: room A's ground area is open to the back, and room B is open at
// the front and top.
//
// Used by `structure_dump` when no structure file is given, and as a fixture
// by the integration tests.

use crate::bounds::{FromTo, FromTo3D};
use crate::issue::Issue;
use crate::structure::Structure;
use crate::types::{Door, Orientation, RoomId};

/// Handles to the demo's two rooms.
#[derive(Clone, Copy, Debug)]
pub struct DemoRooms {
    pub main: RoomId,
    pub annex: RoomId,
}

/// Expansion regions applied to the main room, in order.
pub const MAIN_EXPANSIONS: [((i16, i16, i16), (i16, i16, i16)); 5] = [
    ((0, 1, 0), (9, 1, -4)),
    ((0, 1, -5), (9, 1, -7)),
    ((0, 2, 0), (9, 2, -7)),
    ((0, 0, 1), (9, 0, 2)),
    ((10, 0, 0), (15, 0, -4)),
];

pub fn demo_structure() -> Result<(Structure, DemoRooms), Issue> {
    let mut s = Structure::new();
    let main = s.place_room_with_doors(
        FromTo::new((0, 0), (9, -4)),
        0,
        0,
        &[
            Door::new(0, Orientation::Left, 2),
            Door::new(0, Orientation::Down, 5),
        ],
    )?;
    for (a, b) in MAIN_EXPANSIONS {
        s.expand_room(FromTo3D::new(a, b))?;
    }
    let annex = s.place_room_with_doors(
        FromTo::new((3, -5), (7, -7)),
        0,
        1,
        &[Door::new(0, Orientation::Up, 2)],
    )?;
    Ok((s, DemoRooms { main, annex }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OpenSides;

    #[test]
    fn demo_builds_with_expected_open_sides() {
        let (s, rooms) = demo_structure().unwrap();
        assert_eq!(s.rooms().len(), 2);
        assert_eq!(s.area_count(), 7);

        let open: Vec<OpenSides> = s
            .room_areas(rooms.main)
            .unwrap()
            .map(|(_, area)| area.open_sides())
            .collect();
        assert_eq!(
            open,
            vec![
                OpenSides::FRONT | OpenSides::RIGHT | OpenSides::TOP | OpenSides::BACK,
                OpenSides::TOP | OpenSides::BOTTOM | OpenSides::BACK,
                OpenSides::TOP | OpenSides::FRONT | OpenSides::BOTTOM,
                OpenSides::BOTTOM,
                OpenSides::BACK,
                OpenSides::LEFT,
            ]
        );
        let annex: Vec<OpenSides> = s
            .room_areas(rooms.annex)
            .unwrap()
            .map(|(_, area)| area.open_sides())
            .collect();
        assert_eq!(annex, vec![OpenSides::FRONT | OpenSides::TOP]);
    }
}

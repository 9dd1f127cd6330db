// Rooms and room areas.
//
// A `RoomArea` is one rectangular, single-level volume: a plan `FromTo`, a
// level, its doors, and six neighbour slots. A slot holding an `AreaId` means
// that face is open (no wall is generated across it). Open sides are derived
// from the slots on demand, never stored.
//
// A `Room` is a non-empty ordered list of area handles plus a room type and a
// cached bounding box, grown with `Aabbi::expand` as areas are added. The areas
// themselves live in the `Structure`'s arena; a room only refers to them.
//
// See also: `structure.rs` for the arena, placement and neighbour linking,
// `render.rs` for what `RoomArea::render` produces.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::bounds::{Aabbi, FromTo};
use crate::config::StructureConfig;
use crate::error::StructureError;
use crate::render::AreaRender;
use crate::types::{AreaId, Door, OpenSides, RoomId, Side};

/// Doors stored inline with an area.
pub type DoorList = SmallVec<[Door; 2]>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomArea {
    pub from_to: FromTo,
    pub level: i16,
    pub doors: DoorList,
    /// Owning room.
    pub room: RoomId,
    /// Indexed by `Side::index()`.
    neighbours: [Option<AreaId>; 6],
}

impl RoomArea {
    pub fn new(room: RoomId, from_to: FromTo, level: i16, doors: &[Door]) -> Self {
        Self {
            from_to,
            level,
            doors: doors.iter().copied().collect(),
            room,
            neighbours: [None; 6],
        }
    }

    pub fn bounding_box(&self) -> Aabbi {
        self.from_to.to_bounds(self.level)
    }

    pub fn neighbour(&self, side: Side) -> Option<AreaId> {
        self.neighbours[side.index()]
    }

    pub(crate) fn set_neighbour(&mut self, side: Side, area: Option<AreaId>) {
        self.neighbours[side.index()] = area;
    }

    pub(crate) fn clear_neighbours(&mut self) {
        self.neighbours = [None; 6];
    }

    /// One flag per occupied neighbour slot.
    pub fn open_sides(&self) -> OpenSides {
        Side::ALL
            .iter()
            .filter(|s| self.neighbours[s.index()].is_some())
            .fold(OpenSides::empty(), |acc, s| acc | s.flag())
    }

    pub fn render<'a>(&'a self, config: &'a StructureConfig) -> AreaRender<'a> {
        AreaRender::new(
            self.from_to,
            self.level,
            &self.doors,
            self.open_sides(),
            config,
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub room_type: u8,
    /// Insertion order is kept; the index identifies an area in diagnostics.
    /// Never empty.
    areas: Vec<AreaId>,
    bounds: Aabbi,
}

impl Room {
    /// A room holding its first area.
    pub(crate) fn new(id: RoomId, room_type: u8, area: AreaId, bounds: Aabbi) -> Self {
        Self {
            id,
            room_type,
            areas: vec![area],
            bounds,
        }
    }

    pub fn areas(&self) -> &[AreaId] {
        &self.areas
    }

    pub(crate) fn push_area(&mut self, area: AreaId, bounds: Aabbi) {
        self.areas.push(area);
        self.bounds.expand(&bounds);
    }

    /// Replace the cached box after loading. `boxes` are the areas' boxes.
    pub(crate) fn recompute_bounds(
        &mut self,
        boxes: impl IntoIterator<Item = Aabbi>,
    ) -> Result<(), StructureError> {
        let mut boxes = boxes.into_iter();
        let mut bounds = boxes.next().ok_or(StructureError::EmptyRoom(self.id))?;
        for b in boxes {
            bounds.expand(&b);
        }
        self.bounds = bounds;
        Ok(())
    }

    /// Union of the areas' boxes.
    pub fn bounding_box(&self) -> Aabbi {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::GridCoord;
    use crate::types::Orientation;

    fn area_id(index: u32) -> AreaId {
        AreaId {
            index,
            generation: 0,
        }
    }

    #[test]
    fn open_sides_follow_slots() {
        let mut area = RoomArea::new(RoomId(0), FromTo::new((0, 0), (1, 1)), 0, &[]);
        assert_eq!(area.open_sides(), OpenSides::empty());
        area.set_neighbour(Side::Front, Some(area_id(1)));
        area.set_neighbour(Side::Top, Some(area_id(2)));
        assert_eq!(area.open_sides(), OpenSides::FRONT | OpenSides::TOP);
        area.set_neighbour(Side::Front, None);
        assert_eq!(area.open_sides(), OpenSides::TOP);
        area.clear_neighbours();
        assert_eq!(area.neighbour(Side::Top), None);
    }

    #[test]
    fn render_uses_derived_open_sides() {
        let config = StructureConfig::default();
        let doors = [Door::new(0, Orientation::Up, 0)];
        let mut area = RoomArea::new(RoomId(0), FromTo::new((0, 0), (0, 0)), 0, &doors);
        for side in Side::ALL {
            area.set_neighbour(side, Some(area_id(9)));
        }
        assert_eq!(area.render(&config).iter().count(), 0);
    }

    #[test]
    fn room_bounds_grow_with_areas() {
        let a = FromTo::new((0, 0), (2, 2)).to_bounds(0);
        let b = FromTo::new((3, 0), (4, 1)).to_bounds(1);
        let mut room = Room::new(RoomId(0), 0, area_id(0), a);
        room.push_area(area_id(1), b);
        let bounds = room.bounding_box();
        assert_eq!(bounds.position, GridCoord::new(0, 0, 0));
        assert_eq!(bounds.max(), GridCoord::new(5, 2, 3));
        assert_eq!(room.areas().len(), 2);
    }

    #[test]
    fn recomputed_bounds_need_an_area() {
        let a = FromTo::new((0, 0), (2, 2)).to_bounds(0);
        let mut room = Room::new(RoomId(4), 0, area_id(0), a);
        assert_eq!(
            room.recompute_bounds(Vec::<Aabbi>::new()),
            Err(StructureError::EmptyRoom(RoomId(4)))
        );
        let b = FromTo::new((5, 5), (6, 6)).to_bounds(2);
        room.recompute_bounds([b]).unwrap();
        assert_eq!(room.bounding_box(), b);
    }
}

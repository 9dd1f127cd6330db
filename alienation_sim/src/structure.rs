// The structure: rooms, the room-area arena, and topology editing.
//
// ## Storage
//
// `Structure` owns an ordered list of `Room`s and an arena of area slots.
// Each slot carries a generation counter; an `AreaId` is `(slot index,
// generation)` and only resolves while the generations match. Removing a
// room empties its slots, bumps their generations and returns them to a free
// list, so a stale `AreaId` held anywhere resolves to `UnknownArea` instead of
// to whatever area reuses the slot. Room IDs come from an `IdProvider`.
//
// ## Placement and expansion
//
// Both run a two-stage query against the existing rooms: a coarse test of
// each room's aggregate bounding box (`Aabbi::intersects`), then an exact
// per-area test.
//
// - `place_room` uses strict overlap (`Aabbi::overlaps`) for the exact stage,
//   so a room may sit flush against another. Any hit rejects the placement
//   with `IssueKind::RoomIntersect` and leaves the structure unchanged.
// - `expand_room` uses `intersects` for both stages: the region selects every
//   room it touches. Zero rooms is `NoRoomSelected`, two or more is
//   `AmbiguousExpansion`. With exactly one room, the region becomes one new
//   area per level, unless it strictly overlaps one of that room's own areas
//   (`ExpansionUnsupported`).
//
// ## Neighbours
//
// Adjacency is inferred from geometry, across room boundaries. Two areas are
// neighbours on a side when their boxes touch on that face and the shared
// patch has positive area; edge or corner contact does not count. Links are
// mutual: each of the two areas points at the other. When several areas
// qualify for one slot (a large area under two smaller ones), the lowest slot
// index wins. Candidates are bucketed by level in an `FxHashMap`, so each
// area is only compared with areas one level below, on the same level, or one
// level above.
//
// `link_neighbours` relinks every area. Placement and expansion relink the
// new areas and every area touching them; removal relinks the areas that
// pointed into the removed room. Either way the result equals a full sweep.
// Relinking overwrites manual edits made with `set_neighbour`.
//
// ## Loading
//
// Deserialization goes through `StoredStructure` and is validated before a
// `Structure` is handed out. Free slots must be in range, distinct and
// empty. Room IDs must be distinct and issued. Every room holds at least one
// live area it owns, every live area is held by exactly one room, neighbour
// slots are live, and no two areas overlap. Cached room boxes are
// recomputed. Corrupt state is rejected with a `StructureError`.
//
// See also: `room.rs` for `Room`/`RoomArea`, `issue.rs` for the issue type,
// `bounds.rs` for the box tests.

use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use alienation_ids::IdProvider;

use crate::bounds::{Aabbi, FromTo, FromTo3D};
use crate::config::StructureConfig;
use crate::error::StructureError;
use crate::issue::{Issue, IssueKind, RoomList};
use crate::render::{AreaRender, RenderInfo};
use crate::room::{Room, RoomArea};
use crate::types::{AreaId, Door, RoomId, Side};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct AreaSlot {
    generation: u32,
    area: Option<RoomArea>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "StoredStructure")]
pub struct Structure {
    rooms: Vec<Room>,
    areas: Vec<AreaSlot>,
    free_slots: Vec<u32>,
    ids: IdProvider,
}

/// A `Structure` as read from disk, before validation.
#[derive(Deserialize)]
struct StoredStructure {
    rooms: Vec<Room>,
    areas: Vec<AreaSlot>,
    free_slots: Vec<u32>,
    ids: IdProvider,
}

impl TryFrom<StoredStructure> for Structure {
    type Error = StructureError;

    fn try_from(stored: StoredStructure) -> Result<Self, StructureError> {
        let mut s = Structure {
            rooms: stored.rooms,
            areas: stored.areas,
            free_slots: stored.free_slots,
            ids: stored.ids,
        };
        s.validate()?;
        Ok(s)
    }
}

/// Live areas by level, each bucket in slot order.
type LevelBuckets = FxHashMap<i32, Vec<(AreaId, Aabbi)>>;

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    fn room_index(&self, id: RoomId) -> Option<usize> {
        self.rooms.iter().position(|r| r.id == id)
    }

    pub fn room(&self, id: RoomId) -> Result<&Room, StructureError> {
        self.room_index(id)
            .map(|i| &self.rooms[i])
            .ok_or(StructureError::UnknownRoom(id))
    }

    pub fn area(&self, id: AreaId) -> Result<&RoomArea, StructureError> {
        self.areas
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.area.as_ref())
            .ok_or(StructureError::UnknownArea(id))
    }

    fn area_mut(&mut self, id: AreaId) -> Result<&mut RoomArea, StructureError> {
        self.areas
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.area.as_mut())
            .ok_or(StructureError::UnknownArea(id))
    }

    /// Every live area, in slot order.
    pub fn areas(&self) -> impl Iterator<Item = (AreaId, &RoomArea)> + '_ {
        self.areas.iter().enumerate().filter_map(|(i, slot)| {
            slot.area.as_ref().map(|area| {
                (
                    AreaId {
                        index: i as u32,
                        generation: slot.generation,
                    },
                    area,
                )
            })
        })
    }

    pub fn area_count(&self) -> usize {
        self.areas.iter().filter(|s| s.area.is_some()).count()
    }

    /// A room's areas, in the room's insertion order.
    pub fn room_areas(
        &self,
        id: RoomId,
    ) -> Result<impl Iterator<Item = (AreaId, &RoomArea)> + '_, StructureError> {
        let room = self.room(id)?;
        Ok(room
            .areas()
            .iter()
            .filter_map(move |&a| self.area(a).ok().map(|area| (a, area))))
    }

    pub fn room_bounding_box(&self, id: RoomId) -> Result<Aabbi, StructureError> {
        Ok(self.room(id)?.bounding_box())
    }

    // -----------------------------------------------------------------------
    // Intersection queries
    // -----------------------------------------------------------------------

    /// Rooms passing the coarse box test and then `exact` against at least
    /// one of their areas.
    fn matching_rooms(&self, bounds: &Aabbi, exact: impl Fn(&Aabbi, &Aabbi) -> bool) -> RoomList {
        self.rooms
            .iter()
            .filter(|room| room.bounding_box().intersects(bounds))
            .filter(|room| {
                room.areas()
                    .iter()
                    .filter_map(|&a| self.area(a).ok())
                    .any(|area| exact(&area.bounding_box(), bounds))
            })
            .map(|room| room.id)
            .collect()
    }

    /// Whether any room's volume overlaps `bounds`. Stops at the first hit.
    pub fn intersect_room(&self, bounds: &Aabbi) -> bool {
        self.rooms.iter().any(|room| {
            room.bounding_box().intersects(bounds)
                && room
                    .areas()
                    .iter()
                    .filter_map(|&a| self.area(a).ok())
                    .any(|area| area.bounding_box().overlaps(bounds))
        })
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    fn alloc_area(&mut self, area: RoomArea) -> AreaId {
        if let Some(index) = self.free_slots.pop() {
            let slot = &mut self.areas[index as usize];
            slot.area = Some(area);
            AreaId {
                index,
                generation: slot.generation,
            }
        } else {
            self.areas.push(AreaSlot {
                generation: 0,
                area: Some(area),
            });
            AreaId {
                index: (self.areas.len() - 1) as u32,
                generation: 0,
            }
        }
    }

    /// Place a new single-area room with no doors.
    pub fn place_room(&mut self, from_to: FromTo, level: i16, room_type: u8) -> Result<RoomId, Issue> {
        self.place_room_with_doors(from_to, level, room_type, &[])
    }

    /// Place a new single-area room. Rejected with `RoomIntersect` if it
    /// overlaps any existing room.
    pub fn place_room_with_doors(
        &mut self,
        from_to: FromTo,
        level: i16,
        room_type: u8,
        doors: &[Door],
    ) -> Result<RoomId, Issue> {
        let bounds = from_to.to_bounds(level);
        let hits = self.matching_rooms(&bounds, Aabbi::overlaps);
        if !hits.is_empty() {
            tracing::warn!(?from_to, level, rooms = ?hits, "room placement rejected");
            return Err(Issue::new(IssueKind::RoomIntersect { rooms: hits }));
        }

        let id = RoomId(self.ids.new_id());
        let area = self.alloc_area(RoomArea::new(id, from_to, level, doors));
        self.rooms.push(Room::new(id, room_type, area, bounds));
        self.link_around(&[area]);

        tracing::debug!(%id, %area, ?from_to, level, "room placed");
        Ok(id)
    }

    /// Grow the one room touched by `region` by one area per level of the
    /// region.
    pub fn expand_room(&mut self, region: FromTo3D) -> Result<RoomId, Issue> {
        let bounds = region.to_bounds();
        let hits = self.matching_rooms(&bounds, Aabbi::intersects);
        if hits.len() > 1 {
            tracing::warn!(?region, rooms = ?hits, "expansion touches several rooms");
            return Err(Issue::new(IssueKind::AmbiguousExpansion { rooms: hits }));
        }
        let Some(&id) = hits.first() else {
            tracing::warn!(?region, "expansion touches no room");
            return Err(Issue::new(IssueKind::NoRoomSelected));
        };

        let Some(index) = self.room_index(id) else {
            return Err(Issue::new(IssueKind::NoRoomSelected));
        };
        let overlaps_own = self.rooms[index]
            .areas()
            .iter()
            .filter_map(|&a| self.area(a).ok())
            .any(|area| area.bounding_box().overlaps(&bounds));
        if overlaps_own {
            tracing::warn!(?region, %id, "expansion overlaps the room's own areas");
            return Err(Issue::new(IssueKind::ExpansionUnsupported { room: id }));
        }

        let added: Vec<(AreaId, Aabbi)> = region
            .levels()
            .map(|(footprint, level)| {
                let area = RoomArea::new(id, footprint, level, &[]);
                let area_bounds = area.bounding_box();
                (self.alloc_area(area), area_bounds)
            })
            .collect();
        let room = &mut self.rooms[index];
        for &(area, area_bounds) in &added {
            room.push_area(area, area_bounds);
        }
        let added_ids: Vec<AreaId> = added.iter().map(|&(area, _)| area).collect();
        self.link_around(&added_ids);

        tracing::debug!(%id, added = added.len(), ?region, "room expanded");
        Ok(id)
    }

    /// Add a door to an existing area.
    pub fn add_door(&mut self, area: AreaId, door: Door) -> Result<(), StructureError> {
        self.area_mut(area)?.doors.push(door);
        Ok(())
    }

    /// Remove a room and its areas, relinking every area that had a
    /// neighbour slot pointing at them.
    pub fn remove_room(&mut self, id: RoomId) -> Result<(), StructureError> {
        let index = self.room_index(id).ok_or(StructureError::UnknownRoom(id))?;
        let room = self.rooms.remove(index);

        for &area in room.areas() {
            if let Some(slot) = self.areas.get_mut(area.index as usize) {
                if slot.generation == area.generation && slot.area.is_some() {
                    slot.area = None;
                    slot.generation = slot.generation.wrapping_add(1);
                    self.free_slots.push(area.index);
                }
            }
        }
        let removed = room.areas();
        let affected: Vec<AreaId> = self
            .areas()
            .filter(|(_, area)| {
                Side::ALL
                    .iter()
                    .any(|&side| area.neighbour(side).is_some_and(|n| removed.contains(&n)))
            })
            .map(|(a, _)| a)
            .collect();
        let buckets = self.level_buckets();
        self.relink(&buckets, &affected);
        self.ids.free(id.0);

        tracing::debug!(%id, areas = room.areas().len(), "room removed");
        Ok(())
    }

    /// Point one slot of `area` at `neighbour` (or clear it). Only that one
    /// slot changes; the neighbour's opposite slot is left alone.
    pub fn set_neighbour(
        &mut self,
        area: AreaId,
        side: Side,
        neighbour: Option<AreaId>,
    ) -> Result<(), StructureError> {
        if let Some(n) = neighbour {
            self.area(n)?;
        }
        self.area_mut(area)?.set_neighbour(side, neighbour);
        Ok(())
    }

    /// Recompute every neighbour slot from geometry.
    pub fn link_neighbours(&mut self) {
        let buckets = self.level_buckets();
        let all: Vec<AreaId> = self.areas().map(|(a, _)| a).collect();
        self.relink(&buckets, &all);
    }

    fn level_buckets(&self) -> LevelBuckets {
        let mut buckets = LevelBuckets::default();
        for (id, area) in self.areas() {
            buckets
                .entry(area.level as i32)
                .or_default()
                .push((id, area.bounding_box()));
        }
        buckets
    }

    /// Relink `added` and every area touching one of them.
    fn link_around(&mut self, added: &[AreaId]) {
        let buckets = self.level_buckets();
        let mut targets = added.to_vec();
        for &id in added {
            if let Ok(area) = self.area(id) {
                let bounds = area.bounding_box();
                targets.extend(touching_areas(&buckets, id, &bounds).into_iter().map(|(a, _)| a));
            }
        }
        targets.sort_by_key(|a| a.index);
        targets.dedup();
        self.relink(&buckets, &targets);
    }

    /// Clear and recompute the slots of `targets`. The first candidate in
    /// slot order wins each slot.
    fn relink(&mut self, buckets: &LevelBuckets, targets: &[AreaId]) {
        let mut links: Vec<(AreaId, Side, AreaId)> = Vec::new();
        for &id in targets {
            if let Ok(area) = self.area(id) {
                let bounds = area.bounding_box();
                links.extend(
                    touching_areas(buckets, id, &bounds)
                        .into_iter()
                        .map(|(other, side)| (id, side, other)),
                );
            }
        }

        for &id in targets {
            if let Ok(area) = self.area_mut(id) {
                area.clear_neighbours();
            }
        }
        for (id, side, other) in links {
            if let Ok(area) = self.area_mut(id) {
                if area.neighbour(side).is_none() {
                    area.set_neighbour(side, Some(other));
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Check a loaded structure and recompute cached room boxes.
    fn validate(&mut self) -> Result<(), StructureError> {
        let mut freed = vec![false; self.areas.len()];
        for &index in &self.free_slots {
            match freed.get_mut(index as usize) {
                Some(seen) if !*seen && self.areas[index as usize].area.is_none() => *seen = true,
                _ => return Err(StructureError::BadFreeSlot(index)),
            }
        }

        let mut owners: Vec<Option<RoomId>> = vec![None; self.areas.len()];
        let mut room_ids = FxHashSet::default();
        for i in 0..self.rooms.len() {
            let room = &self.rooms[i];
            if !room_ids.insert(room.id) || !self.ids.is_issued(room.id.0) {
                return Err(StructureError::DuplicateRoom(room.id));
            }
            let mut boxes = Vec::with_capacity(room.areas().len());
            for &a in room.areas() {
                let area = self.area(a)?;
                let owner = &mut owners[a.index as usize];
                if area.room != room.id || owner.is_some() {
                    return Err(StructureError::ForeignArea { room: room.id, area: a });
                }
                *owner = Some(room.id);
                boxes.push(area.bounding_box());
            }
            self.rooms[i].recompute_bounds(boxes)?;
        }

        for (id, area) in self.areas() {
            if owners[id.index as usize].is_none() {
                return Err(StructureError::OrphanArea(id));
            }
            for side in Side::ALL {
                if let Some(n) = area.neighbour(side) {
                    self.area(n)?;
                }
            }
        }

        let buckets = self.level_buckets();
        let mut levels: Vec<&i32> = buckets.keys().collect();
        levels.sort();
        for level in levels {
            let bucket = &buckets[level];
            for (i, &(a, a_box)) in bucket.iter().enumerate() {
                if let Some(&(b, _)) = bucket[i + 1..].iter().find(|(_, b_box)| a_box.overlaps(b_box)) {
                    return Err(StructureError::AreaOverlap(a, b));
                }
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    pub fn render_area<'a>(
        &'a self,
        id: AreaId,
        config: &'a StructureConfig,
    ) -> Result<AreaRender<'a>, StructureError> {
        Ok(self.area(id)?.render(config))
    }

    /// Area handles in render order: rooms in order, each room's areas in
    /// insertion order.
    fn render_order(&self) -> Vec<AreaId> {
        self.rooms
            .iter()
            .flat_map(|room| room.areas().iter().copied())
            .collect()
    }

    /// Render records for every area, lazily.
    pub fn render_all<'a>(
        &'a self,
        config: &'a StructureConfig,
    ) -> impl Iterator<Item = RenderInfo> + 'a {
        self.rooms
            .iter()
            .flat_map(|room| room.areas().iter())
            .filter_map(move |&a| self.area(a).ok())
            .flat_map(move |area| area.render(config).iter())
    }

    /// Same records as `render_all`, in the same order, with areas rendered
    /// in parallel.
    pub fn render_all_par(&self, config: &StructureConfig) -> Vec<RenderInfo> {
        self.render_order()
            .par_iter()
            .flat_map_iter(|&a| {
                self.area(a)
                    .map(|area| area.render(config).to_vec())
                    .unwrap_or_default()
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse and validate a saved structure. Corrupt state is an error.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Areas in `buckets` touching `bounds` on a face, with the side of
/// `bounds` they touch, in slot order per level.
fn touching_areas(buckets: &LevelBuckets, id: AreaId, bounds: &Aabbi) -> Vec<(AreaId, Side)> {
    let level = bounds.position.y;
    [level - 1, level, level + 1]
        .iter()
        .filter_map(|l| buckets.get(l))
        .flatten()
        .filter(|(other, _)| *other != id)
        .filter_map(|&(other, other_bounds)| {
            touching_side(bounds, &other_bounds).map(|side| (other, side))
        })
        .collect()
}

/// The face of `a` that `b` touches with a patch of positive area.
fn touching_side(a: &Aabbi, b: &Aabbi) -> Option<Side> {
    let shared = a.intersection(b)?;
    let max = a.max();
    let s = shared.size;
    match (s.x == 0, s.y == 0, s.z == 0) {
        (true, false, false) => Some(if shared.position.x == max.x {
            Side::Right
        } else {
            Side::Left
        }),
        (false, true, false) => Some(if shared.position.y == max.y {
            Side::Top
        } else {
            Side::Bottom
        }),
        (false, false, true) => Some(if shared.position.z == max.z {
            Side::Front
        } else {
            Side::Back
        }),
        _ => None,
    }
}

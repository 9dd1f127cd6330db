// Render-info generation for room areas.
//
// Turns one room area (plan rectangle, level, doors, open sides) into a
// sequence of `(transform, part)` records: where to place each wall panel,
// connector, floor and ceiling quad. The renderer maps parts to instance
// buffers (see `instances.rs`); nothing here touches engine resources.
//
// ## Grid
//
// A plan cell is `cell_width = wall_width + wall_short_size` wide and a level
// is `level_height = wall_height + wall_short_size` tall. A wall panel for
// plan cell `(cx, cy)` at level `L` sits at
//
//   (cx * cell_width, L * level_height, cy * cell_width)
//
// and its connector ("short wall") sits half a cell back along the edge
// direction. Connectors are only placed between panels (`i > 0`), so an edge
// of `n` cells has `n` panels and `n - 1` connectors.
//
// ## Emission order
//
// 1. Floor (unless Bottom is open), then Ceiling (unless Top is open).
// 2. X pass, per cell `i` along plan x: back edge, front edge, then knee
//    walls if Top is open.
// 3. Y pass, per cell `j` along plan y: left edge, right edge, knee walls.
// 4. Corner stubs for an open Front or Right edge.
//
// A closed edge gets panels (or a `DoorFrame` where a door sits at that
// orientation and offset) plus connectors. An open edge gets nothing, unless
// Bottom is open too, in which case it gets a `Railing` row with connectors,
// and connector stubs mirrored onto the outside cell row.
//
// An open Front edge leaves the ends of the side walls uncapped, so a single
// `WallShort` is placed at the front end of each closed side wall; an open
// Right edge does the same for the back and front walls. Open Back and Left
// edges place nothing: the seam belongs to the area on the other side, whose
// Front or Right edge is open. An area with all six sides open produces an
// empty sequence.
//
// The sequence is lazy and restartable: `AreaRender` is `Copy` and every
// call to `iter()` walks the same records from the start.
//
// See also: `room.rs` (`RoomArea::render`), `structure.rs` (`render_all`,
// `render_all_par`), `config.rs` (`StructureConfig`).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::bounds::FromTo;
use crate::config::StructureConfig;
use crate::transform::{Basis, Facing, Transform3D, Vec3, vadd, vsub};
use crate::types::{Door, OpenSides, Orientation, RoomPart};

/// One placement record.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderInfo {
    pub transform: Transform3D,
    pub part: RoomPart,
}

impl RenderInfo {
    fn new(basis: Basis, origin: Vec3, part: RoomPart) -> Self {
        Self {
            transform: Transform3D::new(basis, origin),
            part,
        }
    }
}

type Batch = SmallVec<[RenderInfo; 12]>;

/// Inputs for one area's render sequence. See the module comment for the
/// layout rules.
#[derive(Clone, Copy, Debug)]
pub struct AreaRender<'a> {
    from_to: FromTo,
    level: i16,
    doors: &'a [Door],
    open: OpenSides,
    config: &'a StructureConfig,
}

impl<'a> AreaRender<'a> {
    pub fn new(
        from_to: FromTo,
        level: i16,
        doors: &'a [Door],
        open: OpenSides,
        config: &'a StructureConfig,
    ) -> Self {
        Self {
            from_to,
            level,
            doors,
            open,
            config,
        }
    }

    pub fn open_sides(&self) -> OpenSides {
        self.open
    }

    /// Walk the records from the start.
    pub fn iter(&self) -> impl Iterator<Item = RenderInfo> + use<'a> {
        let this = *self;
        let (size_x, size_y) = if this.open == OpenSides::ALL {
            (0, 0)
        } else {
            let size = this.from_to.size();
            (size.x, size.y)
        };
        let slabs = if size_x > 0 { this.slabs() } else { Batch::new() };
        let stubs = if size_x > 0 {
            this.corner_stubs()
        } else {
            Batch::new()
        };
        slabs
            .into_iter()
            .chain((0..size_x).flat_map(move |i| this.x_cell(i)))
            .chain((0..size_y).flat_map(move |j| this.y_cell(j)))
            .chain(stubs)
    }

    /// Collect into a vector.
    pub fn to_vec(&self) -> Vec<RenderInfo> {
        self.iter().collect()
    }

    fn cell(&self) -> f32 {
        self.config.cell_width()
    }

    fn half_cell(&self) -> f32 {
        self.config.cell_width() * 0.5
    }

    fn base_height(&self) -> f32 {
        self.level as f32 * self.config.level_height()
    }

    /// Panel origin for plan cell `(cx, cy)`.
    fn panel_origin(&self, cx: i32, cy: i32) -> Vec3 {
        let cell = self.cell();
        [cx as f32 * cell, self.base_height(), cy as f32 * cell]
    }

    fn back_row(&self) -> i32 {
        self.from_to.from_y as i32
    }

    fn front_row(&self) -> i32 {
        self.from_to.to_y as i32
    }

    fn left_col(&self) -> i32 {
        self.from_to.from_x as i32
    }

    fn right_col(&self) -> i32 {
        self.from_to.to_x as i32
    }

    fn has_door(&self, orientation: Orientation, offset: i32) -> bool {
        self.doors
            .iter()
            .any(|d| d.orientation == orientation && d.position as i32 == offset)
    }

    fn slabs(&self) -> Batch {
        let mut out = Batch::new();
        let size = self.from_to.size();
        let pos = self.from_to.position();
        let cell = self.cell();
        let scale = Basis::from_scale([size.x as f32 * cell, 1.0, size.y as f32 * cell]);
        let center = [
            (pos.x as f32 + size.x as f32 * 0.5) * cell - self.half_cell(),
            self.base_height(),
            (pos.y as f32 + (size.y - 2) as f32 * 0.5) * cell + self.half_cell(),
        ];
        if !self.open.contains(OpenSides::BOTTOM) {
            out.push(RenderInfo::new(scale, center, RoomPart::Floor));
        }
        if !self.open.contains(OpenSides::TOP) {
            let ceiling_y = center[1] + self.config.level_height() - self.config.wall_short_size;
            out.push(RenderInfo::new(
                scale,
                [center[0], ceiling_y, center[2]],
                RoomPart::Ceiling,
            ));
        }
        out
    }

    /// Panel plus leading connector along an X edge.
    fn x_panel(&self, out: &mut Batch, facing: Facing, row: i32, i: i32, part: RoomPart) {
        let origin = self.panel_origin(self.left_col() + i, row);
        out.push(RenderInfo::new(Basis::facing(facing), origin, part));
        self.x_connector(out, facing, row, i, RoomPart::WallShort, 0.0);
    }

    fn x_connector(&self, out: &mut Batch, facing: Facing, row: i32, i: i32, part: RoomPart, lift: f32) {
        if i > 0 {
            let origin = self.panel_origin(self.left_col() + i, row);
            out.push(RenderInfo::new(
                Basis::facing(facing),
                vadd(vsub(origin, [self.half_cell(), 0.0, 0.0]), [0.0, lift, 0.0]),
                part,
            ));
        }
    }

    /// Panel plus leading connector along a Y edge.
    fn y_panel(&self, out: &mut Batch, facing: Facing, col: i32, j: i32, part: RoomPart) {
        let origin = self.panel_origin(col, self.back_row() + j);
        out.push(RenderInfo::new(Basis::facing(facing), origin, part));
        self.y_connector(out, facing, col, j, RoomPart::WallShort, 0.0);
    }

    fn y_connector(&self, out: &mut Batch, facing: Facing, col: i32, j: i32, part: RoomPart, lift: f32) {
        if j > 0 {
            let origin = self.panel_origin(col, self.back_row() + j);
            out.push(RenderInfo::new(
                Basis::facing(facing),
                vadd(vsub(origin, [0.0, 0.0, self.half_cell()]), [0.0, lift, 0.0]),
                part,
            ));
        }
    }

    fn wall_or_door(&self, orientation: Orientation, offset: i32) -> RoomPart {
        if self.has_door(orientation, offset) {
            RoomPart::DoorFrame
        } else {
            RoomPart::Wall
        }
    }

    fn x_cell(self, i: i32) -> Batch {
        let mut out = Batch::new();
        let open = self.open;
        let railed = open.contains(OpenSides::BOTTOM);
        let (back, front) = (self.back_row(), self.front_row());

        if !open.contains(OpenSides::BACK) {
            let part = self.wall_or_door(Orientation::Down, i);
            self.x_panel(&mut out, Facing::Backward, back, i, part);
        } else if railed {
            self.x_panel(&mut out, Facing::Backward, back, i, RoomPart::Railing);
            self.x_connector(&mut out, Facing::Forward, back - 1, i, RoomPart::WallShort, 0.0);
        }

        if !open.contains(OpenSides::FRONT) {
            let part = self.wall_or_door(Orientation::Up, i);
            self.x_panel(&mut out, Facing::Forward, front, i, part);
        } else if railed {
            self.x_panel(&mut out, Facing::Forward, front, i, RoomPart::Railing);
            self.x_connector(&mut out, Facing::Backward, front + 1, i, RoomPart::WallShort, 0.0);
        }

        if open.contains(OpenSides::TOP) {
            let lift = self.config.wall_height;
            for (facing, row) in [(Facing::Backward, back), (Facing::Forward, front)] {
                let origin = self.panel_origin(self.left_col() + i, row);
                out.push(RenderInfo::new(
                    Basis::facing(facing),
                    vadd(origin, [0.0, lift, 0.0]),
                    RoomPart::WallLow,
                ));
            }
            for (facing, row) in [(Facing::Backward, back), (Facing::Forward, front)] {
                self.x_connector(&mut out, facing, row, i, RoomPart::WallShortLow, lift);
            }
        }
        out
    }

    fn y_cell(self, j: i32) -> Batch {
        let mut out = Batch::new();
        let open = self.open;
        let railed = open.contains(OpenSides::BOTTOM);
        let (left, right) = (self.left_col(), self.right_col());

        if !open.contains(OpenSides::LEFT) {
            let part = self.wall_or_door(Orientation::Left, j);
            self.y_panel(&mut out, Facing::Left, left, j, part);
        } else if railed {
            self.y_panel(&mut out, Facing::Left, left, j, RoomPart::Railing);
            self.y_connector(&mut out, Facing::Right, left - 1, j, RoomPart::WallShort, 0.0);
        }

        if !open.contains(OpenSides::RIGHT) {
            let part = self.wall_or_door(Orientation::Right, j);
            self.y_panel(&mut out, Facing::Right, right, j, part);
        } else if railed {
            self.y_panel(&mut out, Facing::Right, right, j, RoomPart::Railing);
            self.y_connector(&mut out, Facing::Left, right + 1, j, RoomPart::WallShort, 0.0);
        }

        if open.contains(OpenSides::TOP) {
            let lift = self.config.wall_height;
            for (facing, col) in [(Facing::Right, right), (Facing::Left, left)] {
                let origin = self.panel_origin(col, self.back_row() + j);
                out.push(RenderInfo::new(
                    Basis::facing(facing),
                    vadd(origin, [0.0, lift, 0.0]),
                    RoomPart::WallLow,
                ));
            }
            for (facing, col) in [(Facing::Right, right), (Facing::Left, left)] {
                self.y_connector(&mut out, facing, col, j, RoomPart::WallShortLow, lift);
            }
        }
        out
    }

    fn corner_stubs(&self) -> Batch {
        let mut out = Batch::new();
        let open = self.open;
        let size = self.from_to.size();

        if open.contains(OpenSides::FRONT) {
            // Cap the front ends of the side walls.
            for (side, facing, col) in [
                (OpenSides::LEFT, Facing::Left, self.left_col()),
                (OpenSides::RIGHT, Facing::Right, self.right_col()),
            ] {
                if !open.contains(side) {
                    self.y_connector(&mut out, facing, col, size.y, RoomPart::WallShort, 0.0);
                }
            }
        }

        if open.contains(OpenSides::RIGHT) {
            // Cap the right ends of the back and front walls.
            for (side, facing, row) in [
                (OpenSides::BACK, Facing::Backward, self.back_row()),
                (OpenSides::FRONT, Facing::Forward, self.front_row()),
            ] {
                if !open.contains(side) {
                    self.x_connector(&mut out, facing, row, size.x, RoomPart::WallShort, 0.0);
                }
            }
        }
        out
    }
}

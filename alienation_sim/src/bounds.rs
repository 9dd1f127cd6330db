// Integer box and rectangle primitives for the structure grid.
//
// The structure grid is measured in cells. Horizontal cell coordinates are
// `(x, y)` in the 2D plan view; in 3D the plan's `y` becomes the `z` axis and
// the vertical level becomes `y`:
//
//   plan (x, y) at level L  ->  grid (x, L, y)
//
// `FromTo` is a normalized plan-view rectangle with inclusive corners, so a
// one-cell rectangle has `from == to` and `size = to - from + 1`. `FromTo3D`
// is the same over three axes. Both lift to `Aabbi`, an integer box whose
// `max()` is exclusive (`position + size`).
//
// `Aabbi` has two intersection tests:
// - `intersects`: inclusive per-axis overlap, so boxes sharing a face count.
//   Used for coarse filtering and adjacency.
// - `overlaps`: strict volume overlap. Used as the exact check when placing
//   rooms, since rooms are allowed to sit flush against each other.
//
// See also: `structure.rs` for the two-stage intersection queries built on
// these tests.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

// ---------------------------------------------------------------------------
// Coordinates
// ---------------------------------------------------------------------------

/// A cell position in the 3D structure grid. `y` is the vertical level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl GridCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub const ONE: Self = Self::new(1, 1, 1);

    fn zip(self, other: Self, f: impl Fn(i32, i32) -> i32) -> Self {
        Self::new(f(self.x, other.x), f(self.y, other.y), f(self.z, other.z))
    }
}

impl Add for GridCoord {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a + b)
    }
}

impl Sub for GridCoord {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self.zip(rhs, |a, b| a - b)
    }
}

/// A cell position in the plan view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

// ---------------------------------------------------------------------------
// Aabbi
// ---------------------------------------------------------------------------

/// Integer axis-aligned box: minimum corner plus non-negative extents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Aabbi {
    pub position: GridCoord,
    pub size: GridCoord,
}

impl Aabbi {
    pub const fn new(position: GridCoord, size: GridCoord) -> Self {
        Self { position, size }
    }

    /// Exclusive upper corner.
    pub fn max(&self) -> GridCoord {
        self.position + self.size
    }

    /// Inclusive overlap on every axis. Touching faces intersect.
    pub fn intersects(&self, other: &Aabbi) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.position.x <= b_max.x
            && a_max.x >= other.position.x
            && self.position.y <= b_max.y
            && a_max.y >= other.position.y
            && self.position.z <= b_max.z
            && a_max.z >= other.position.z
    }

    /// Strict overlap: the boxes share a volume of at least one cell.
    pub fn overlaps(&self, other: &Aabbi) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.position.x < b_max.x
            && a_max.x > other.position.x
            && self.position.y < b_max.y
            && a_max.y > other.position.y
            && self.position.z < b_max.z
            && a_max.z > other.position.z
    }

    /// The shared region of two intersecting boxes. Touching boxes give a
    /// box with a zero extent on the touching axis.
    pub fn intersection(&self, other: &Aabbi) -> Option<Aabbi> {
        if !self.intersects(other) {
            return None;
        }
        let lo = self.position.zip(other.position, i32::max);
        let hi = self.max().zip(other.max(), i32::min);
        Some(Aabbi::new(lo, hi - lo))
    }

    /// Grow the box to cover `cell`.
    pub fn encapsulate(&mut self, cell: GridCoord) {
        let lo = self.position.zip(cell, i32::min);
        let hi = self.max().zip(cell + GridCoord::ONE, i32::max);
        self.position = lo;
        self.size = hi - lo;
    }

    /// Grow the box to cover `other`.
    pub fn expand(&mut self, other: &Aabbi) {
        let lo = self.position.zip(other.position, i32::min);
        let hi = self.max().zip(other.max(), i32::max);
        self.position = lo;
        self.size = hi - lo;
    }
}

// ---------------------------------------------------------------------------
// FromTo
// ---------------------------------------------------------------------------

/// Normalized plan-view rectangle with inclusive corners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FromTo {
    pub from_x: i16,
    pub from_y: i16,
    pub to_x: i16,
    pub to_y: i16,
}

impl FromTo {
    /// Build from any two opposite corners.
    pub fn new(start: (i16, i16), end: (i16, i16)) -> Self {
        Self {
            from_x: start.0.min(end.0),
            from_y: start.1.min(end.1),
            to_x: start.0.max(end.0),
            to_y: start.1.max(end.1),
        }
    }

    pub fn position(&self) -> CellCoord {
        CellCoord::new(self.from_x as i32, self.from_y as i32)
    }

    /// Extents in cells, counting both corners.
    pub fn size(&self) -> CellCoord {
        CellCoord::new(
            self.to_x as i32 - self.from_x as i32 + 1,
            self.to_y as i32 - self.from_y as i32 + 1,
        )
    }

    /// Lift to a one-level box at `level`.
    pub fn to_bounds(&self, level: i16) -> Aabbi {
        let size = self.size();
        Aabbi::new(
            GridCoord::new(self.from_x as i32, level as i32, self.from_y as i32),
            GridCoord::new(size.x, 1, size.y),
        )
    }
}

/// Normalized 3D box with inclusive corners. `y` is the vertical level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FromTo3D {
    pub from_x: i16,
    pub from_y: i16,
    pub from_z: i16,
    pub to_x: i16,
    pub to_y: i16,
    pub to_z: i16,
}

impl FromTo3D {
    pub fn new(start: (i16, i16, i16), end: (i16, i16, i16)) -> Self {
        Self {
            from_x: start.0.min(end.0),
            from_y: start.1.min(end.1),
            from_z: start.2.min(end.2),
            to_x: start.0.max(end.0),
            to_y: start.1.max(end.1),
            to_z: start.2.max(end.2),
        }
    }

    pub fn to_bounds(&self) -> Aabbi {
        let from = GridCoord::new(self.from_x as i32, self.from_y as i32, self.from_z as i32);
        let to = GridCoord::new(self.to_x as i32, self.to_y as i32, self.to_z as i32);
        Aabbi::new(from, to - from + GridCoord::ONE)
    }

    /// The plan-view rectangle shared by every level of the box.
    pub fn footprint(&self) -> FromTo {
        FromTo::new((self.from_x, self.from_z), (self.to_x, self.to_z))
    }

    /// One `(footprint, level)` slice per level, bottom to top.
    pub fn levels(&self) -> impl Iterator<Item = (FromTo, i16)> + use<> {
        let footprint = self.footprint();
        (self.from_y..=self.to_y).map(move |level| (footprint, level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cube(x: i32, y: i32, z: i32, s: i32) -> Aabbi {
        Aabbi::new(GridCoord::new(x, y, z), GridCoord::new(s, s, s))
    }

    #[test]
    fn from_to_normalizes_corners() {
        let ft = FromTo::new((9, -4), (0, 0));
        assert_eq!((ft.from_x, ft.from_y, ft.to_x, ft.to_y), (0, -4, 9, 0));
        assert_eq!(ft.position(), CellCoord::new(0, -4));
        assert_eq!(ft.size(), CellCoord::new(10, 5));
    }

    #[test]
    fn single_cell_rectangle_has_unit_size() {
        let ft = FromTo::new((3, 3), (3, 3));
        assert_eq!(ft.size(), CellCoord::new(1, 1));
    }

    #[test]
    fn to_bounds_puts_level_on_y() {
        let b = FromTo::new((1, 2), (3, 5)).to_bounds(4);
        assert_eq!(b.position, GridCoord::new(1, 4, 2));
        assert_eq!(b.size, GridCoord::new(3, 1, 4));
        assert_eq!(b.max(), GridCoord::new(4, 5, 6));
    }

    #[test]
    fn from_to_3d_levels_slice_per_level() {
        let ft = FromTo3D::new((0, 2, 0), (1, 0, 1));
        let levels: Vec<i16> = ft.levels().map(|(_, l)| l).collect();
        assert_eq!(levels, vec![0, 1, 2]);
        assert_eq!(ft.footprint(), FromTo::new((0, 0), (1, 1)));
        assert_eq!(ft.to_bounds().size, GridCoord::new(2, 3, 2));
    }

    #[test]
    fn touching_boxes_intersect_but_do_not_overlap() {
        let a = cube(0, 0, 0, 2);
        let b = cube(2, 0, 0, 2);
        assert!(a.intersects(&b));
        assert!(!a.overlaps(&b));
        let c = cube(3, 0, 0, 2);
        assert!(!a.intersects(&c));
    }

    #[test]
    fn intersection_of_touching_boxes_is_flat() {
        let a = cube(0, 0, 0, 2);
        let b = cube(2, 0, 1, 2);
        let shared = a.intersection(&b).unwrap();
        assert_eq!(shared.position, GridCoord::new(2, 0, 1));
        assert_eq!(shared.size, GridCoord::new(0, 2, 1));
    }

    #[test]
    fn encapsulate_covers_cell() {
        let mut b = cube(0, 0, 0, 1);
        b.encapsulate(GridCoord::new(3, -1, 0));
        assert_eq!(b.position, GridCoord::new(0, -1, 0));
        assert_eq!(b.max(), GridCoord::new(4, 1, 1));
        b.encapsulate(GridCoord::new(1, 0, 0));
        assert_eq!(b.max(), GridCoord::new(4, 1, 1));
    }

    #[test]
    fn expand_is_union() {
        let mut b = cube(0, 0, 0, 1);
        b.expand(&cube(5, 5, 5, 2));
        assert_eq!(b.position, GridCoord::new(0, 0, 0));
        assert_eq!(b.max(), GridCoord::new(7, 7, 7));
    }

    fn arb_box() -> impl Strategy<Value = Aabbi> {
        (-20i32..20, -5i32..5, -20i32..20, 0i32..8, 0i32..4, 0i32..8).prop_map(
            |(x, y, z, sx, sy, sz)| Aabbi::new(GridCoord::new(x, y, z), GridCoord::new(sx, sy, sz)),
        )
    }

    proptest! {
        #[test]
        fn from_to_is_order_independent(a in any::<(i16, i16)>(), b in any::<(i16, i16)>()) {
            prop_assert_eq!(FromTo::new(a, b), FromTo::new(b, a));
        }

        #[test]
        fn from_to_3d_is_order_independent(
            a in any::<(i16, i16, i16)>(),
            b in any::<(i16, i16, i16)>(),
        ) {
            prop_assert_eq!(FromTo3D::new(a, b), FromTo3D::new(b, a));
        }

        #[test]
        fn intersects_is_symmetric_and_reflexive(a in arb_box(), b in arb_box()) {
            prop_assert_eq!(a.intersects(&b), b.intersects(&a));
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
            prop_assert!(a.intersects(&a));
        }

        #[test]
        fn overlap_implies_intersect(a in arb_box(), b in arb_box()) {
            if a.overlaps(&b) {
                prop_assert!(a.intersects(&b));
            }
        }

        #[test]
        fn expand_contains_both(a in arb_box(), b in arb_box()) {
            let mut u = a;
            u.expand(&b);
            prop_assert!(u.intersects(&a) && u.intersects(&b));
            prop_assert!(u.position.x <= a.position.x && u.max().x >= b.max().x);
        }
    }
}

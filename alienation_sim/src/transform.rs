// Rigid transforms for render-info records.
//
// A `Basis` is a row-major 3x3 matrix; a `Transform3D` is a basis plus an
// origin. Only two kinds of basis are ever produced: the four cardinal
// rotations about the vertical axis (walls) and axis scales (floor and
// ceiling quads). Cardinal rotations are written out exactly rather than
// computed with `sin`/`cos`, so generated transforms compare equal across
// platforms.

use serde::{Deserialize, Serialize};

pub type Vec3 = [f32; 3];

pub fn vadd(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn vsub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// One of the four wall facings, as a rotation about +Y.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// 0 rad.
    Forward,
    /// pi rad.
    Backward,
    /// pi/2 rad.
    Right,
    /// 3pi/2 rad.
    Left,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Basis {
    pub rows: [Vec3; 3],
}

impl Basis {
    pub const IDENTITY: Basis = Basis {
        rows: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Rotation about +Y: rows `[c, 0, s]`, `[0, 1, 0]`, `[-s, 0, c]`.
    pub fn facing(facing: Facing) -> Basis {
        let (s, c) = match facing {
            Facing::Forward => (0.0, 1.0),
            Facing::Backward => (0.0, -1.0),
            Facing::Right => (1.0, 0.0),
            Facing::Left => (-1.0, 0.0),
        };
        Basis {
            rows: [[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]],
        }
    }

    pub fn from_scale(scale: Vec3) -> Basis {
        Basis {
            rows: [
                [scale[0], 0.0, 0.0],
                [0.0, scale[1], 0.0],
                [0.0, 0.0, scale[2]],
            ],
        }
    }

    /// Length of each column.
    pub fn scale(&self) -> Vec3 {
        let col = |i: usize| {
            let [a, b, c] = [self.rows[0][i], self.rows[1][i], self.rows[2][i]];
            (a * a + b * b + c * c).sqrt()
        };
        [col(0), col(1), col(2)]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    pub basis: Basis,
    pub origin: Vec3,
}

impl Transform3D {
    pub const fn new(basis: Basis, origin: Vec3) -> Self {
        Self { basis, origin }
    }
}

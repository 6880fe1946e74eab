//! Integer axis-aligned volume ("qube")

use serde::{Deserialize, Serialize};

use crate::core::types::{IVec3, Position, Vec3};

/// Axis-aligned integer volume defined by an anchor corner and inclusive extents.
///
/// A qube spans `[x, x+w] × [y, y+h] × [z, z+d]` on all axes, so a single cell
/// has all extents 0. Extents are never negative.
///
/// Serialized as the flat `[x, y, z, w, h, d]` array.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 6]", into = "[i32; 6]")]
pub struct Qube {
    pub anchor: Position,
    pub extent: IVec3,
}

impl Qube {
    /// Create qube from anchor and extents (negative extents are clamped to 0)
    pub fn new(anchor: Position, extent: IVec3) -> Self {
        Self {
            anchor,
            extent: extent.max(IVec3::ZERO),
        }
    }

    /// Create qube from the six-integer `(x, y, z, w, h, d)` form
    pub fn from_array(q: [i32; 6]) -> Self {
        Self::new(IVec3::new(q[0], q[1], q[2]), IVec3::new(q[3], q[4], q[5]))
    }

    /// The six-integer `(x, y, z, w, h, d)` form
    pub fn to_array(&self) -> [i32; 6] {
        [
            self.anchor.x, self.anchor.y, self.anchor.z,
            self.extent.x, self.extent.y, self.extent.z,
        ]
    }

    /// Single-cell qube at `pos`
    pub fn cell(pos: Position) -> Self {
        Self { anchor: pos, extent: IVec3::ZERO }
    }

    /// Create qube spanning two inclusive corners, in any order
    pub fn from_corners(a: Position, b: Position) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self { anchor: min, extent: max - min }
    }

    /// Smallest qube containing every position, or `None` for an empty set
    pub fn bounding<I: IntoIterator<Item = Position>>(positions: I) -> Option<Self> {
        let mut iter = positions.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self::from_corners(min, max))
    }

    /// Minimum corner (same as the anchor)
    pub fn min(&self) -> Position {
        self.anchor
    }

    /// Maximum corner (inclusive)
    pub fn max(&self) -> Position {
        self.anchor + self.extent
    }

    /// Number of cells along each axis
    pub fn size(&self) -> IVec3 {
        self.extent + IVec3::ONE
    }

    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        let s = self.size();
        s.x as usize * s.y as usize * s.z as usize
    }

    /// Center point: anchor + extent / 2 per axis
    pub fn center(&self) -> Vec3 {
        self.anchor.as_vec3() + self.extent.as_vec3() * 0.5
    }

    /// Check if a cell lies inside the qube
    pub fn contains(&self, pos: Position) -> bool {
        let max = self.max();
        pos.x >= self.anchor.x && pos.x <= max.x &&
        pos.y >= self.anchor.y && pos.y <= max.y &&
        pos.z >= self.anchor.z && pos.z <= max.z
    }

    /// Check if two qubes share at least one cell
    pub fn collides(&self, other: &Qube) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.anchor.x <= b_max.x && a_max.x >= other.anchor.x &&
        self.anchor.y <= b_max.y && a_max.y >= other.anchor.y &&
        self.anchor.z <= b_max.z && a_max.z >= other.anchor.z
    }

    /// Intersect with `bound`; `None` when they do not overlap
    pub fn clamp(&self, bound: &Qube) -> Option<Qube> {
        if !self.collides(bound) {
            return None;
        }
        let min = self.anchor.max(bound.anchor);
        Some(Qube { anchor: min, extent: self.max().min(bound.max()) - min })
    }

    /// Return merged qube containing both
    pub fn merged(&self, other: &Qube) -> Qube {
        Qube::from_corners(self.anchor.min(other.anchor), self.max().max(other.max()))
    }

    /// Grow to include `pos`
    pub fn expand(&mut self, pos: Position) {
        *self = self.merged(&Qube::cell(pos));
    }

    /// Iterate every cell, x outermost and z innermost
    pub fn cells(&self) -> impl Iterator<Item = Position> + use<> {
        let (min, max) = (self.anchor, self.max());
        (min.x..=max.x).flat_map(move |x| {
            (min.y..=max.y).flat_map(move |y| {
                (min.z..=max.z).map(move |z| IVec3::new(x, y, z))
            })
        })
    }
}

impl From<[i32; 6]> for Qube {
    fn from(q: [i32; 6]) -> Self {
        Qube::from_array(q)
    }
}

impl From<Qube> for [i32; 6] {
    fn from(q: Qube) -> Self {
        q.to_array()
    }
}

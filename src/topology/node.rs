//! Node primitives: labeled coordinate points in 1, 2 and 3 dimensions.
//!
//! A node's `id` is assigned by the mesh that stores it. A negative id
//! (conventionally [`UNASSIGNED`]) means "anonymous": the mesh picks the next
//! free id when the node is added.

use crate::mesh_error::MeshError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Id carried by nodes that have not been added to a mesh yet.
pub const UNASSIGNED: i32 = -1;

/// Id for a node entering a mesh whose next free id is `counter`, and the
/// counter to keep afterwards. `requested` is the node's own id, if any.
pub(crate) fn claim_id(counter: i32, requested: Option<i32>) -> Result<(i32, i32), MeshError> {
    let id = requested.unwrap_or(counter);
    let next = id.checked_add(1).ok_or(MeshError::IdOverflow(id))?;
    Ok((id, counter.max(next)))
}

/// Coordinate axis selector for composite meshes and range queries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    #[inline]
    pub const fn label(self) -> char {
        match self {
            Axis::X => 'x',
            Axis::Y => 'y',
            Axis::Z => 'z',
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A point on a line.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node1D {
    id: i32,
    x: f64,
}

impl Node1D {
    /// Anonymous node at `x`.
    #[inline]
    pub const fn new(x: f64) -> Self {
        Self { id: UNASSIGNED, x }
    }

    #[inline]
    pub const fn with_id(id: i32, x: f64) -> Self {
        Self { id, x }
    }

    #[inline]
    pub const fn id(&self) -> i32 {
        self.id
    }

    #[inline]
    pub const fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    #[inline]
    pub fn set_x(&mut self, x: f64) {
        self.x = x;
    }

    #[inline]
    pub const fn has_id(&self) -> bool {
        self.id >= 0
    }
}

/// A point in the plane.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node2D {
    id: i32,
    x: f64,
    y: f64,
}

impl Node2D {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { id: UNASSIGNED, x, y }
    }

    #[inline]
    pub const fn with_id(id: i32, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    #[inline]
    pub const fn id(&self) -> i32 {
        self.id
    }

    #[inline]
    pub const fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub const fn y(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    #[inline]
    pub const fn has_id(&self) -> bool {
        self.id >= 0
    }

    /// Coordinate along `axis`; the z coordinate of a planar node is 0.
    #[inline]
    pub const fn coord(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => 0.0,
        }
    }
}

/// A point in space.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node3D {
    id: i32,
    x: f64,
    y: f64,
    z: f64,
}

impl Node3D {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            id: UNASSIGNED,
            x,
            y,
            z,
        }
    }

    #[inline]
    pub const fn with_id(id: i32, x: f64, y: f64, z: f64) -> Self {
        Self { id, x, y, z }
    }

    #[inline]
    pub const fn id(&self) -> i32 {
        self.id
    }

    #[inline]
    pub const fn x(&self) -> f64 {
        self.x
    }

    #[inline]
    pub const fn y(&self) -> f64 {
        self.y
    }

    #[inline]
    pub const fn z(&self) -> f64 {
        self.z
    }

    #[inline]
    pub fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    #[inline]
    pub const fn coord(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Projection onto the axis `which`, as an anonymous 1D node.
    #[inline]
    pub const fn project(&self, which: Axis) -> Node1D {
        Node1D::new(self.coord(which))
    }

    /// Projection onto the xy plane, as an anonymous 2D node.
    #[inline]
    pub const fn project_xy(&self) -> Node2D {
        Node2D::new(self.x, self.y)
    }
}

#[cfg(test)]
mod layout_tests {
    use super::*;
    use static_assertions::assert_eq_size;

    assert_eq_size!(Node1D, [u64; 2]);
    assert_eq_size!(Node2D, [u64; 3]);
    assert_eq_size!(Node3D, [u64; 4]);
}

//! Located-cell results.
//!
//! A cell is what a mesh returns from `locate`: the ids and coordinates of
//! the nodes surrounding the query point. Cells are values; they are never
//! stored in a mesh. A node id below zero marks a corner that fell beyond
//! the meshed domain, and any such corner makes the whole cell "outside".
//! Callers must check [`is_outside`](Cell1D::is_outside) before trusting ids.

use super::node::{Node2D, UNASSIGNED};
use serde::{Deserialize, Serialize};

/// Interval bracketing a 1D query.
///
/// Slot 0 is the low end, slot 1 the high end. Below the mesh only slot 1 is
/// filled (with the first node), above it only slot 0 (with the last node).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell1D {
    node_ids: [i32; 2],
    x: [f64; 2],
}

impl Default for Cell1D {
    fn default() -> Self {
        Self {
            node_ids: [UNASSIGNED; 2],
            x: [0.0; 2],
        }
    }
}

impl Cell1D {
    #[inline]
    pub const fn new(n0: i32, x0: f64, n1: i32, x1: f64) -> Self {
        Self {
            node_ids: [n0, n1],
            x: [x0, x1],
        }
    }

    /// # Panics
    /// Panics if `n > 1`.
    #[inline]
    pub fn node_id(&self, n: usize) -> i32 {
        self.node_ids[n]
    }

    /// # Panics
    /// Panics if `n > 1`.
    #[inline]
    pub fn x(&self, n: usize) -> f64 {
        self.x[n]
    }

    #[inline]
    pub(crate) fn set(&mut self, n: usize, id: i32, x: f64) {
        self.node_ids[n] = id;
        self.x[n] = x;
    }

    #[inline]
    pub fn node_ids(&self) -> [i32; 2] {
        self.node_ids
    }

    #[inline]
    pub fn is_outside(&self) -> bool {
        self.node_ids[0] < 0 || self.node_ids[1] < 0
    }

    /// `true` when no slot is filled, i.e. the mesh was empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.node_ids[0] < 0 && self.node_ids[1] < 0
    }
}

/// Barycentric weights of `(px, py)` relative to the triangle `corners`.
///
/// The weights sum to 1; all are non-negative iff the point is inside. A
/// degenerate (zero-area) triangle yields non-finite weights.
#[inline]
pub fn barycentric_weights(corners: [(f64, f64); 3], px: f64, py: f64) -> [f64; 3] {
    let (x0, y0) = corners[0];
    let x2 = corners[1].0 - x0;
    let y2 = corners[1].1 - y0;
    let x3 = corners[2].0 - x0;
    let y3 = corners[2].1 - y0;
    let xr = px - x0;
    let yr = py - y0;
    let det = x2 * y3 - x3 * y2;

    let phi1 = (xr * y3 - x3 * yr) / det;
    let phi2 = (x2 * yr - xr * y2) / det;
    [1.0 - phi1 - phi2, phi1, phi2]
}

/// A located triangle: its index in the mesh plus copies of its corners.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellTri2D {
    cell: Option<usize>,
    nodes: [Node2D; 3],
}

impl Default for CellTri2D {
    fn default() -> Self {
        Self::outside()
    }
}

impl CellTri2D {
    #[inline]
    pub const fn new(cell: usize, nodes: [Node2D; 3]) -> Self {
        Self {
            cell: Some(cell),
            nodes,
        }
    }

    /// The sentinel returned for points beyond the triangulation.
    #[inline]
    pub const fn outside() -> Self {
        let n = Node2D::new(0.0, 0.0);
        Self {
            cell: None,
            nodes: [n; 3],
        }
    }

    #[inline]
    pub fn cell_id(&self) -> Option<usize> {
        self.cell
    }

    #[inline]
    pub fn is_outside(&self) -> bool {
        self.cell.is_none() || self.nodes.iter().any(|n| n.id() < 0)
    }

    #[inline]
    pub fn node(&self, n: usize) -> &Node2D {
        &self.nodes[n]
    }

    #[inline]
    pub fn node_id(&self, n: usize) -> i32 {
        self.nodes[n].id()
    }

    #[inline]
    pub fn x(&self, n: usize) -> f64 {
        self.nodes[n].x()
    }

    #[inline]
    pub fn y(&self, n: usize) -> f64 {
        self.nodes[n].y()
    }

    /// Barycentric coordinates `(phi0, phi1, phi2)` of `node` in this triangle.
    #[inline]
    pub fn barycentrics(&self, node: &Node2D) -> [f64; 3] {
        barycentric_weights(self.corners(), node.x(), node.y())
    }

    #[inline]
    fn corners(&self) -> [(f64, f64); 3] {
        [
            (self.nodes[0].x(), self.nodes[0].y()),
            (self.nodes[1].x(), self.nodes[1].y()),
            (self.nodes[2].x(), self.nodes[2].y()),
        ]
    }
}

/// Hexahedral cell of a rectilinear 3D mesh.
///
/// Corner `n` sits at `ix + 2*iy + 4*iz`, with `ix`, `iy`, `iz` choosing the
/// low (0) or high (1) end of each axis interval.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellRect3D {
    node_ids: [i32; 8],
    xyz: [[f64; 3]; 8],
}

impl Default for CellRect3D {
    fn default() -> Self {
        Self {
            node_ids: [UNASSIGNED; 8],
            xyz: [[0.0; 3]; 8],
        }
    }
}

impl CellRect3D {
    #[inline]
    pub fn node_id(&self, n: usize) -> i32 {
        self.node_ids[n]
    }

    #[inline]
    pub fn node_ids(&self) -> [i32; 8] {
        self.node_ids
    }

    #[inline]
    pub fn x(&self, n: usize) -> f64 {
        self.xyz[n][0]
    }

    #[inline]
    pub fn y(&self, n: usize) -> f64 {
        self.xyz[n][1]
    }

    #[inline]
    pub fn z(&self, n: usize) -> f64 {
        self.xyz[n][2]
    }

    #[inline]
    pub(crate) fn set(&mut self, n: usize, id: i32, xyz: [f64; 3]) {
        self.node_ids[n] = id;
        self.xyz[n] = xyz;
    }

    #[inline]
    pub fn is_outside(&self) -> bool {
        self.node_ids.iter().any(|&id| id < 0)
    }
}

/// Prismatic cell: an in-plane triangle swept across one z interval.
///
/// Corners 0..3 are the triangle at the low z end, 3..6 the same triangle at
/// the high z end.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellPrism3D {
    node_ids: [i32; 6],
    xyz: [[f64; 3]; 6],
}

impl Default for CellPrism3D {
    fn default() -> Self {
        Self {
            node_ids: [UNASSIGNED; 6],
            xyz: [[0.0; 3]; 6],
        }
    }
}

impl CellPrism3D {
    #[inline]
    pub fn node_id(&self, n: usize) -> i32 {
        self.node_ids[n]
    }

    #[inline]
    pub fn node_ids(&self) -> [i32; 6] {
        self.node_ids
    }

    #[inline]
    pub fn x(&self, n: usize) -> f64 {
        self.xyz[n][0]
    }

    #[inline]
    pub fn y(&self, n: usize) -> f64 {
        self.xyz[n][1]
    }

    #[inline]
    pub fn z(&self, n: usize) -> f64 {
        self.xyz[n][2]
    }

    #[inline]
    pub(crate) fn set(&mut self, n: usize, id: i32, xyz: [f64; 3]) {
        self.node_ids[n] = id;
        self.xyz[n] = xyz;
    }

    #[inline]
    pub fn is_outside(&self) -> bool {
        self.node_ids.iter().any(|&id| id < 0)
    }

    /// In-plane barycentric weights of `(x, y)` against the base triangle.
    #[inline]
    pub fn barycentrics(&self, x: f64, y: f64) -> [f64; 3] {
        let c = |n: usize| (self.xyz[n][0], self.xyz[n][1]);
        barycentric_weights([c(0), c(1), c(2)], x, y)
    }
}

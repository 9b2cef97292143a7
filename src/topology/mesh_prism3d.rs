//! Prismatic 3D mesh: a triangulated plane extruded along z.
//!
//! The product node built from in-plane node position `ixy` and z position
//! `iz` has the flattened id `iz * xy_nodes + ixy`.

use super::cell::CellPrism3D;
use super::mesh_tri2d::MeshTri2D;
use super::mesh1d::Mesh1D;
use super::node::{Axis, Node1D, Node2D, Node3D};
use crate::mesh_error::MeshError;
use itertools::iproduct;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshPrism3D {
    xy: MeshTri2D,
    z: Mesh1D,
}

impl MeshPrism3D {
    pub fn new(xy: MeshTri2D, z: Mesh1D) -> Self {
        Self { xy, z }
    }

    #[inline]
    pub fn xy(&self) -> &MeshTri2D {
        &self.xy
    }

    #[inline]
    pub fn xy_mut(&mut self) -> &mut MeshTri2D {
        &mut self.xy
    }

    #[inline]
    pub fn z(&self) -> &Mesh1D {
        &self.z
    }

    #[inline]
    pub fn z_mut(&mut self) -> &mut Mesh1D {
        &mut self.z
    }

    pub fn add_node(&mut self, node: Node2D) -> Result<&Node2D, MeshError> {
        self.xy.add_node(node)
    }

    pub fn add_cell(&mut self, n1: i32, n2: i32, n3: i32) -> Result<usize, MeshError> {
        self.xy.add_cell(n1, n2, n3)
    }

    pub fn add_z(&mut self, node: Node1D) -> Result<&Node1D, MeshError> {
        self.z.add(node)
    }

    pub fn clear(&mut self) {
        self.xy.clear();
        self.z.clear();
    }

    /// Number of nodes in the product mesh.
    #[inline]
    pub fn size_nodes(&self) -> usize {
        self.xy.size_nodes() * self.z.size()
    }

    /// Flattened id of in-plane position `ixy` at z position `iz`.
    #[inline]
    pub fn node_index(&self, ixy: usize, iz: usize) -> usize {
        iz * self.xy.size_nodes() + ixy
    }

    pub fn range_min(&self, which: Axis) -> Result<f64, MeshError> {
        match which {
            Axis::Z => Ok(self.z.range_min()),
            _ => self.xy.range_min(which),
        }
    }

    pub fn range_max(&self, which: Axis) -> Result<f64, MeshError> {
        match which {
            Axis::Z => Ok(self.z.range_max()),
            _ => self.xy.range_max(which),
        }
    }

    /// Locate the triangle under `(x, y)` and the z interval around `z`,
    /// and sweep one across the other.
    pub fn locate(&self, node: &Node3D) -> CellPrism3D {
        let mut result = CellPrism3D::default();

        let tri = self.xy.locate(&node.project_xy());
        if tri.is_outside() {
            return result;
        }
        let zcell = self.z.locate(&node.project(Axis::Z));

        let mut planar = [0usize; 3];
        for (k, slot) in planar.iter_mut().enumerate() {
            match self.xy.position_of(tri.node_id(k)) {
                Some(pos) => *slot = pos,
                None => return result,
            }
        }

        for (iz, k) in iproduct!(0..2, 0..3) {
            let zid = zcell.node_id(iz);
            if zid < 0 {
                continue;
            }
            let Some(pz) = self.z.position_of(zid) else {
                continue;
            };
            let id = self.node_index(planar[k], pz) as i32;
            result.set(iz * 3 + k, id, [tri.x(k), tri.y(k), zcell.x(iz)]);
        }
        result
    }
}

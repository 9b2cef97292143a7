//! Rectilinear 3D mesh: the Cartesian product of three independent axes.
//!
//! Node `(ix, iy, iz)` of the product has the flattened id
//! `iz * nx * ny + iy * nx + ix`, where each index is the node's sorted
//! position along its axis.

use super::cell::CellRect3D;
use super::mesh1d::Mesh1D;
use super::node::{Axis, Node1D, Node3D};
use crate::mesh_error::MeshError;
use itertools::iproduct;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshRect3D {
    axes: [Mesh1D; 3],
}

impl MeshRect3D {
    pub fn new(x: Mesh1D, y: Mesh1D, z: Mesh1D) -> Self {
        Self { axes: [x, y, z] }
    }

    #[inline]
    pub fn axis(&self, which: Axis) -> &Mesh1D {
        &self.axes[which.index()]
    }

    #[inline]
    pub fn axis_mut(&mut self, which: Axis) -> &mut Mesh1D {
        &mut self.axes[which.index()]
    }

    pub fn add(&mut self, which: Axis, node: Node1D) -> Result<&Node1D, MeshError> {
        self.axis_mut(which).add(node)
    }

    pub fn remove(&mut self, which: Axis, id: i32) -> Option<Node1D> {
        self.axis_mut(which).remove(id)
    }

    pub fn remove_node(&mut self, which: Axis, node: &Node1D) -> Option<Node1D> {
        self.axis_mut(which).remove_node(node)
    }

    pub fn clear(&mut self) {
        self.axes.iter_mut().for_each(Mesh1D::clear);
    }

    #[inline]
    pub fn size(&self, which: Axis) -> usize {
        self.axis(which).size()
    }

    /// Number of nodes in the product mesh.
    #[inline]
    pub fn size_nodes(&self) -> usize {
        self.axes.iter().map(Mesh1D::size).product()
    }

    #[inline]
    pub fn at(&self, which: Axis, pos: usize) -> Option<&Node1D> {
        self.axis(which).at(pos)
    }

    #[inline]
    pub fn range_min(&self, which: Axis) -> f64 {
        self.axis(which).range_min()
    }

    #[inline]
    pub fn range_max(&self, which: Axis) -> f64 {
        self.axis(which).range_max()
    }

    /// Flattened id of the product node at axis positions `(ix, iy, iz)`.
    #[inline]
    pub fn node_index(&self, ix: usize, iy: usize, iz: usize) -> usize {
        let nx = self.size(Axis::X);
        let ny = self.size(Axis::Y);
        iz * nx * ny + iy * nx + ix
    }

    /// Coordinates of the product node with flattened id `id`.
    pub fn node_coords(&self, id: usize) -> Option<Node3D> {
        let nx = self.size(Axis::X);
        let ny = self.size(Axis::Y);
        if nx == 0 || ny == 0 {
            return None;
        }
        let (ix, iy, iz) = (id % nx, (id / nx) % ny, id / (nx * ny));
        Some(Node3D::with_id(
            id as i32,
            self.at(Axis::X, ix)?.x(),
            self.at(Axis::Y, iy)?.x(),
            self.at(Axis::Z, iz)?.x(),
        ))
    }

    /// Locate `node` on each axis and combine the three intervals.
    ///
    /// A corner whose axis interval end is missing keeps id -1, so cells on
    /// or past the boundary report [`CellRect3D::is_outside`].
    pub fn locate(&self, node: &Node3D) -> CellRect3D {
        let per_axis = Axis::ALL.map(|which| {
            let mesh = self.axis(which);
            let cell = mesh.locate(&node.project(which));
            [0, 1].map(|end| {
                let id = cell.node_id(end);
                if id < 0 {
                    return None;
                }
                mesh.position_of(id).map(|pos| (pos, cell.x(end)))
            })
        });

        let mut result = CellRect3D::default();
        for (iz, iy, ix) in iproduct!(0..2, 0..2, 0..2) {
            let n = ix + 2 * iy + 4 * iz;
            if let (Some((px, x)), Some((py, y)), Some((pz, z))) =
                (per_axis[0][ix], per_axis[1][iy], per_axis[2][iz])
            {
                result.set(n, self.node_index(px, py, pz) as i32, [x, y, z]);
            }
        }
        result
    }
}

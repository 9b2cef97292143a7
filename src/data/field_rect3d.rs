//! Trilinear scalar field over a rectilinear 3D mesh.

use super::interpolate::{NodeValues, lerp};
use crate::topology::{Axis, CellRect3D, Mesh1D, MeshRect3D, Node1D, Node3D};
use std::sync::Arc;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldRect3D {
    mesh: Arc<MeshRect3D>,
    values: NodeValues,
}

impl FieldRect3D {
    pub fn new(mesh: impl Into<Arc<MeshRect3D>>) -> Self {
        let mesh = mesh.into();
        let values = NodeValues::with_capacity(mesh.size_nodes());
        Self { mesh, values }
    }

    /// Field over the product of three axes.
    pub fn from_axes(x: Mesh1D, y: Mesh1D, z: Mesh1D) -> Self {
        Self::new(MeshRect3D::new(x, y, z))
    }

    pub(crate) fn from_parts(mesh: Arc<MeshRect3D>, values: NodeValues) -> Self {
        Self { mesh, values }
    }

    #[inline]
    pub fn mesh(&self) -> &Arc<MeshRect3D> {
        &self.mesh
    }

    #[inline]
    pub fn values(&self) -> &NodeValues {
        &self.values
    }

    /// Set the value at flattened node id `node_id`.
    pub fn define(&mut self, node_id: usize, value: f64) -> &mut Self {
        self.values.define(node_id, value);
        self
    }

    /// Set the value at axis positions `(ix, iy, iz)`.
    pub fn define_node(&mut self, ix: usize, iy: usize, iz: usize, value: f64) -> &mut Self {
        let id = self.mesh.node_index(ix, iy, iz);
        self.define(id, value)
    }

    #[inline]
    pub fn size(&self, which: Axis) -> usize {
        self.mesh.size(which)
    }

    #[inline]
    pub fn at_node(&self, which: Axis, pos: usize) -> Option<&Node1D> {
        self.mesh.at(which, pos)
    }

    #[inline]
    pub fn range_min(&self, which: Axis) -> f64 {
        self.mesh.range_min(which)
    }

    #[inline]
    pub fn range_max(&self, which: Axis) -> f64 {
        self.mesh.range_max(which)
    }

    #[inline]
    pub fn value_min(&self) -> f64 {
        self.values.min()
    }

    #[inline]
    pub fn value_max(&self) -> f64 {
        self.values.max()
    }

    /// Field value at `(x, y, z)`, NaN outside the mesh.
    #[inline]
    pub fn value(&self, x: f64, y: f64, z: f64) -> f64 {
        self.value_or(x, y, z, f64::NAN)
    }

    /// Field value at `(x, y, z)`, or `outside` beyond the mesh.
    pub fn value_or(&self, x: f64, y: f64, z: f64, outside: f64) -> f64 {
        let cell = self.mesh.locate(&Node3D::new(x, y, z));
        if cell.is_outside() {
            return outside;
        }
        let face = |base: usize| self.bilinear(&cell, base, x, y);
        lerp(cell.z(0), face(0), cell.z(4), face(4), z)
    }

    /// Interpolate across the four corners `base..base + 4` of one z face.
    fn bilinear(&self, cell: &CellRect3D, base: usize, x: f64, y: f64) -> f64 {
        let edge = |lo: usize| {
            lerp(
                cell.x(lo),
                self.values.get(cell.node_id(lo)),
                cell.x(lo + 1),
                self.values.get(cell.node_id(lo + 1)),
                x,
            )
        };
        lerp(
            cell.y(base),
            edge(base),
            cell.y(base + 2),
            edge(base + 2),
            y,
        )
    }
}

//! Piecewise-linear scalar field over a triangulated plane.

use super::interpolate::NodeValues;
use crate::mesh_error::MeshError;
use crate::topology::{Axis, MeshTri2D, Node2D};
use std::sync::Arc;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldTri2D {
    mesh: Arc<MeshTri2D>,
    values: NodeValues,
}

impl FieldTri2D {
    pub fn new(mesh: impl Into<Arc<MeshTri2D>>) -> Self {
        let mesh = mesh.into();
        let values = NodeValues::with_capacity(mesh.size_nodes());
        Self { mesh, values }
    }

    pub(crate) fn from_parts(mesh: Arc<MeshTri2D>, values: NodeValues) -> Self {
        Self { mesh, values }
    }

    #[inline]
    pub fn mesh(&self) -> &Arc<MeshTri2D> {
        &self.mesh
    }

    #[inline]
    pub fn values(&self) -> &NodeValues {
        &self.values
    }

    /// Set the value at node id `node_id`.
    pub fn define(&mut self, node_id: usize, value: f64) -> &mut Self {
        self.values.define(node_id, value);
        self
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.mesh.size_nodes()
    }

    pub fn range_min(&self, which: Axis) -> Result<f64, MeshError> {
        self.mesh.range_min(which)
    }

    pub fn range_max(&self, which: Axis) -> Result<f64, MeshError> {
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

    /// Field value at `(x, y)`, NaN outside the triangulation.
    #[inline]
    pub fn value(&self, x: f64, y: f64) -> f64 {
        self.value_or(x, y, f64::NAN)
    }

    /// Field value at `(x, y)`, or `outside` beyond the triangulation.
    pub fn value_or(&self, x: f64, y: f64, outside: f64) -> f64 {
        let query = Node2D::new(x, y);
        let cell = self.mesh.locate(&query);
        if cell.is_outside() {
            return outside;
        }
        let phi = cell.barycentrics(&query);
        (0..3)
            .map(|k| phi[k] * self.values.get(cell.node_id(k)))
            .sum()
    }
}

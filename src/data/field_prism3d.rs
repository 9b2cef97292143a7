//! Scalar field over a prismatic mesh: barycentric in the plane, linear in z.

use super::interpolate::{NodeValues, lerp};
use crate::mesh_error::MeshError;
use crate::topology::{Axis, Mesh1D, MeshPrism3D, MeshTri2D, Node3D};
use std::sync::Arc;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldPrism3D {
    mesh: Arc<MeshPrism3D>,
    values: NodeValues,
}

impl FieldPrism3D {
    pub fn new(mesh: impl Into<Arc<MeshPrism3D>>) -> Self {
        let mesh = mesh.into();
        let values = NodeValues::with_capacity(mesh.size_nodes());
        Self { mesh, values }
    }

    /// Field over `xy` extruded along `z`.
    pub fn extruded(xy: MeshTri2D, z: Mesh1D) -> Self {
        Self::new(MeshPrism3D::new(xy, z))
    }

    pub(crate) fn from_parts(mesh: Arc<MeshPrism3D>, values: NodeValues) -> Self {
        Self { mesh, values }
    }

    #[inline]
    pub fn mesh(&self) -> &Arc<MeshPrism3D> {
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
        let phi = cell.barycentrics(x, y);
        let layer = |base: usize| -> f64 {
            (0..3)
                .map(|k| phi[k] * self.values.get(cell.node_id(base + k)))
                .sum()
        };
        lerp(cell.z(0), layer(0), cell.z(3), layer(3), z)
    }
}

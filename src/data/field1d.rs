//! Piecewise-linear scalar function of one variable.
//!
//! Values live on the nodes of a shared [`Mesh1D`]. Between nodes the field
//! is linear; beyond the meshed range it holds the value of the nearest end
//! node.

use super::interpolate::{NodeValues, lerp};
use crate::mesh_error::MeshError;
use crate::topology::{Cell1D, Mesh1D, Node1D};
use std::sync::Arc;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Field1D {
    mesh: Arc<Mesh1D>,
    values: NodeValues,
}

impl Field1D {
    /// Field over an empty mesh; populate it with [`define_at`](Self::define_at).
    pub fn new() -> Self {
        Self::default()
    }

    /// Field over an existing mesh, all values 0.
    pub fn with_mesh(mesh: impl Into<Arc<Mesh1D>>) -> Self {
        let mesh = mesh.into();
        let values = NodeValues::with_capacity(mesh.size());
        Self { mesh, values }
    }

    pub(crate) fn from_parts(mesh: Arc<Mesh1D>, values: NodeValues) -> Self {
        Self { mesh, values }
    }

    #[inline]
    pub fn mesh(&self) -> &Arc<Mesh1D> {
        &self.mesh
    }

    #[inline]
    pub fn values(&self) -> &NodeValues {
        &self.values
    }

    /// Set the value at an existing node id.
    pub fn define(&mut self, node_id: usize, value: f64) -> &mut Self {
        self.values.define(node_id, value);
        self
    }

    /// Set the value at coordinate `x`, adding a mesh node there unless one
    /// already sits exactly at `x`. Returns the node id used.
    ///
    /// The mesh is copied first if another field still shares it.
    pub fn define_at(&mut self, x: f64, value: f64) -> Result<i32, MeshError> {
        let existing = self
            .mesh
            .position_at(x)
            .and_then(|pos| self.mesh.at(pos))
            .map(Node1D::id);
        let id = match existing {
            Some(id) => id,
            None => Arc::make_mut(&mut self.mesh).add(Node1D::new(x))?.id(),
        };
        // ids handed out by the mesh are never negative
        self.values.define(id as usize, value);
        Ok(id)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.mesh.size()
    }

    #[inline]
    pub fn range_min(&self) -> f64 {
        self.mesh.range_min()
    }

    #[inline]
    pub fn range_max(&self) -> f64 {
        self.mesh.range_max()
    }

    /// Smallest defined value; NaN before the first definition.
    #[inline]
    pub fn value_min(&self) -> f64 {
        self.values.min()
    }

    /// Largest defined value; NaN before the first definition.
    #[inline]
    pub fn value_max(&self) -> f64 {
        self.values.max()
    }

    /// Field value at `x`. An empty field is 0 everywhere.
    pub fn value(&self, x: f64) -> f64 {
        let cell = self.mesh.locate(&Node1D::new(x));
        if cell.is_empty() {
            return 0.0;
        }
        match self.end_value(&cell) {
            Some(v) => v,
            None => lerp(
                cell.x(0),
                self.values.get(cell.node_id(0)),
                cell.x(1),
                self.values.get(cell.node_id(1)),
                x,
            ),
        }
    }

    /// Slope of the interval containing `x`; 0 outside the range or on a
    /// zero-length interval.
    pub fn derivative(&self, x: f64) -> f64 {
        let cell = self.mesh.locate(&Node1D::new(x));
        if cell.is_outside() {
            return 0.0;
        }
        let dx = cell.x(1) - cell.x(0);
        if dx == 0.0 {
            return 0.0;
        }
        (self.values.get(cell.node_id(1)) - self.values.get(cell.node_id(0))) / dx
    }

    /// For a half-filled (outside) cell, the value of its one node.
    fn end_value(&self, cell: &Cell1D) -> Option<f64> {
        if !cell.is_outside() {
            return None;
        }
        let id = cell.node_ids().into_iter().find(|id| *id >= 0)?;
        Some(self.values.get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Field1D {
        let mut f = Field1D::new();
        f.define_at(1.1, 1.0).unwrap();
        f.define_at(3.3, 2.0).unwrap();
        f.define_at(7.7, 3.0).unwrap();
        f
    }

    #[test]
    fn interpolates_between_defined_points() {
        let f = sample();
        assert!((f.value(2.2) - 1.5).abs() < 1e-12);
        assert!((f.value(5.5) - 2.5).abs() < 1e-12);
        assert_eq!(f.value(7.7), 3.0);
        assert_eq!(f.value(1.1), 1.0);
    }

    #[test]
    fn holds_end_values_outside_range() {
        let f = sample();
        assert_eq!(f.value(0.0), 1.0);
        assert_eq!(f.value(8.8), 3.0);
        assert_eq!(Field1D::new().value(1.0), 0.0);
    }

    #[test]
    fn redefining_same_coordinate_reuses_node() {
        let mut f = sample();
        let id = f.define_at(3.3, 10.0).unwrap();
        assert_eq!(id, 1);
        assert_eq!(f.size(), 3);
        assert_eq!(f.value(3.3), 10.0);
        assert_eq!(f.value_max(), 10.0);
    }

    #[test]
    fn derivative_is_interval_slope() {
        let f = sample();
        assert!((f.derivative(2.0) - 1.0 / 2.2).abs() < 1e-12);
        assert_eq!(f.derivative(-5.0), 0.0);
    }

    #[test]
    fn define_at_copies_shared_mesh() {
        let mesh = Arc::new(Mesh1D::uniform(0.0, 1.0, 2).unwrap());
        let mut a = Field1D::with_mesh(Arc::clone(&mesh));
        a.define_at(0.5, 1.0).unwrap();
        assert_eq!(a.size(), 3);
        assert_eq!(mesh.size(), 2);
    }
}

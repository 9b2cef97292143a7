//! Top-level module for mesh topology.
//!
//! This module provides the meshes fields are defined over:
//! - Node and located-cell value types
//! - [`Mesh1D`], an ordered line mesh with binary-search interval lookup
//! - [`MeshTri2D`], an unstructured triangulation with walking point location
//! - [`MeshRect3D`] and [`MeshPrism3D`], product meshes built from the above
//!
//! Every mesh answers `locate` with a cell; check `is_outside()` on the
//! result before trusting its node ids.

pub mod cache;
pub mod cell;
pub mod mesh1d;
pub mod mesh_prism3d;
pub mod mesh_rect3d;
pub mod mesh_tri2d;
pub mod node;

pub use cache::{IdIndexCache, InvalidateCache};
pub use cell::{Cell1D, CellPrism3D, CellRect3D, CellTri2D};
pub use mesh_prism3d::MeshPrism3D;
pub use mesh_rect3d::MeshRect3D;
pub use mesh_tri2d::{LocateOptions, MeshTri2D, Tri2D};
pub use mesh1d::Mesh1D;
pub use node::{Axis, Node1D, Node2D, Node3D};

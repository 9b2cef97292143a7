//! # mesh-field
//!
//! mesh-field is a small library of meshes, piecewise-linear fields over
//! them, and a versioned binary format for storing both.
//!
//! ## Features
//! - Ordered 1D meshes with binary-search interval location
//! - Unstructured triangular meshes with neighbor discovery and a walking
//!   point locator
//! - Rectilinear and prismatic 3D meshes composed from the above
//! - Linear, barycentric, trilinear, and prismatic field interpolation
//! - A registry of versioned encoders so streams written today stay
//!   readable after a format bump
//!
//! ## Invariant checking
//!
//! Structural invariants (sorted 1D nodes, symmetric triangle adjacency) are
//! checked after each mutation in debug builds. Enable the
//! `strict-invariants` or `check-invariants` feature to keep the checks in
//! release builds as well.
//!
//! ## Example
//!
//! ```
//! use mesh_field::prelude::*;
//! use std::sync::Arc;
//!
//! let mut field = Field1D::new();
//! field.define_at(0.0, 1.0).unwrap();
//! field.define_at(2.0, 3.0).unwrap();
//! assert_eq!(field.value(1.0), 2.0);
//!
//! let mut stream = Serializer::new();
//! stream.add(Arc::new(field.clone()));
//! let bytes = stream.serialize().unwrap();
//!
//! let mut back = Serializer::new();
//! back.deserialize(bytes.bytes()).unwrap();
//! assert_eq!(back.get_as::<Field1D>(0), Some(&field));
//! ```

pub mod data;
pub mod debug_invariants;
pub mod io;
pub mod mesh_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::data::{Field1D, FieldPrism3D, FieldRect3D, FieldTri2D};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::io::{
        ReadPolicy, ResultExt, SerialBuffer, SerialConversion, SerialError, SerialErrorKind,
        Serializable, Serializer,
    };
    pub use crate::mesh_error::MeshError;
    pub use crate::topology::{
        Axis, Cell1D, CellPrism3D, CellRect3D, CellTri2D, LocateOptions, Mesh1D, MeshPrism3D,
        MeshRect3D, MeshTri2D, Node1D, Node2D, Node3D,
    };
}

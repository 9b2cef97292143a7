//! Data module: scalar fields over meshes
//!
//! Each field owns a value table indexed by node id and shares its mesh
//! through an `Arc`, so several fields can sit on one mesh. Queries outside
//! the mesh return a sentinel (NaN by default for 2D and 3D fields) rather
//! than extrapolating.

pub mod field1d;
pub mod field_prism3d;
pub mod field_rect3d;
pub mod field_tri2d;
pub mod interpolate;

pub use field_prism3d::FieldPrism3D;
pub use field_rect3d::FieldRect3D;
pub use field_tri2d::FieldTri2D;
pub use field1d::Field1D;
pub use interpolate::{NodeValues, lerp};

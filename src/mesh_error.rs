//! MeshError: Unified error type for mesh-field construction APIs
//!
//! Queries never fail: they report out-of-domain points through sentinel
//! cells and NaN values. This error type covers the construction paths where
//! a caller handed the mesh something it cannot represent.

use thiserror::Error;

/// Unified error type for mesh and field operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshError {
    /// A uniform axis needs at least two points to span `[x0, x1]`.
    #[error("uniform mesh requires at least 2 points, got {requested}")]
    TooFewPoints { requested: usize },
    /// A triangle referenced a node id that is not in the node table.
    #[error("node id {0} is not defined in this mesh")]
    UnknownNode(i32),
    /// A triangle whose three corners are collinear has no barycentric frame.
    #[error("triangle #{cell} is degenerate (zero area)")]
    DegenerateTriangle { cell: usize },
    /// A coordinate was NaN or infinite.
    #[error("non-finite coordinate {value} on axis {axis}")]
    NonFiniteCoordinate { axis: char, value: f64 },
    /// The id counter cannot move past this id.
    #[error("node id {0} leaves no room for another id")]
    IdOverflow(i32),
    /// The 2D triangular mesh has no z extent.
    #[error("axis {0} is not defined for this mesh")]
    UnsupportedAxis(char),
    /// A structural invariant failed validation.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

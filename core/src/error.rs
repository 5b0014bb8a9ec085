//! Error types for fur generation

use thiserror::Error;

/// Errors raised while validating a base mesh or generating fur.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FurError {
    /// A face is neither a triangle nor a quad.
    #[error("face {face} has {arity} corners; only triangles and quads are supported")]
    UnsupportedArity {
        /// Index of the offending face.
        face: usize,
        /// Number of corners found.
        arity: usize,
    },

    /// Faces of one mesh disagree on arity.
    #[error("face {face} has {found} corners but the mesh is built from {expected}-gons")]
    MixedArity {
        /// Index of the offending face.
        face: usize,
        /// Arity established by the first face.
        expected: usize,
        /// Arity of the offending face.
        found: usize,
    },

    /// Vertex and normal corner lists of a face have different lengths.
    #[error("face has {vertices} vertex corners but {normals} normal corners")]
    CornerCountMismatch {
        /// Vertex corner count.
        vertices: usize,
        /// Normal corner count.
        normals: usize,
    },

    /// A face references a vertex slot that does not exist.
    #[error("face {face} references vertex {index}, mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        /// Index of the offending face.
        face: usize,
        /// The out-of-range vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// Normal array does not line up with the vertex array.
    #[error("mesh has {vertices} vertices but {normals} normals")]
    NormalCountMismatch {
        /// Vertex count.
        vertices: usize,
        /// Normal count.
        normals: usize,
    },

    /// Fur settings fall outside the configured limits.
    #[error("invalid fur settings: {0}")]
    InvalidSettings(String),
}

/// Result type for fur operations.
pub type FurResult<T> = std::result::Result<T, FurError>;

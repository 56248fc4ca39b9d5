//! Error types for ugrid.
//!
//! This module defines all error types used throughout the library.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`UgridError`].
pub type Result<T> = std::result::Result<T, UgridError>;

/// A single structural violation found while validating mesh data.
///
/// Validation collects every violation it finds before reporting, so a
/// caller sees all problems in one pass rather than fixing them one at a
/// time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A face references a node index outside the node array.
    FaceNodeOutOfRange {
        /// The face index.
        face: usize,
        /// The offending node index.
        node: usize,
        /// Number of nodes in the mesh.
        num_nodes: usize,
    },
    /// A face repeats a node index (degenerate triangle).
    DegenerateFace {
        /// The face index.
        face: usize,
    },
    /// An edge references a node index outside the node array.
    EdgeNodeOutOfRange {
        /// The edge index.
        edge: usize,
        /// The offending node index.
        node: usize,
        /// Number of nodes in the mesh.
        num_nodes: usize,
    },
    /// An edge connects a node to itself.
    DegenerateEdge {
        /// The edge index.
        edge: usize,
    },
    /// A boundary segment references a node index outside the node array.
    BoundaryNodeOutOfRange {
        /// Name of the boundary segment.
        boundary: String,
        /// Index of the edge within the segment.
        edge: usize,
        /// The offending node index.
        node: usize,
        /// Number of nodes in the mesh.
        num_nodes: usize,
    },
    /// A boundary edge connects a node to itself.
    DegenerateBoundaryEdge {
        /// Name of the boundary segment.
        boundary: String,
        /// Index of the edge within the segment.
        edge: usize,
    },
    /// A data set's length does not match the entity count at its location.
    DataLengthMismatch {
        /// Name of the data set.
        name: String,
        /// Expected number of values.
        expected: usize,
        /// Actual number of values.
        found: usize,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::FaceNodeOutOfRange { face, node, num_nodes } => {
                write!(f, "face {face} references node {node}, but the mesh has {num_nodes} nodes")
            }
            Violation::DegenerateFace { face } => {
                write!(f, "face {face} is degenerate (repeated node indices)")
            }
            Violation::EdgeNodeOutOfRange { edge, node, num_nodes } => {
                write!(f, "edge {edge} references node {node}, but the mesh has {num_nodes} nodes")
            }
            Violation::DegenerateEdge { edge } => {
                write!(f, "edge {edge} connects a node to itself")
            }
            Violation::BoundaryNodeOutOfRange { boundary, edge, node, num_nodes } => {
                write!(
                    f,
                    "boundary {boundary:?} edge {edge} references node {node}, \
                     but the mesh has {num_nodes} nodes"
                )
            }
            Violation::DegenerateBoundaryEdge { boundary, edge } => {
                write!(f, "boundary {boundary:?} edge {edge} connects a node to itself")
            }
            Violation::DataLengthMismatch { name, expected, found } => {
                write!(f, "data set {name:?} has {found} values, expected {expected}")
            }
        }
    }
}

/// Errors that can occur during mesh and codec operations.
#[derive(Error, Debug)]
pub enum UgridError {
    /// The underlying container could not be opened, read, or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The netCDF library reported a container-level failure.
    #[error("netCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    /// The file does not satisfy the UGRID variable/attribute contract.
    #[error("{} does not conform to the UGRID convention: {message}", path.display())]
    Convention {
        /// The file path.
        path: PathBuf,
        /// Description of the contract violation.
        message: String,
    },

    /// Mesh data violates one or more structural invariants.
    ///
    /// Carries every violation found, not just the first.
    #[error("mesh validation failed with {} violation(s): {}", .0.len(), format_violations(.0))]
    Validation(Vec<Violation>),

    /// Input arrays have inconsistent shapes.
    #[error("shape mismatch in {what}: expected length {expected}, found {found}")]
    Shape {
        /// What was being shaped (e.g. a coordinate column).
        what: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        found: usize,
    },

    /// An operation that requires non-empty data was invoked on an empty mesh.
    #[error("mesh has no nodes")]
    EmptyMesh,

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },
}

impl UgridError {
    /// Create a convention error for the given path.
    pub fn convention(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        UgridError::Convention {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The violations carried by a validation error, if this is one.
    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            UgridError::Validation(v) => Some(v),
            _ => None,
        }
    }
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

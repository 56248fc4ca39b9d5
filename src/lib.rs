//! # ugrid
//!
//! A library for unstructured triangular grids following the UGRID
//! conventions for netCDF files.
//!
//! ugrid provides an in-memory mesh data model — nodes, triangular faces,
//! optional edges and boundaries, plus attached data — and a bidirectional
//! netCDF codec that reads and writes the UGRID conventions layout.
//!
//! ## Features
//!
//! - **Columnar mesh model**: per-axis coordinate arrays and index-triple
//!   faces, matching the on-disk layout one-for-one
//! - **Whole-collection updates**: nodes, faces, and edges are replaced
//!   atomically and cross-validated against everything already attached
//! - **Exhaustive validation**: every structural violation is collected and
//!   reported at once, not just the first
//! - **UGRID netCDF I/O**: reads `start_index` 0 or 1, transposed
//!   connectivity, and data variables; writes are all-or-nothing
//!
//! ## Quick Start
//!
//! ```
//! use ugrid::prelude::*;
//!
//! // Two triangles sharing an edge
//! let mut mesh = Mesh::new();
//! mesh.set_nodes(
//!     vec![0.0, 1.0, 0.0, 1.0],
//!     vec![0.0, 0.0, 1.0, 1.0],
//! ).unwrap();
//! mesh.set_faces(vec![[0, 1, 2], [1, 3, 2]]).unwrap();
//!
//! // Query mesh properties
//! assert_eq!(mesh.num_nodes(), 4);
//! assert_eq!(mesh.num_faces(), 2);
//!
//! // Derive the unique undirected edges
//! assert_eq!(mesh.derive_edges().len(), 5);
//!
//! // Attach per-node data
//! mesh.add_data(
//!     DataSet::new("depth", Location::Node, vec![1.0, 2.0, 1.5, 3.0])
//!         .with_attribute("units", "m"),
//! ).unwrap();
//! ```
//!
//! ## File I/O
//!
//! ```no_run
//! use ugrid::prelude::*;
//!
//! let mesh = ugrid::io::load("grid.nc").unwrap();
//! println!("nodes: {}", mesh.num_nodes());
//! ugrid::io::save(&mesh, "copy.nc").unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use ugrid::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Result, UgridError, Violation};
    pub use crate::mesh::{DataSet, Location, Mesh};
}

// Re-export nalgebra types for convenience
pub use nalgebra;

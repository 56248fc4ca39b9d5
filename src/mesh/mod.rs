//! Core mesh data structures.
//!
//! This module provides the in-memory representation of a UGRID triangular
//! unstructured grid and related types.
//!
//! # Overview
//!
//! The primary type is [`Mesh`], which stores node coordinates as per-axis
//! columns and faces as node-index triples — the same shape the UGRID
//! netCDF layout uses, so the codec maps between the two without
//! reordering anything.
//!
//! # Construction
//!
//! Meshes are built either from file I/O or by replacing whole collections:
//!
//! ```
//! use ugrid::mesh::Mesh;
//!
//! let mut mesh = Mesh::new();
//! mesh.set_nodes(vec![0.0, 1.0, 0.5], vec![0.0, 0.0, 1.0]).unwrap();
//! mesh.set_faces(vec![[0, 1, 2]]).unwrap();
//! ```

mod data;
mod grid;

pub use data::{DataSet, Location};
pub use grid::Mesh;

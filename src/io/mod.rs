//! Mesh file I/O.
//!
//! This module provides functions for loading and saving meshes.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | UGRID netCDF | `.nc`, `.cdf` | ✓ | ✓ | UGRID conventions, 2D triangular topology |
//!
//! # Usage
//!
//! The easiest way to load and save meshes is using the automatic format detection:
//!
//! ```no_run
//! use ugrid::io::{load, save};
//!
//! // Load with automatic format detection
//! let mesh = load("grid.nc").unwrap();
//!
//! // Save with automatic format detection
//! save(&mesh, "output.nc").unwrap();
//! ```
//!
//! You can also use format-specific functions:
//!
//! ```no_run
//! use ugrid::io::ugrid;
//!
//! let mesh = ugrid::load("grid.nc").unwrap();
//! ugrid::save(&mesh, "output.nc").unwrap();
//! ```

pub mod ugrid;

use std::path::Path;

use crate::error::{Result, UgridError};
use crate::mesh::Mesh;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// UGRID conventions netCDF format.
    Ugrid,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "nc" | "cdf" => Some(Format::Ugrid),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

/// Load a mesh from a file with automatic format detection.
///
/// The format is determined by the file extension.
///
/// # Example
///
/// ```no_run
/// use ugrid::io::load;
///
/// let mesh = load("grid.nc").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    let format = Format::from_path(path).ok_or_else(|| UgridError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })?;

    match format {
        Format::Ugrid => ugrid::load(path),
    }
}

/// Save a mesh to a file with automatic format detection.
///
/// The format is determined by the file extension. The mesh is validated
/// before anything is written.
///
/// # Example
///
/// ```no_run
/// use ugrid::io::save;
/// use ugrid::mesh::Mesh;
///
/// let mut mesh = Mesh::new();
/// mesh.set_nodes(vec![0.0, 1.0, 0.5], vec![0.0, 0.0, 1.0]).unwrap();
/// mesh.set_faces(vec![[0, 1, 2]]).unwrap();
/// save(&mesh, "output.nc").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let format = Format::from_path(path).ok_or_else(|| UgridError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })?;

    match format {
        Format::Ugrid => ugrid::save(mesh, path),
    }
}

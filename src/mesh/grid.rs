//! The triangular unstructured-grid data model.
//!
//! A [`Mesh`] stores node coordinates as per-axis columns (mirroring the
//! on-disk UGRID layout), face-node connectivity as index triples, and the
//! optional pieces the convention allows: edges, named boundary segments,
//! free-form metadata, and data sets attached to nodes, edges, or faces.
//!
//! # Invariants
//!
//! - Every face references three distinct, in-range node indices.
//! - Node and face identifiers are their positions and stay stable for the
//!   lifetime of the mesh. Collections are replaced wholesale; a replacement
//!   that would orphan existing references is rejected.
//! - Derived edges always reflect the current faces: the cache is cleared
//!   whenever the faces are replaced.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};

use nalgebra::{Point2, Point3};

use super::data::{DataSet, Location};
use crate::error::{Result, UgridError, Violation};

/// A triangular unstructured grid.
///
/// # Example
///
/// ```
/// use ugrid::mesh::Mesh;
///
/// let mut mesh = Mesh::new();
/// mesh.set_nodes(vec![0.0, 1.0, 0.0, 1.0], vec![0.0, 0.0, 1.0, 1.0]).unwrap();
/// mesh.set_faces(vec![[0, 1, 2], [1, 3, 2]]).unwrap();
///
/// assert_eq!(mesh.num_nodes(), 4);
/// assert_eq!(mesh.num_faces(), 2);
/// // Two triangles sharing an edge have 5 unique edges, not 6.
/// assert_eq!(mesh.derive_edges().len(), 5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Node x coordinates (longitude for geographic meshes).
    x: Vec<f64>,
    /// Node y coordinates (latitude for geographic meshes).
    y: Vec<f64>,
    /// Optional node z coordinates for 3D meshes.
    z: Option<Vec<f64>>,
    /// Face-node connectivity, one triple of node indices per triangle.
    faces: Vec<[usize; 3]>,
    /// Explicitly supplied edges, if any.
    edges: Option<Vec<[usize; 2]>>,
    /// Cache of edges derived from `faces`. Cleared by `set_faces`.
    derived_edges: Option<Vec<[usize; 2]>>,
    /// Cache of face adjacency derived from `faces`. Cleared by `set_faces`.
    face_neighbors: Option<Vec<[Option<usize>; 3]>>,
    /// Named boundary segments, each a list of node-index pairs.
    boundaries: BTreeMap<String, Vec<[usize; 2]>>,
    /// Free-form string metadata (units, CRS description, convention tag).
    metadata: BTreeMap<String, String>,
    /// Data sets keyed by name.
    data: BTreeMap<String, DataSet>,
}

impl Mesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Accessors ====================

    /// Number of nodes.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.x.len()
    }

    /// Number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Number of edges (supplied or derived), zero if neither exists yet.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges().map_or(0, <[_]>::len)
    }

    /// Whether the mesh has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Coordinate dimension: 2, or 3 when z coordinates are present.
    #[inline]
    pub fn dim(&self) -> usize {
        if self.z.is_some() { 3 } else { 2 }
    }

    /// Node x coordinates.
    #[inline]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Node y coordinates.
    #[inline]
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Node z coordinates, if this is a 3D mesh.
    #[inline]
    pub fn z(&self) -> Option<&[f64]> {
        self.z.as_deref()
    }

    /// Face-node connectivity.
    #[inline]
    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    /// The position of a node. For 2D meshes the z component is zero.
    ///
    /// # Panics
    /// Panics if `i` is out of range.
    #[inline]
    pub fn node(&self, i: usize) -> Point3<f64> {
        let z = self.z.as_ref().map_or(0.0, |z| z[i]);
        Point3::new(self.x[i], self.y[i], z)
    }

    /// Edges: explicitly supplied ones if present, otherwise the derived
    /// cache if it is warm. Returns `None` when neither exists; call
    /// [`Mesh::derive_edges`] to compute them.
    pub fn edges(&self) -> Option<&[[usize; 2]]> {
        self.edges.as_deref().or(self.derived_edges.as_deref())
    }

    /// Only the edges supplied explicitly via [`Mesh::set_edges`], never the
    /// derived cache. This is what the codec persists; derived edges are
    /// recomputable and are not written to disk unless supplied.
    pub fn supplied_edges(&self) -> Option<&[[usize; 2]]> {
        self.edges.as_deref()
    }

    /// Named boundary segments.
    pub fn boundaries(&self) -> &BTreeMap<String, Vec<[usize; 2]>> {
        &self.boundaries
    }

    /// Free-form metadata.
    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Mutable access to the metadata mapping.
    pub fn metadata_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.metadata
    }

    /// Data sets keyed by name.
    pub fn data(&self) -> &BTreeMap<String, DataSet> {
        &self.data
    }

    // ==================== Mutation ====================

    /// Replace the node coordinates of a 2D mesh.
    ///
    /// Fails with [`UgridError::Shape`] if the columns have different
    /// lengths, and with [`UgridError::Validation`] if existing faces,
    /// edges, boundaries, or node data would be orphaned by the new node
    /// count. On failure the mesh is left unmodified.
    pub fn set_nodes(&mut self, x: Vec<f64>, y: Vec<f64>) -> Result<()> {
        self.replace_nodes(x, y, None)
    }

    /// Replace the node coordinates of a 3D mesh.
    ///
    /// Same failure modes as [`Mesh::set_nodes`]; additionally the z column
    /// must match the x column's length.
    pub fn set_nodes_3d(&mut self, x: Vec<f64>, y: Vec<f64>, z: Vec<f64>) -> Result<()> {
        self.replace_nodes(x, y, Some(z))
    }

    fn replace_nodes(&mut self, x: Vec<f64>, y: Vec<f64>, z: Option<Vec<f64>>) -> Result<()> {
        if y.len() != x.len() {
            return Err(UgridError::Shape {
                what: "node y coordinates",
                expected: x.len(),
                found: y.len(),
            });
        }
        if let Some(z) = &z {
            if z.len() != x.len() {
                return Err(UgridError::Shape {
                    what: "node z coordinates",
                    expected: x.len(),
                    found: z.len(),
                });
            }
        }

        let num_nodes = x.len();
        let mut violations = check_faces(&self.faces, num_nodes);
        if let Some(edges) = &self.edges {
            violations.extend(check_edges(edges, num_nodes));
        }
        for (name, edges) in &self.boundaries {
            violations.extend(check_boundary(name, edges, num_nodes));
        }
        violations.extend(self.check_data_lengths(Location::Node, num_nodes));
        if !violations.is_empty() {
            return Err(UgridError::Validation(violations));
        }

        self.x = x;
        self.y = y;
        self.z = z;
        Ok(())
    }

    /// Replace the face-node connectivity.
    ///
    /// Every triple must reference three distinct, in-range node indices.
    /// All violations are collected into a single
    /// [`UgridError::Validation`]; on failure the mesh is left unmodified.
    /// Invalidates the derived-edge cache.
    pub fn set_faces(&mut self, faces: Vec<[usize; 3]>) -> Result<()> {
        let mut violations = check_faces(&faces, self.num_nodes());
        violations.extend(self.check_data_lengths(Location::Face, faces.len()));
        if !violations.is_empty() {
            return Err(UgridError::Validation(violations));
        }

        self.faces = faces;
        self.derived_edges = None;
        self.face_neighbors = None;
        Ok(())
    }

    /// Supply the edge list explicitly instead of deriving it from faces.
    ///
    /// Each pair must reference two distinct, in-range node indices; all
    /// violations are collected before reporting.
    pub fn set_edges(&mut self, edges: Vec<[usize; 2]>) -> Result<()> {
        let mut violations = check_edges(&edges, self.num_nodes());
        violations.extend(self.check_data_lengths(Location::Edge, edges.len()));
        if !violations.is_empty() {
            return Err(UgridError::Validation(violations));
        }

        self.edges = Some(edges);
        Ok(())
    }

    /// Add a named boundary segment: a list of node-index pairs tagging a
    /// stretch of the domain boundary.
    pub fn add_boundary(&mut self, name: impl Into<String>, edges: Vec<[usize; 2]>) -> Result<()> {
        let name = name.into();
        let violations = check_boundary(&name, &edges, self.num_nodes());
        if !violations.is_empty() {
            return Err(UgridError::Validation(violations));
        }

        self.boundaries.insert(name, edges);
        Ok(())
    }

    /// Attach a data set to the mesh.
    ///
    /// The value count must match the number of entities at the data set's
    /// location.
    pub fn add_data(&mut self, data: DataSet) -> Result<()> {
        let expected = match data.location {
            Location::Node => self.num_nodes(),
            Location::Edge => self.num_edges(),
            Location::Face => self.num_faces(),
        };
        if data.values.len() != expected {
            return Err(UgridError::Validation(vec![Violation::DataLengthMismatch {
                name: data.name.clone(),
                expected,
                found: data.values.len(),
            }]));
        }

        self.data.insert(data.name.clone(), data);
        Ok(())
    }

    // ==================== Derived data ====================

    /// The unique undirected edges implied by the faces.
    ///
    /// Each triangle contributes three edges; an edge shared between two
    /// adjacent triangles appears once. The result is deterministic for a
    /// fixed face order: edges appear in first-occurrence order, each
    /// stored with its smaller node index first. The computation is
    /// memoized; [`Mesh::set_faces`] clears the cache.
    pub fn derive_edges(&mut self) -> &[[usize; 2]] {
        if self.derived_edges.is_none() {
            self.derived_edges = Some(unique_edges(&self.faces));
        }
        self.derived_edges.as_deref().unwrap_or(&[])
    }

    /// The neighbor of each face across each of its three edges.
    ///
    /// Entry `i` of a face's triple is the face sharing the edge from its
    /// node `i` to node `i + 1` (wrapping), or `None` on the mesh boundary.
    /// Memoized like [`Mesh::derive_edges`]; [`Mesh::set_faces`] clears the
    /// cache.
    pub fn derive_face_neighbors(&mut self) -> &[[Option<usize>; 3]] {
        if self.face_neighbors.is_none() {
            self.face_neighbors = Some(face_neighbors(&self.faces));
        }
        self.face_neighbors.as_deref().unwrap_or(&[])
    }

    /// The face containing the given x/y point, by linear search.
    ///
    /// Points on an edge or node count as inside; a point shared by two
    /// faces reports the lower face index. Returns `None` when the point
    /// lies outside every face. The z coordinate of 3D meshes is ignored.
    pub fn locate_face(&self, point: Point2<f64>) -> Option<usize> {
        self.faces.iter().position(|face| {
            let a = self.node_2d(face[0]);
            let b = self.node_2d(face[1]);
            let c = self.node_2d(face[2]);
            point_in_triangle(point, a, b, c)
        })
    }

    #[inline]
    fn node_2d(&self, i: usize) -> Point2<f64> {
        Point2::new(self.x[i], self.y[i])
    }

    /// The axis-aligned bounding box over all nodes, as `(min, max)`.
    ///
    /// For 2D meshes the z components are zero. Fails with
    /// [`UgridError::EmptyMesh`] if the mesh has no nodes.
    pub fn bounding_box(&self) -> Result<(Point3<f64>, Point3<f64>)> {
        if self.is_empty() {
            return Err(UgridError::EmptyMesh);
        }

        let (x_min, x_max) = min_max(&self.x);
        let (y_min, y_max) = min_max(&self.y);
        let (z_min, z_max) = match &self.z {
            Some(z) => min_max(z),
            None => (0.0, 0.0),
        };

        Ok((
            Point3::new(x_min, y_min, z_min),
            Point3::new(x_max, y_max, z_max),
        ))
    }

    // ==================== Validation ====================

    /// Re-check every structural invariant, collecting all violations.
    ///
    /// The setters already enforce the invariants, so a mesh built through
    /// them is always valid; the codec still runs this before writing so a
    /// non-conformant mesh can never reach the file.
    pub fn validate(&self) -> Result<()> {
        let num_nodes = self.num_nodes();
        let mut violations = check_faces(&self.faces, num_nodes);
        if let Some(edges) = &self.edges {
            violations.extend(check_edges(edges, num_nodes));
        }
        for (name, edges) in &self.boundaries {
            violations.extend(check_boundary(name, edges, num_nodes));
        }
        for data in self.data.values() {
            let expected = match data.location {
                Location::Node => num_nodes,
                Location::Edge => self.num_edges(),
                Location::Face => self.num_faces(),
            };
            if data.values.len() != expected {
                violations.push(Violation::DataLengthMismatch {
                    name: data.name.clone(),
                    expected,
                    found: data.values.len(),
                });
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(UgridError::Validation(violations))
        }
    }

    fn check_data_lengths(&self, location: Location, count: usize) -> Vec<Violation> {
        self.data
            .values()
            .filter(|d| d.location == location && d.values.len() != count)
            .map(|d| Violation::DataLengthMismatch {
                name: d.name.clone(),
                expected: count,
                found: d.values.len(),
            })
            .collect()
    }
}

/// Equality ignores the derived caches: two meshes with the same structure
/// are equal whether or not their edges or face adjacency have been
/// derived yet.
impl PartialEq for Mesh {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x
            && self.y == other.y
            && self.z == other.z
            && self.faces == other.faces
            && self.edges == other.edges
            && self.boundaries == other.boundaries
            && self.metadata == other.metadata
            && self.data == other.data
    }
}

fn check_faces(faces: &[[usize; 3]], num_nodes: usize) -> Vec<Violation> {
    let mut violations = Vec::new();
    for (fi, face) in faces.iter().enumerate() {
        for &node in face {
            if node >= num_nodes {
                violations.push(Violation::FaceNodeOutOfRange { face: fi, node, num_nodes });
            }
        }
        if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
            violations.push(Violation::DegenerateFace { face: fi });
        }
    }
    violations
}

fn check_edges(edges: &[[usize; 2]], num_nodes: usize) -> Vec<Violation> {
    let mut violations = Vec::new();
    for (ei, edge) in edges.iter().enumerate() {
        for &node in edge {
            if node >= num_nodes {
                violations.push(Violation::EdgeNodeOutOfRange { edge: ei, node, num_nodes });
            }
        }
        if edge[0] == edge[1] {
            violations.push(Violation::DegenerateEdge { edge: ei });
        }
    }
    violations
}

fn check_boundary(name: &str, edges: &[[usize; 2]], num_nodes: usize) -> Vec<Violation> {
    let mut violations = Vec::new();
    for (ei, edge) in edges.iter().enumerate() {
        for &node in edge {
            if node >= num_nodes {
                violations.push(Violation::BoundaryNodeOutOfRange {
                    boundary: name.to_string(),
                    edge: ei,
                    node,
                    num_nodes,
                });
            }
        }
        if edge[0] == edge[1] {
            violations.push(Violation::DegenerateBoundaryEdge {
                boundary: name.to_string(),
                edge: ei,
            });
        }
    }
    violations
}

fn unique_edges(faces: &[[usize; 3]]) -> Vec<[usize; 2]> {
    let mut seen = HashSet::with_capacity(faces.len() * 3 / 2 + 1);
    let mut edges = Vec::new();
    for face in faces {
        for (a, b) in [(face[0], face[1]), (face[1], face[2]), (face[2], face[0])] {
            let edge = if a < b { [a, b] } else { [b, a] };
            if seen.insert(edge) {
                edges.push(edge);
            }
        }
    }
    edges
}

fn face_neighbors(faces: &[[usize; 3]]) -> Vec<[Option<usize>; 3]> {
    let mut neighbors = vec![[None; 3]; faces.len()];
    // Each undirected edge is shared by at most two faces; remember the
    // first face (and which of its edges this was) until the second shows up.
    let mut seen: HashMap<[usize; 2], (usize, usize)> =
        HashMap::with_capacity(faces.len() * 3 / 2 + 1);
    for (fi, face) in faces.iter().enumerate() {
        for slot in 0..3 {
            let (a, b) = (face[slot], face[(slot + 1) % 3]);
            let edge = if a < b { [a, b] } else { [b, a] };
            match seen.entry(edge) {
                Entry::Occupied(entry) => {
                    let (other, other_slot) = *entry.get();
                    neighbors[fi][slot] = Some(other);
                    neighbors[other][other_slot] = Some(fi);
                }
                Entry::Vacant(entry) => {
                    entry.insert((fi, slot));
                }
            }
        }
    }
    neighbors
}

fn point_in_triangle(p: Point2<f64>, a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> bool {
    let d1 = edge_side(p, a, b);
    let d2 = edge_side(p, b, c);
    let d3 = edge_side(p, c, a);
    // Inside (or on an edge) iff the point is not strictly on both sides.
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Signed area of the triangle (v0, v1, p); the sign says which side of
/// the directed edge v0 -> v1 the point lies on.
#[inline]
fn edge_side(p: Point2<f64>, v0: Point2<f64>, v1: Point2<f64>) -> f64 {
    (v1.x - v0.x) * (p.y - v0.y) - (p.x - v0.x) * (v1.y - v0.y)
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Violation;

    fn two_triangles() -> Mesh {
        // Two triangles sharing the edge (1, 2)
        let mut mesh = Mesh::new();
        mesh.set_nodes(vec![0.0, 1.0, 0.0, 1.0], vec![0.0, 0.0, 1.0, 1.0])
            .unwrap();
        mesh.set_faces(vec![[0, 1, 2], [1, 3, 2]]).unwrap();
        mesh
    }

    #[test]
    fn set_nodes_rejects_mismatched_columns() {
        let mut mesh = Mesh::new();
        let err = mesh.set_nodes(vec![0.0, 1.0], vec![0.0]).unwrap_err();
        assert!(matches!(err, UgridError::Shape { expected: 2, found: 1, .. }));
        assert!(mesh.is_empty());
    }

    #[test]
    fn set_nodes_3d_rejects_short_z_column() {
        let mut mesh = Mesh::new();
        let err = mesh
            .set_nodes_3d(vec![0.0, 1.0], vec![0.0, 1.0], vec![0.0])
            .unwrap_err();
        assert!(matches!(err, UgridError::Shape { expected: 2, found: 1, .. }));
    }

    #[test]
    fn set_faces_collects_every_violation() {
        let mut mesh = Mesh::new();
        mesh.set_nodes(vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]).unwrap();

        // Three bad triples: one out of range, one degenerate, one both.
        let err = mesh
            .set_faces(vec![[0, 1, 5], [0, 0, 2], [7, 7, 1], [0, 1, 2]])
            .unwrap_err();

        let violations = err.violations().unwrap();
        assert!(violations.contains(&Violation::FaceNodeOutOfRange { face: 0, node: 5, num_nodes: 3 }));
        assert!(violations.contains(&Violation::DegenerateFace { face: 1 }));
        assert!(violations.contains(&Violation::DegenerateFace { face: 2 }));
        assert!(violations
            .iter()
            .any(|v| matches!(v, Violation::FaceNodeOutOfRange { face: 2, node: 7, .. })));
        // The one valid face must not be reported.
        assert!(!violations.iter().any(|v| matches!(
            v,
            Violation::FaceNodeOutOfRange { face: 3, .. } | Violation::DegenerateFace { face: 3 }
        )));

        // Failed replacement leaves the mesh unmodified.
        assert_eq!(mesh.num_faces(), 0);
    }

    #[test]
    fn shrinking_node_replacement_is_rejected() {
        let mut mesh = two_triangles();
        let err = mesh.set_nodes(vec![0.0, 1.0], vec![0.0, 0.0]).unwrap_err();
        assert!(err.violations().is_some());
        // Mesh untouched by the rejected replacement.
        assert_eq!(mesh.num_nodes(), 4);
        assert_eq!(mesh.num_faces(), 2);
    }

    #[test]
    fn two_shared_triangles_have_five_edges() {
        let mut mesh = two_triangles();
        let edges = mesh.derive_edges();
        assert_eq!(edges.len(), 5);
        // Canonical orientation: smaller index first.
        for edge in edges {
            assert!(edge[0] < edge[1]);
        }
        // Deterministic first-occurrence order over faces.
        assert_eq!(edges[0], [0, 1]);
        assert_eq!(edges[1], [1, 2]);
        assert_eq!(edges[2], [0, 2]);
    }

    #[test]
    fn derived_edges_are_invalidated_by_set_faces() {
        let mut mesh = two_triangles();
        assert_eq!(mesh.derive_edges().len(), 5);

        mesh.set_faces(vec![[0, 1, 2]]).unwrap();
        assert!(mesh.edges().is_none());
        assert_eq!(mesh.derive_edges().len(), 3);
    }

    #[test]
    fn supplied_edges_take_precedence() {
        let mut mesh = two_triangles();
        mesh.set_edges(vec![[0, 1], [1, 3]]).unwrap();
        assert_eq!(mesh.num_edges(), 2);
        assert_eq!(mesh.edges().unwrap(), &[[0, 1], [1, 3]]);
    }

    #[test]
    fn set_edges_collects_violations() {
        let mut mesh = two_triangles();
        let err = mesh.set_edges(vec![[0, 9], [2, 2]]).unwrap_err();
        let violations = err.violations().unwrap();
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn face_neighbors_pair_across_the_shared_edge() {
        let mut mesh = two_triangles();
        let neighbors = mesh.derive_face_neighbors();

        // Face 0's edge (1, 2) is slot 1; face 1 shares it via its edge
        // (2, 1), slot 2. Every other edge is on the boundary.
        assert_eq!(neighbors[0], [None, Some(1), None]);
        assert_eq!(neighbors[1], [None, None, Some(0)]);
    }

    #[test]
    fn face_neighbors_are_invalidated_by_set_faces() {
        let mut mesh = two_triangles();
        assert_eq!(mesh.derive_face_neighbors().len(), 2);

        mesh.set_faces(vec![[0, 1, 2]]).unwrap();
        assert_eq!(mesh.derive_face_neighbors(), &[[None, None, None]]);
    }

    #[test]
    fn locate_face_finds_the_containing_triangle() {
        let mesh = two_triangles();

        assert_eq!(mesh.locate_face(Point2::new(0.25, 0.25)), Some(0));
        assert_eq!(mesh.locate_face(Point2::new(0.75, 0.75)), Some(1));
        assert_eq!(mesh.locate_face(Point2::new(2.0, 2.0)), None);
        assert_eq!(mesh.locate_face(Point2::new(-0.1, 0.0)), None);

        // A point on the shared edge belongs to the lower face index.
        assert_eq!(mesh.locate_face(Point2::new(0.5, 0.5)), Some(0));
        // A node counts as inside.
        assert_eq!(mesh.locate_face(Point2::new(0.0, 0.0)), Some(0));
    }

    #[test]
    fn locate_face_on_empty_mesh_finds_nothing() {
        let mesh = Mesh::new();
        assert_eq!(mesh.locate_face(Point2::new(0.0, 0.0)), None);
    }

    #[test]
    fn bounding_box_of_empty_mesh_fails() {
        let mesh = Mesh::new();
        assert!(matches!(mesh.bounding_box(), Err(UgridError::EmptyMesh)));
    }

    #[test]
    fn bounding_box_spans_all_nodes() {
        let mesh = two_triangles();
        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn bounding_box_includes_z_for_3d_meshes() {
        let mut mesh = Mesh::new();
        mesh.set_nodes_3d(
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![-2.0, 3.0, 0.5],
        )
        .unwrap();
        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min.z, -2.0);
        assert_eq!(max.z, 3.0);
        assert_eq!(mesh.dim(), 3);
    }

    #[test]
    fn add_data_checks_entity_counts() {
        let mut mesh = two_triangles();

        mesh.add_data(DataSet::new("depth", Location::Node, vec![1.0; 4]))
            .unwrap();
        mesh.add_data(DataSet::new("area", Location::Face, vec![0.5, 0.5]))
            .unwrap();

        let err = mesh
            .add_data(DataSet::new("bad", Location::Node, vec![1.0; 3]))
            .unwrap_err();
        assert_eq!(
            err.violations().unwrap(),
            &[Violation::DataLengthMismatch {
                name: "bad".to_string(),
                expected: 4,
                found: 3
            }]
        );
    }

    #[test]
    fn boundary_segments_are_validated() {
        let mut mesh = two_triangles();
        mesh.add_boundary("coast", vec![[0, 1], [1, 3]]).unwrap();
        assert_eq!(mesh.boundaries().len(), 1);

        let err = mesh.add_boundary("open", vec![[0, 42]]).unwrap_err();
        assert!(matches!(
            err.violations().unwrap()[0],
            Violation::BoundaryNodeOutOfRange { node: 42, .. }
        ));
    }

    #[test]
    fn degenerate_boundary_edges_are_rejected() {
        let mut mesh = two_triangles();
        let err = mesh.add_boundary("coast", vec![[0, 1], [2, 2]]).unwrap_err();
        assert_eq!(
            err.violations().unwrap(),
            &[Violation::DegenerateBoundaryEdge { boundary: "coast".to_string(), edge: 1 }]
        );
        assert!(mesh.boundaries().is_empty());
    }

    #[test]
    fn equality_ignores_the_edge_cache() {
        let mut a = two_triangles();
        let b = two_triangles();
        a.derive_edges();
        assert_eq!(a, b);
    }
}

//! UGRID netCDF codec.
//!
//! This module maps between the in-memory [`Mesh`] and the UGRID
//! conventions netCDF layout: a topology anchor variable tagged
//! `cf_role = "mesh_topology"` whose attributes name the coordinate and
//! connectivity variables that together define the mesh.
//!
//! # Reading
//!
//! [`load`] locates the single topology variable (a file with none or more
//! than one is rejected, never guessed at), resolves the variables named by
//! its `node_coordinates` and `face_node_connectivity` attributes, and
//! populates a validated [`Mesh`]. Connectivity is normalized to 0-based
//! indices regardless of the file's `start_index`. Optional pieces — edge
//! and boundary connectivity, and data variables tagged with `mesh` and
//! `location` attributes — are loaded when present.
//!
//! # Writing
//!
//! [`save`] validates the mesh first and writes to a temporary sibling
//! file, renaming it over the destination only on success. A failure
//! partway through leaves no partial output and never touches an existing
//! destination file. Connectivity is always written 0-based with an
//! explicit `start_index = 0`.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::{Result, UgridError};
use crate::mesh::{DataSet, Location, Mesh};

/// Name of the topology anchor variable written by [`save`].
pub const TOPOLOGY_VAR: &str = "mesh";
/// Name of the face-node connectivity variable written by [`save`].
pub const FACE_NODES_VAR: &str = "mesh_face_nodes";
/// Name of the edge-node connectivity variable written by [`save`].
pub const EDGE_NODES_VAR: &str = "mesh_edge_nodes";
/// Name of the boundary-node connectivity variable written by [`save`].
pub const BOUNDARY_NODES_VAR: &str = "mesh_boundary_nodes";

const NODE_LON_VAR: &str = "node_lon";
const NODE_LAT_VAR: &str = "node_lat";
const NODE_Z_VAR: &str = "node_z";

/// Boundary segments lose their names on disk (UGRID has a single
/// `boundary_node_connectivity` variable); they reload under this name.
pub const BOUNDARY_NAME: &str = "boundary";

/// Topology-variable attributes with structural meaning. Everything else
/// on the topology variable round-trips through [`Mesh::metadata`].
const RESERVED_ATTRS: &[&str] = &[
    "cf_role",
    "topology_dimension",
    "node_coordinates",
    "face_node_connectivity",
    "edge_node_connectivity",
    "boundary_node_connectivity",
    "face_face_connectivity",
    "face_edge_connectivity",
    "face_coordinates",
    "edge_coordinates",
    "boundary_coordinates",
];

// ============================================================================
// Read path
// ============================================================================

/// Load a mesh from a UGRID netCDF file.
///
/// # Example
///
/// ```no_run
/// use ugrid::io::ugrid;
///
/// let mesh = ugrid::load("grid.nc").unwrap();
/// println!("{} nodes, {} faces", mesh.num_nodes(), mesh.num_faces());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    let file = netcdf::open(path)?;

    let topo_name = find_topology_variable(path, &file)?;
    let topo = file
        .variable(&topo_name)
        .ok_or_else(|| UgridError::convention(path, format!("variable {topo_name:?} vanished")))?;
    debug!("loading mesh from topology variable {topo_name:?} in {}", path.display());

    match attr_i64(&topo, "topology_dimension") {
        Some(2) => {}
        Some(d) => {
            return Err(UgridError::convention(
                path,
                format!("topology variable {topo_name:?} has topology_dimension {d}, only 2 is supported"),
            ));
        }
        None => {
            return Err(UgridError::convention(
                path,
                format!("topology variable {topo_name:?} is missing the topology_dimension attribute"),
            ));
        }
    }

    let (x, y, z, coord_names) = read_node_coordinates(path, &file, &topo_name)?;

    let face_var = require_attr(path, &topo, &topo_name, "face_node_connectivity")?;
    let faces = read_connectivity::<3>(path, &file, &face_var)?;

    let edge_var = attr_string(&topo, "edge_node_connectivity");
    let boundary_var = attr_string(&topo, "boundary_node_connectivity");

    let mut mesh = Mesh::new();
    match z {
        Some(z) => mesh.set_nodes_3d(x, y, z)?,
        None => mesh.set_nodes(x, y)?,
    }
    mesh.set_faces(faces)?;

    if let Some(name) = &edge_var {
        mesh.set_edges(read_connectivity::<2>(path, &file, name)?)?;
    }
    if let Some(name) = &boundary_var {
        mesh.add_boundary(BOUNDARY_NAME, read_connectivity::<2>(path, &file, name)?)?;
    }

    // Non-structural topology attributes become mesh metadata.
    for attr in topo.attributes() {
        if RESERVED_ATTRS.contains(&attr.name()) {
            continue;
        }
        if let Ok(netcdf::AttributeValue::Str(value)) = attr.value() {
            mesh.metadata_mut().insert(attr.name().to_string(), value);
        }
    }

    // Data variables advertise themselves with `mesh` and `location`.
    let mut structural: Vec<String> = vec![topo_name.clone(), face_var];
    structural.extend(coord_names);
    structural.extend(edge_var);
    structural.extend(boundary_var);

    let data_names: Vec<String> = file
        .variables()
        .map(|v| v.name())
        .filter(|name| !structural.contains(name))
        .collect();
    for name in data_names {
        if let Some(data) = read_data_variable(path, &file, &name, &topo_name)? {
            mesh.add_data(data)?;
        }
    }

    debug!(
        "loaded {} nodes, {} faces, {} data set(s)",
        mesh.num_nodes(),
        mesh.num_faces(),
        mesh.data().len()
    );
    Ok(mesh)
}

/// Find the unique variable tagged `cf_role = "mesh_topology"`.
///
/// Zero such variables means the file is not a UGRID file; more than one
/// is ambiguous and rejected rather than guessed at.
fn find_topology_variable(path: &Path, file: &netcdf::File) -> Result<String> {
    let candidates: Vec<String> = file
        .variables()
        .filter(|var| {
            attr_string(var, "cf_role").as_deref().map(str::trim) == Some("mesh_topology")
        })
        .map(|var| var.name())
        .collect();

    match candidates.len() {
        0 => Err(UgridError::convention(
            path,
            "no variable with cf_role = \"mesh_topology\" found",
        )),
        1 => Ok(candidates.into_iter().next().unwrap_or_default()),
        _ => Err(UgridError::convention(
            path,
            format!(
                "more than one mesh topology variable found ({}), refusing to pick one",
                candidates.join(", ")
            ),
        )),
    }
}

type NodeColumns = (Vec<f64>, Vec<f64>, Option<Vec<f64>>, Vec<String>);

/// Read the coordinate variables named by `node_coordinates`.
///
/// Axis assignment honors `standard_name = "longitude"/"latitude"` where
/// present (how geographic meshes are usually labeled); otherwise the
/// attribute's name order is taken as x, y(, z).
fn read_node_coordinates(path: &Path, file: &netcdf::File, topo_name: &str) -> Result<NodeColumns> {
    let topo = file
        .variable(topo_name)
        .ok_or_else(|| UgridError::convention(path, format!("variable {topo_name:?} vanished")))?;
    let attr = require_attr(path, &topo, topo_name, "node_coordinates")?;
    let names: Vec<&str> = attr.split_whitespace().collect();
    if names.len() < 2 || names.len() > 3 {
        return Err(UgridError::convention(
            path,
            format!(
                "node_coordinates must name 2 or 3 variables, found {} ({attr:?})",
                names.len()
            ),
        ));
    }

    let mut x = None;
    let mut y = None;
    let mut rest = Vec::new();
    for name in &names {
        let var = file.variable(name).ok_or_else(|| {
            UgridError::convention(
                path,
                format!("node_coordinates references variable {name:?}, which does not exist"),
            )
        })?;
        if var.dimensions().len() != 1 {
            return Err(UgridError::convention(
                path,
                format!("coordinate variable {name:?} is not one-dimensional"),
            ));
        }
        let standard_name = attr_string(&var, "standard_name");
        if standard_name.is_none() && attr_string(&var, "units").is_none() {
            return Err(UgridError::convention(
                path,
                format!("coordinate variable {name:?} carries neither standard_name nor units"),
            ));
        }

        let values: Vec<f64> = var.get_values(..)?;
        match standard_name.as_deref() {
            Some("longitude") if x.is_none() => x = Some(values),
            Some("latitude") if y.is_none() => y = Some(values),
            _ => rest.push(values),
        }
    }

    let mut rest = rest.into_iter();
    let x = match x {
        Some(v) => v,
        None => rest.next().ok_or_else(|| {
            UgridError::convention(path, "could not determine the x coordinate variable")
        })?,
    };
    let y = match y {
        Some(v) => v,
        None => rest.next().ok_or_else(|| {
            UgridError::convention(path, "could not determine the y coordinate variable")
        })?,
    };
    let z = rest.next();

    Ok((x, y, z, names.iter().map(|s| s.to_string()).collect()))
}

/// Read a connectivity variable of `W` node indices per row, normalizing
/// to 0-based indices per the variable's `start_index` attribute.
///
/// Accepts arrays stored `(n, W)` or, as some producers do, transposed
/// `(W, n)`; a square `W x W` array is taken at face value.
fn read_connectivity<const W: usize>(
    path: &Path,
    file: &netcdf::File,
    name: &str,
) -> Result<Vec<[usize; W]>> {
    let var = file.variable(name).ok_or_else(|| {
        UgridError::convention(
            path,
            format!("topology references connectivity variable {name:?}, which does not exist"),
        )
    })?;

    let dims: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
    let (rows, transposed) = match dims.as_slice() {
        [n, w] if *w == W => (*n, false),
        [w, n] if *w == W => (*n, true),
        _ => {
            return Err(UgridError::convention(
                path,
                format!("connectivity variable {name:?} has shape {dims:?}, expected (n, {W})"),
            ));
        }
    };

    let start_index = attr_i64(&var, "start_index").unwrap_or(0);
    if start_index != 0 && start_index != 1 {
        return Err(UgridError::convention(
            path,
            format!("connectivity variable {name:?} has start_index {start_index}, expected 0 or 1"),
        ));
    }

    let raw: Vec<i64> = var.get_values(..)?;
    let mut out = Vec::with_capacity(rows);
    for r in 0..rows {
        let mut row = [0usize; W];
        for (c, slot) in row.iter_mut().enumerate() {
            let idx = if transposed { c * rows + r } else { r * W + c };
            let value = raw[idx] - start_index;
            if value < 0 {
                return Err(UgridError::convention(
                    path,
                    format!(
                        "connectivity variable {name:?} contains index {} below start_index {start_index}",
                        raw[idx]
                    ),
                ));
            }
            *slot = value as usize;
        }
        out.push(row);
    }
    Ok(out)
}

/// Read a variable as a data set if it advertises `mesh` and `location`
/// attributes pointing at the topology variable; `None` otherwise.
fn read_data_variable(
    path: &Path,
    file: &netcdf::File,
    name: &str,
    topo_name: &str,
) -> Result<Option<DataSet>> {
    let var = file
        .variable(name)
        .ok_or_else(|| UgridError::convention(path, format!("variable {name:?} vanished")))?;

    if attr_string(&var, "mesh").as_deref() != Some(topo_name) {
        return Ok(None);
    }
    let location = match attr_string(&var, "location") {
        Some(loc) => match Location::parse(&loc) {
            Some(location) => location,
            None => {
                warn!("variable {name:?} has unsupported location {loc:?}, skipping");
                return Ok(None);
            }
        },
        None => return Ok(None),
    };

    let values: Vec<f64> = var.get_values(..)?;
    let mut data = DataSet::new(name, location, values);
    for attr in var.attributes() {
        if matches!(attr.name(), "mesh" | "location" | "coordinates") {
            continue;
        }
        if let Ok(netcdf::AttributeValue::Str(value)) = attr.value() {
            data.attributes.insert(attr.name().to_string(), value);
        }
    }
    Ok(Some(data))
}

fn require_attr(
    path: &Path,
    var: &netcdf::Variable<'_>,
    var_name: &str,
    attr: &str,
) -> Result<String> {
    attr_string(var, attr).ok_or_else(|| {
        UgridError::convention(
            path,
            format!("topology variable {var_name:?} is missing the {attr} attribute"),
        )
    })
}

fn attr_string(var: &netcdf::Variable<'_>, name: &str) -> Option<String> {
    match var.attribute_value(name).and_then(|r| r.ok())? {
        netcdf::AttributeValue::Str(s) => Some(s),
        netcdf::AttributeValue::Strs(v) => v.into_iter().next(),
        _ => None,
    }
}

fn attr_i64(var: &netcdf::Variable<'_>, name: &str) -> Option<i64> {
    match var.attribute_value(name).and_then(|r| r.ok())? {
        netcdf::AttributeValue::Schar(v) => Some(v.into()),
        netcdf::AttributeValue::Uchar(v) => Some(v.into()),
        netcdf::AttributeValue::Short(v) => Some(v.into()),
        netcdf::AttributeValue::Ushort(v) => Some(v.into()),
        netcdf::AttributeValue::Int(v) => Some(v.into()),
        netcdf::AttributeValue::Uint(v) => Some(v.into()),
        netcdf::AttributeValue::Longlong(v) => Some(v),
        netcdf::AttributeValue::Ulonglong(v) => i64::try_from(v).ok(),
        _ => None,
    }
}

// ============================================================================
// Write path
// ============================================================================

/// Save a mesh to a UGRID netCDF file.
///
/// The mesh is validated first; a non-conformant mesh is never written.
/// The write is all-or-nothing: output goes to a temporary sibling file
/// that replaces `path` only after a successful write, so a failure leaves
/// any pre-existing file at `path` untouched.
///
/// # Example
///
/// ```no_run
/// use ugrid::io::ugrid;
/// use ::ugrid::mesh::Mesh;
///
/// let mut mesh = Mesh::new();
/// mesh.set_nodes(vec![0.0, 1.0, 0.5], vec![0.0, 0.0, 1.0]).unwrap();
/// mesh.set_faces(vec![[0, 1, 2]]).unwrap();
/// ugrid::save(&mesh, "grid.nc").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()> {
    let path = path.as_ref();
    mesh.validate()?;

    let tmp = tmp_path(path);
    match write_file(mesh, &tmp) {
        Ok(()) => {
            if let Err(e) = fs::rename(&tmp, path) {
                let _ = fs::remove_file(&tmp);
                return Err(e.into());
            }
            debug!("wrote {} nodes, {} faces to {}", mesh.num_nodes(), mesh.num_faces(), path.display());
            Ok(())
        }
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(e)
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_file(mesh: &Mesh, path: &Path) -> Result<()> {
    let mut file = netcdf::create(path)?;

    file.add_attribute("Conventions", "UGRID-1.0")?;

    file.add_dimension("node", mesh.num_nodes())?;
    file.add_dimension("face", mesh.num_faces())?;
    file.add_dimension("three", 3)?;

    let edges = mesh.supplied_edges();
    let has_boundaries = !mesh.boundaries().is_empty();
    if edges.is_some() || has_boundaries {
        file.add_dimension("two", 2)?;
    }
    if let Some(edges) = edges {
        file.add_dimension("edge", edges.len())?;
    }

    // Topology anchor variable.
    let node_coordinates = if mesh.dim() == 3 {
        format!("{NODE_LON_VAR} {NODE_LAT_VAR} {NODE_Z_VAR}")
    } else {
        format!("{NODE_LON_VAR} {NODE_LAT_VAR}")
    };
    {
        let mut topo = file.add_variable::<i32>(TOPOLOGY_VAR, &[])?;
        topo.put_attribute("cf_role", "mesh_topology")?;
        topo.put_attribute("topology_dimension", 2i32)?;
        topo.put_attribute("node_coordinates", node_coordinates.as_str())?;
        topo.put_attribute("face_node_connectivity", FACE_NODES_VAR)?;
        if edges.is_some() {
            topo.put_attribute("edge_node_connectivity", EDGE_NODES_VAR)?;
        }
        if has_boundaries {
            topo.put_attribute("boundary_node_connectivity", BOUNDARY_NODES_VAR)?;
        }
        // Metadata keys land directly on the topology variable, so a
        // user-supplied long_name (or any other descriptive attribute)
        // round-trips unchanged.
        for (key, value) in mesh.metadata() {
            if RESERVED_ATTRS.contains(&key.as_str()) {
                warn!("metadata key {key:?} shadows a structural attribute, skipping");
                continue;
            }
            topo.put_attribute(key, value.as_str())?;
        }
        topo.put_value(0i32, ..)?;
    }

    // Node coordinates.
    {
        let mut lon = file.add_variable::<f64>(NODE_LON_VAR, &["node"])?;
        lon.put_attribute("standard_name", "longitude")?;
        lon.put_attribute("long_name", "Longitude of 2D mesh nodes.")?;
        lon.put_attribute("units", "degrees_east")?;
        lon.put_values(mesh.x(), ..)?;
    }
    {
        let mut lat = file.add_variable::<f64>(NODE_LAT_VAR, &["node"])?;
        lat.put_attribute("standard_name", "latitude")?;
        lat.put_attribute("long_name", "Latitude of 2D mesh nodes.")?;
        lat.put_attribute("units", "degrees_north")?;
        lat.put_values(mesh.y(), ..)?;
    }
    if let Some(z) = mesh.z() {
        let mut z_var = file.add_variable::<f64>(NODE_Z_VAR, &["node"])?;
        z_var.put_attribute("standard_name", "altitude")?;
        z_var.put_attribute("long_name", "Vertical coordinate of 2D mesh nodes.")?;
        z_var.put_attribute("units", "m")?;
        z_var.put_values(z, ..)?;
    }

    // Face-node connectivity, always written 0-based.
    {
        let flat: Vec<i32> = mesh
            .faces()
            .iter()
            .flat_map(|f| f.iter().map(|&n| n as i32))
            .collect();
        let mut faces = file.add_variable::<i32>(FACE_NODES_VAR, &["face", "three"])?;
        faces.put_attribute("cf_role", "face_node_connectivity")?;
        faces.put_attribute("long_name", "Maps every triangular face to its three corner nodes.")?;
        faces.put_attribute("start_index", 0i32)?;
        faces.put_values(&flat, ..)?;
    }

    if let Some(edges) = edges {
        let flat: Vec<i32> = edges.iter().flat_map(|e| e.iter().map(|&n| n as i32)).collect();
        let mut var = file.add_variable::<i32>(EDGE_NODES_VAR, &["edge", "two"])?;
        var.put_attribute("cf_role", "edge_node_connectivity")?;
        var.put_attribute("long_name", "Maps every edge to the two nodes that it connects.")?;
        var.put_attribute("start_index", 0i32)?;
        var.put_values(&flat, ..)?;
    }

    if has_boundaries {
        let flat: Vec<i32> = mesh
            .boundaries()
            .values()
            .flatten()
            .flat_map(|e| e.iter().map(|&n| n as i32))
            .collect();
        file.add_dimension("boundary", flat.len() / 2)?;
        let mut var = file.add_variable::<i32>(BOUNDARY_NODES_VAR, &["boundary", "two"])?;
        var.put_attribute("cf_role", "boundary_node_connectivity")?;
        var.put_attribute("long_name", "Maps boundary edges to the two nodes that they connect.")?;
        var.put_attribute("start_index", 0i32)?;
        var.put_values(&flat, ..)?;
    }

    for data in mesh.data().values() {
        write_data_variable(path, &mut file, data, edges.is_some())?;
    }

    Ok(())
}

fn write_data_variable(
    path: &Path,
    file: &mut netcdf::FileMut,
    data: &DataSet,
    has_edge_dim: bool,
) -> Result<()> {
    let structural = [
        TOPOLOGY_VAR,
        FACE_NODES_VAR,
        EDGE_NODES_VAR,
        BOUNDARY_NODES_VAR,
        NODE_LON_VAR,
        NODE_LAT_VAR,
        NODE_Z_VAR,
    ];
    if structural.contains(&data.name.as_str()) {
        return Err(UgridError::convention(
            path,
            format!("data set name {:?} collides with a structural variable", data.name),
        ));
    }

    let dim = match data.location {
        Location::Node => "node",
        Location::Face => "face",
        Location::Edge => {
            if !has_edge_dim {
                return Err(UgridError::convention(
                    path,
                    format!(
                        "data set {:?} is located on edges, but the mesh has no explicit edges; \
                         supply them with set_edges before saving",
                        data.name
                    ),
                ));
            }
            "edge"
        }
    };

    let mut var = file.add_variable::<f64>(&data.name, &[dim])?;
    var.put_attribute("mesh", TOPOLOGY_VAR)?;
    var.put_attribute("location", data.location.as_str())?;
    for (key, value) in &data.attributes {
        if matches!(key.as_str(), "mesh" | "location") {
            continue;
        }
        var.put_attribute(key, value.as_str())?;
    }
    var.put_values(&data.values, ..)?;
    Ok(())
}

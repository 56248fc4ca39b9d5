//! Data sets attached to mesh entities.
//!
//! A [`DataSet`] holds values associated with the nodes, edges, or faces of
//! a mesh (depth, velocity, temperature, ...), together with the free-form
//! attributes that describe them (units, standard names). On disk these
//! become ordinary netCDF variables tagged with `mesh` and `location`
//! attributes.

use std::collections::BTreeMap;

/// The mesh entity a data set is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// One value per node.
    Node,
    /// One value per edge.
    Edge,
    /// One value per face.
    Face,
}

impl Location {
    /// The UGRID `location` attribute value for this location.
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Node => "node",
            Location::Edge => "edge",
            Location::Face => "face",
        }
    }

    /// Parse a UGRID `location` attribute value.
    pub fn parse(s: &str) -> Option<Location> {
        match s {
            "node" => Some(Location::Node),
            "edge" => Some(Location::Edge),
            "face" => Some(Location::Face),
            _ => None,
        }
    }
}

/// Values associated with mesh entities, plus their descriptive attributes.
///
/// # Example
///
/// ```
/// use ugrid::mesh::{DataSet, Location};
///
/// let depth = DataSet::new("depth", Location::Node, vec![1.0, 2.0, 1.5])
///     .with_attribute("units", "m")
///     .with_attribute("standard_name", "sea_floor_depth_below_geoid");
///
/// assert_eq!(depth.location, Location::Node);
/// assert_eq!(depth.values.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Name of the data set (becomes the variable name on disk).
    pub name: String,
    /// Which mesh entity the values belong to.
    pub location: Location,
    /// One value per entity at `location`.
    pub values: Vec<f64>,
    /// Free-form attributes (units, standard_name, ...).
    pub attributes: BTreeMap<String, String>,
}

impl DataSet {
    /// Create a new data set.
    pub fn new(name: impl Into<String>, location: Location, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            location,
            values,
            attributes: BTreeMap::new(),
        }
    }

    /// Add a descriptive attribute, builder-style.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_roundtrips_through_attribute_strings() {
        for loc in [Location::Node, Location::Edge, Location::Face] {
            assert_eq!(Location::parse(loc.as_str()), Some(loc));
        }
        assert_eq!(Location::parse("volume"), None);
    }
}

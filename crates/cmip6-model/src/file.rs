//! Data-file collaborator interface.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::attr::AttrValue;

/// An open netCDF data file, as far as the checker needs to see it.
///
/// Absence of an attribute is signaled distinctly from an empty value:
/// accessors return `None` only when the attribute (or variable, or
/// coordinate) does not exist.
pub trait DataFile {
    /// Path of the file on disk; the filename carries the DRS facets.
    fn path(&self) -> &Path;

    /// A global attribute by name.
    fn attribute(&self, name: &str) -> Option<AttrValue>;

    /// An attribute of a named variable.
    fn variable_attribute(&self, variable: &str, attribute: &str) -> Option<AttrValue>;

    /// The first value of a named coordinate variable.
    fn first_coordinate_value(&self, coordinate: &str) -> Option<f64>;
}

/// In-memory data file, for hosts that adapt a netCDF reader and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryDataFile {
    path: PathBuf,
    attributes: BTreeMap<String, AttrValue>,
    variables: BTreeMap<String, BTreeMap<String, AttrValue>>,
    coordinates: BTreeMap<String, Vec<f64>>,
}

impl MemoryDataFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_variable_attribute(
        mut self,
        variable: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<AttrValue>,
    ) -> Self {
        self.variables
            .entry(variable.into())
            .or_default()
            .insert(name.into(), value.into());
        self
    }

    pub fn with_coordinate(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.coordinates.insert(name.into(), values);
        self
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn remove_attribute(&mut self, name: &str) {
        self.attributes.remove(name);
    }
}

impl DataFile for MemoryDataFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn attribute(&self, name: &str) -> Option<AttrValue> {
        self.attributes.get(name).cloned()
    }

    fn variable_attribute(&self, variable: &str, attribute: &str) -> Option<AttrValue> {
        self.variables.get(variable)?.get(attribute).cloned()
    }

    fn first_coordinate_value(&self, coordinate: &str) -> Option<f64> {
        self.coordinates.get(coordinate)?.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absence_is_distinct_from_empty() {
        let ds = MemoryDataFile::new("tas_Amon_x_y_r1i1p1f1_gn.nc").with_attribute("grid", "");
        assert_eq!(ds.attribute("grid"), Some(AttrValue::from("")));
        assert_eq!(ds.attribute("history"), None);
    }

    #[test]
    fn variable_and_coordinate_accessors() {
        let ds = MemoryDataFile::new("f.nc")
            .with_variable_attribute("tas", "units", "K")
            .with_coordinate("time", vec![15.5, 45.0]);
        assert_eq!(ds.variable_attribute("tas", "units"), Some(AttrValue::from("K")));
        assert_eq!(ds.variable_attribute("tas", "cell_methods"), None);
        assert_eq!(ds.variable_attribute("pr", "units"), None);
        assert_eq!(ds.first_coordinate_value("time"), Some(15.5));
        assert_eq!(ds.first_coordinate_value("lat"), None);
    }
}

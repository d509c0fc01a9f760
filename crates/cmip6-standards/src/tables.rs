//! MIP table loading.
//!
//! A MIP table directory holds one JSON file per variable group (`Amon`,
//! `day`, ...), each with a `Header` object and a `variable_entry` map. The
//! loader indexes every entry by (table, variable) and keeps only the
//! metadata fields the checker compares against file contents.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, StandardsError};

/// Controlled-vocabulary definition file excluded from table scanning.
pub const CV_FILE_NAME: &str = "CMIP6_CV.json";

/// Prefix stripped from the composite `Header.table_id` ("Table Amon") to
/// recover the table name.
const TABLE_ID_PREFIX: &str = "Table ";

/// Expected metadata of one output variable, reduced to the fields compared
/// against file contents. Fields absent from the source table stay `None`
/// and are not compared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableMetadata {
    #[serde(default)]
    pub standard_name: Option<String>,
    #[serde(default)]
    pub long_name: Option<String>,
    #[serde(default)]
    pub units: Option<String>,
}

impl VariableMetadata {
    /// The declared metadata fields, as (attribute name, expected value).
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("standard_name", self.standard_name.as_deref()),
            ("long_name", self.long_name.as_deref()),
            ("units", self.units.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| (name, value)))
    }
}

/// A file passed over during the directory scan, with the reason.
#[derive(Debug, Clone)]
pub struct SkippedTable {
    pub path: PathBuf,
    pub reason: String,
}

/// A table whose `data_specs_version` disagrees with the first one loaded.
#[derive(Debug, Clone)]
pub struct VersionConflict {
    pub table: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
struct TableFile {
    #[serde(rename = "Header")]
    header: TableHeader,
    #[serde(default)]
    variable_entry: BTreeMap<String, VariableMetadata>,
}

#[derive(Debug, Deserialize)]
struct TableHeader {
    table_id: String,
    #[serde(default)]
    data_specs_version: Option<String>,
}

/// Index of MIP variable-definition tables, read-only after load.
#[derive(Debug, Default)]
pub struct MipTables {
    tables: BTreeMap<String, BTreeMap<String, VariableMetadata>>,
    names: Vec<String>,
    version: Option<String>,
    version_conflicts: Vec<VersionConflict>,
    skipped: Vec<SkippedTable>,
}

impl MipTables {
    /// Load every table file under `dir`.
    ///
    /// Files that cannot be parsed are skipped and recorded, not fatal: a
    /// partial table set must not abort the load. Only failure to read the
    /// directory itself is an error.
    pub fn load(dir: &Path) -> Result<Self> {
        let entries = fs::read_dir(dir).map_err(|source| StandardsError::io(dir, source))?;
        let mut paths: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        paths.sort();

        let mut tables = Self::default();
        for path in paths {
            let name = path.file_name().and_then(|name| name.to_str()).unwrap_or("");
            if name == CV_FILE_NAME {
                continue;
            }
            tables.load_file(&path);
        }
        debug!(
            tables = tables.names.len(),
            skipped = tables.skipped.len(),
            version = tables.version.as_deref().unwrap_or("none"),
            "loaded mip tables"
        );
        Ok(tables)
    }

    fn load_file(&mut self, path: &Path) {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => return self.skip(path, format!("read failed: {err}")),
        };
        let value: serde_json::Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(err) => return self.skip(path, format!("invalid JSON: {err}")),
        };
        let table: TableFile = match serde_json::from_value(value) {
            Ok(table) => table,
            Err(err) => return self.skip(path, format!("missing or malformed Header: {err}")),
        };

        let name = table
            .header
            .table_id
            .strip_prefix(TABLE_ID_PREFIX)
            .unwrap_or(&table.header.table_id)
            .to_string();

        match (&self.version, table.header.data_specs_version) {
            (None, Some(version)) => self.version = Some(version),
            (Some(current), Some(version)) if *current != version => {
                warn!(
                    table = %name,
                    version = %version,
                    expected = %current,
                    "data_specs_version disagrees with previously loaded tables"
                );
                self.version_conflicts.push(VersionConflict {
                    table: name.clone(),
                    version,
                });
            }
            _ => {}
        }

        if !self.tables.contains_key(&name) {
            self.names.push(name.clone());
        }
        self.tables.insert(name, table.variable_entry);
    }

    fn skip(&mut self, path: &Path, reason: String) {
        warn!(path = %path.display(), %reason, "skipping table file");
        self.skipped.push(SkippedTable {
            path: path.to_path_buf(),
            reason,
        });
    }

    /// Loaded table names, in discovery order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains_table(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    /// The specification version captured from the first table that declared
    /// one, or `None` if no loaded table carried a version.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Tables whose version disagreed with [`Self::version`].
    pub fn version_conflicts(&self) -> &[VersionConflict] {
        &self.version_conflicts
    }

    /// Files passed over during the scan, with reasons.
    pub fn skipped(&self) -> &[SkippedTable] {
        &self.skipped
    }

    /// The variable names declared by a table.
    pub fn variables_of(&self, table: &str) -> Result<Vec<&str>> {
        let entries = self
            .tables
            .get(table)
            .ok_or_else(|| StandardsError::TableNotFound {
                table: table.to_string(),
            })?;
        Ok(entries.keys().map(String::as_str).collect())
    }

    /// The expected metadata of one variable in one table.
    pub fn metadata_of(&self, table: &str, variable: &str) -> Result<&VariableMetadata> {
        let entries = self
            .tables
            .get(table)
            .ok_or_else(|| StandardsError::TableNotFound {
                table: table.to_string(),
            })?;
        entries
            .get(variable)
            .ok_or_else(|| StandardsError::VariableNotFound {
                table: table.to_string(),
                variable: variable.to_string(),
            })
    }
}

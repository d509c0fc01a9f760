#![deny(unsafe_code)]

pub mod error;
pub mod tables;

pub use crate::error::{Result, StandardsError};
pub use crate::tables::{CV_FILE_NAME, MipTables, SkippedTable, VariableMetadata, VersionConflict};

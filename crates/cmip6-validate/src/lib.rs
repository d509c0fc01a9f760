#![deny(unsafe_code)]

//! CMIP6 consistency checks: filename facets and global attributes of a
//! netCDF dataset validated against the controlled vocabularies and the MIP
//! tables.

pub mod cache;
pub mod checker;
pub mod dates;
pub mod report;
pub mod rules;

pub use crate::cache::{TermCache, TermValidity};
pub use crate::checker::{Cmip6Checker, ESDOC_BASE_URL, LICENSE_TEXT};
pub use crate::dates::{DateRangeError, DateResolution};
pub use crate::report::{
    CheckReportPayload, CheckSummary, has_check_failures, write_check_report_json,
};
pub use crate::rules::Rule;

//! The CMIP6 consistency checker.
//!
//! Two independent check passes over one open data file: the DRS filename
//! check (facets vs CV and stored attributes) and the global attribute check
//! (~30 typed attribute rules, variable metadata vs the MIP tables, derived
//! identifiers, parent provenance). No failure aborts a pass; every failure
//! becomes a diagnostic message and the pass scores 0/1 unless all
//! sub-checks hold.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use cmip6_model::{
    AttrValue, CheckLevel, CheckMessage, CheckResult, CvSource, DataFile, MessageKind, TermKind,
};
use cmip6_standards::MipTables;

use crate::cache::{TermCache, TermValidity};
use crate::dates::{self, DateRangeError};
use crate::rules::Rule;

/// Base URL of the ES-DOC further-information service.
pub const ESDOC_BASE_URL: &str = "http://furtherinfo.es-doc.org";

/// The exact license text every published file must carry.
pub const LICENSE_TEXT: &str = "CMIP6 model data produced by MOHC is licensed under a \
Creative Commons Attribution ShareAlike 4.0 International \
License (https://creativecommons.org/licenses). Consult \
https://pcmdi.llnl.gov/CMIP6/TermsOfUse for terms of use \
governing CMIP6 output, including citation requirements and \
proper acknowledgment. Further information about this data, \
including some limitations, can be found via the \
further_info_url (recorded as a global attribute in this \
file) . The data producers and data providers make no \
warranty, either express or implied, including, but not \
limited to, warranties of merchantability and fitness for a \
particular purpose. All liabilities arising from the supply \
of the information (including any liability arising in \
negligence) are excluded to the fullest extent permitted by \
law.";

const CF_CONVENTIONS: &[&str] = &["CF-1.7 CMIP-6.2", "CF-1.7 CMIP-6.2 UGRID-1.0"];

/// Attributes whose values are CV labels, named by their CV collection.
const CV_ATTRIBUTES: &[&str] = &[
    "activity-id",
    "experiment-id",
    "frequency",
    "grid-label",
    "institution-id",
    "realm",
    "source-id",
    "source-type",
    "nominal-resolution",
    "table-id",
];

const RUN_INDEX_ATTRIBUTES: &[&str] = &[
    "forcing_index",
    "physics_index",
    "initialization_index",
    "realization_index",
];

const OPTIONAL_TEXT_ATTRIBUTES: &[&str] = &[
    "history",
    "references",
    "title",
    "variant_info",
    "contact",
    "comment",
];

/// Parent-cluster attributes that must be absent or "no parent" when the
/// simulation has no parent.
const PARENT_ATTRIBUTES: &[&str] = &[
    "branch_method",
    "parent_activity_id",
    "parent_experiment_id",
    "parent_mip_era",
    "parent_source_id",
    "parent_time_units",
];

/// Global attributes retrieved into the working set for cross-checks.
const GLOBAL_ATTRIBUTE_SET: &[&str] = &[
    "forcing_index",
    "realization_index",
    "initialization_index",
    "physics_index",
    "experiment_id",
    "sub_experiment_id",
    "variant_label",
    "mip_era",
    "source_id",
    "institution_id",
    "table_id",
    "variable_id",
];

/// Attributes retrieved from the variable named by `variable_id`.
const VARIABLE_ATTRIBUTES: &[&str] = &[
    "standard_name",
    "long_name",
    "comment",
    "units",
    "original_name",
    "cell_methods",
    "cell_measures",
    "missing_value",
    "_FillValue",
];

const EXTERNAL_VARIABLES: &[&str] = &["areacella", "areacello"];
const CREATION_DATE_TEMPLATE: &str = "%Y-%m-%dT%H:%M:%SZ";
const NO_PARENT: &str = "no parent";

/// CMOR writes missing data as this value regardless of what the tables say.
const FILL_VALUE_SENTINEL: f64 = 1.0e20;

const FILENAME_CHECK_NAME: &str = "DRS template check";
const GLOBAL_CHECK_NAME: &str = "Global attributes check";

static VARIANT_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^r\d+i\d+p\d+f\d+$").expect("variant label pattern"));
// Only the "model name (year)" prefix is enforced; the full component-model
// sub-grammar is not.
static SOURCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\d\-_\.\s]+ \(\d{4}\)").expect("source pattern"));
static TRACKING_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^hdl:21\.14100/[a-zA-Z\d\-]+$").expect("tracking id pattern"));
static PARENT_TIME_UNITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^days since").expect("parent time units pattern"));

/// Accumulates diagnostics for one check pass. Every failed sub-check adds
/// exactly one message, so the final score is derived from the message list.
#[derive(Debug, Default)]
struct CheckAccumulator {
    messages: Vec<CheckMessage>,
}

impl CheckAccumulator {
    fn fail(&mut self, kind: MessageKind, text: impl Into<String>) {
        self.messages.push(CheckMessage::new(kind, text));
    }

    fn into_result(self, level: CheckLevel, name: &str) -> CheckResult {
        CheckResult::from_messages(level, name, self.messages)
    }
}

/// Checker for one CV scope and one loaded table set.
///
/// The CV source, table index and term cache are shared, process-lifetime
/// collaborators injected at construction; one checker instance can validate
/// any number of files.
pub struct Cmip6Checker<'a> {
    cv: &'a dyn CvSource,
    tables: &'a MipTables,
    cache: &'a TermCache,
    /// Institution postal addresses, captured from the CV at construction.
    institutions: Vec<AttrValue>,
    /// Experiment descriptions, captured from the CV at construction.
    experiments: Vec<AttrValue>,
}

impl<'a> Cmip6Checker<'a> {
    pub fn new(cv: &'a dyn CvSource, tables: &'a MipTables, cache: &'a TermCache) -> Self {
        let institutions = collect_term_data(cv, "institution-id", "postal_address");
        let experiments = collect_term_data(cv, "experiment-id", "experiment");
        Self {
            cv,
            tables,
            cache,
            institutions,
            experiments,
        }
    }

    /// Check the filename facets against the CV, the stored global
    /// attributes, the variable tables and the declared frequency.
    ///
    /// Facet layout:
    /// `<variable_id>_<table_id>_<source_id>_<experiment_id>_<member_id>_<grid_label>[_<start>-<end>].nc`
    pub fn check_filename(&self, ds: &dyn DataFile) -> CheckResult {
        let mut acc = CheckAccumulator::default();
        let filename = ds
            .path()
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();
        let stem = filename.split('.').next().unwrap_or_default();
        let facets: Vec<&str> = stem.split('_').collect();

        if facets.len() < 6 {
            acc.fail(
                MessageKind::InvalidValue,
                format!("Filename {filename} does not match the CMIP6 template"),
            );
            return acc.into_result(CheckLevel::Medium, FILENAME_CHECK_NAME);
        }

        self.check_cv_facets(ds, &facets, &filename, &mut acc);
        self.check_member_id(ds, facets[4], &filename, &mut acc);

        // Variable membership in the declared table, when the table is known.
        if self.tables.contains_table(facets[1]) {
            let known = self
                .tables
                .variables_of(facets[1])
                .map(|variables| variables.contains(&facets[0]))
                .unwrap_or(false);
            if !known {
                acc.fail(
                    MessageKind::InvalidValue,
                    format!(
                        "Invalid variable {} for table {} in the filename {filename}",
                        facets[0], facets[1]
                    ),
                );
            }
        }

        if facets.len() == 7 {
            self.check_date_range(ds, facets[6], &mut acc);
        }

        debug!(
            file = %filename,
            messages = acc.messages.len(),
            "completed filename check"
        );
        acc.into_result(CheckLevel::Medium, FILENAME_CHECK_NAME)
    }

    /// CV membership of the four CV-bound facets plus the facet-vs-attribute
    /// cross-check.
    fn check_cv_facets(
        &self,
        ds: &dyn DataFile,
        facets: &[&str],
        filename: &str,
        acc: &mut CheckAccumulator,
    ) {
        const CV_FACETS: &[(&str, usize)] = &[
            ("table-id", 1),
            ("source-id", 2),
            ("experiment-id", 3),
            ("grid-label", 5),
        ];

        for (collection, index) in CV_FACETS {
            let facet = facets[*index];
            let validity = self.cache.validate(
                self.cv,
                &facet.to_lowercase(),
                collection,
                TermKind::CanonicalName,
            );
            if !validity.is_valid() {
                acc.fail(
                    MessageKind::InvalidValue,
                    format!("Invalid term {collection} in the filename {filename}"),
                );
                continue;
            }
            // The stored attribute must match the facet exactly, including case.
            let attr_name = collection.replace('-', "_");
            let stored = ds.attribute(&attr_name);
            match stored.as_ref().and_then(AttrValue::as_text) {
                Some(text) if text == facet => {}
                Some(text) => acc.fail(
                    MessageKind::InconsistentValue,
                    format!(
                        "Value {text} of the attribute {collection} doesn't match filename {filename}"
                    ),
                ),
                None => acc.fail(
                    MessageKind::MissingAttribute,
                    format!("Attribute {attr_name} is missing from the ncdf file"),
                ),
            }
        }
    }

    /// Member-id facet: `<variant_label>[-<sub_experiment_id>]`.
    fn check_member_id(
        &self,
        ds: &dyn DataFile,
        member_id: &str,
        filename: &str,
        acc: &mut CheckAccumulator,
    ) {
        let parts: Vec<&str> = member_id.split('-').collect();
        if parts.len() > 1 {
            let validity = self.cache.validate(
                self.cv,
                &parts[1].to_lowercase(),
                "sub-experiment-id",
                TermKind::CanonicalName,
            );
            if !validity.is_valid() {
                acc.fail(
                    MessageKind::InvalidValue,
                    format!("Invalid term sub_experiment_id in the filename {filename}"),
                );
            }
        }
        if !VARIANT_LABEL_RE.is_match(parts[0]) {
            acc.fail(
                MessageKind::InvalidValue,
                format!("Invalid variant_label {}", parts[0]),
            );
            return;
        }
        let stored = ds.attribute("variant_label");
        match stored.as_ref().and_then(AttrValue::as_text) {
            Some(text) if text == parts[0] => {}
            Some(text) => acc.fail(
                MessageKind::InconsistentValue,
                format!(
                    "Variant label {} is not consistent with file contents ({text})",
                    parts[0]
                ),
            ),
            None => acc.fail(
                MessageKind::MissingAttribute,
                "Attribute variant_label is missing from the ncdf file",
            ),
        }
    }

    fn check_date_range(&self, ds: &dyn DataFile, range: &str, acc: &mut CheckAccumulator) {
        let frequency = ds.attribute("frequency");
        let Some(frequency) = frequency.as_ref().and_then(AttrValue::as_text) else {
            acc.fail(
                MessageKind::MissingAttribute,
                "Attribute frequency is missing from the ncdf file",
            );
            return;
        };
        match dates::parse_date_range(range, frequency) {
            Ok(_) => {}
            Err(DateRangeError::UnsupportedFrequency(frequency)) => acc.fail(
                MessageKind::UnsupportedFrequency,
                format!("Invalid daterange {range} (unsupported frequency {frequency})"),
            ),
            Err(err) => acc.fail(
                MessageKind::MalformedDateRange,
                format!("Invalid daterange {range} ({err})"),
            ),
        }
    }

    /// Check existence and validity of the global attributes, the variable
    /// metadata against the tables, the derived identifiers and the parent
    /// provenance cluster.
    pub fn check_global_attributes(&self, ds: &dyn DataFile) -> CheckResult {
        let mut acc = CheckAccumulator::default();

        for collection in CV_ATTRIBUTES {
            self.validate_cv_attribute(ds, collection, None, &mut acc);
        }

        let positive_integer = Rule::positive_integer();
        for attr in RUN_INDEX_ATTRIBUTES {
            self.exists_and_valid(ds, attr, &positive_integer, &mut acc);
        }

        let nonempty_text = Rule::nonempty_text();
        self.exists_and_valid(ds, "grid", &nonempty_text, &mut acc);
        for attr in OPTIONAL_TEXT_ATTRIBUTES {
            self.absent_or_valid(ds, attr, &nonempty_text, &mut acc);
        }

        // Descriptive strings, not labels: the full experiment description
        // and the institution postal address must match the CV verbatim.
        self.exists_and_valid(ds, "experiment", &Rule::ValueIn(self.experiments.clone()), &mut acc);
        self.exists_and_valid(ds, "institution", &Rule::ValueIn(self.institutions.clone()), &mut acc);

        self.exists_and_valid(
            ds,
            "Conventions",
            &Rule::value_in(CF_CONVENTIONS.iter().copied()),
            &mut acc,
        );
        self.exists_and_valid(
            ds,
            "creation_date",
            &Rule::DateTemplate(CREATION_DATE_TEMPLATE.to_string()),
            &mut acc,
        );

        // data_specs_version must agree with the loaded tables.
        let versions: Vec<AttrValue> = self
            .tables
            .version()
            .map(AttrValue::from)
            .into_iter()
            .collect();
        self.exists_and_valid(ds, "data_specs_version", &Rule::ValueIn(versions), &mut acc);

        self.absent_or_valid(
            ds,
            "external_variables",
            &Rule::value_in(EXTERNAL_VARIABLES.iter().copied()),
            &mut acc,
        );
        self.exists_and_valid(ds, "license", &Rule::value_in([LICENSE_TEXT]), &mut acc);
        self.exists_and_valid(ds, "mip_era", &Rule::value_in(["CMIP6"]), &mut acc);
        self.exists_and_valid(ds, "product", &Rule::value_in(["model-output"]), &mut acc);
        self.exists_and_valid(ds, "source", &Rule::text_matching(&SOURCE_RE), &mut acc);
        self.exists_and_valid(ds, "tracking_id", &Rule::text_matching(&TRACKING_ID_RE), &mut acc);

        // Working set for the cross-checks below; retrieval failures are
        // diagnosed here and the dependent checks fail gracefully.
        let mut attrs: BTreeMap<&str, Option<AttrValue>> = BTreeMap::new();
        for &name in GLOBAL_ATTRIBUTE_SET {
            let value = ds.attribute(name);
            if value.is_none() {
                acc.fail(
                    MessageKind::MissingAttribute,
                    format!("Cannot retrieve global attribute {name}"),
                );
            }
            attrs.insert(name, value);
        }

        let variable_id = attr_text(&attrs, "variable_id");
        let mut var_attrs: BTreeMap<&str, Option<AttrValue>> = BTreeMap::new();
        for &name in VARIABLE_ATTRIBUTES {
            let value = variable_id.and_then(|variable| ds.variable_attribute(variable, name));
            if value.is_none() {
                acc.fail(
                    MessageKind::MissingAttribute,
                    format!("Cannot retrieve variable attribute {name}"),
                );
            }
            var_attrs.insert(name, value);
        }

        self.check_variable_metadata(&attrs, &var_attrs, &mut acc);
        self.check_further_info_url(ds, &attrs, &mut acc);
        self.check_variable_in_table(ds, &attrs, &mut acc);
        self.check_variant_label_composition(ds, &attrs, &mut acc);
        self.check_parent_provenance(ds, &attrs, &mut acc);

        debug!(
            file = %ds.path().display(),
            messages = acc.messages.len(),
            "completed global attribute check"
        );
        acc.into_result(CheckLevel::High, GLOBAL_CHECK_NAME)
    }

    /// Variable attributes vs the table-declared metadata; the fill-value
    /// pair is compared against the CMOR sentinel instead.
    fn check_variable_metadata(
        &self,
        attrs: &BTreeMap<&str, Option<AttrValue>>,
        var_attrs: &BTreeMap<&str, Option<AttrValue>>,
        acc: &mut CheckAccumulator,
    ) {
        let (Some(table), Some(variable)) =
            (attr_text(attrs, "table_id"), attr_text(attrs, "variable_id"))
        else {
            return;
        };
        let meta = match self.tables.metadata_of(table, variable) {
            Ok(meta) => meta,
            Err(err) => {
                acc.fail(
                    MessageKind::InvalidValue,
                    format!("Cannot look up variable metadata: {err}"),
                );
                return;
            }
        };

        for (field, expected) in meta.fields() {
            match var_attrs.get(field).and_then(Option::as_ref) {
                Some(AttrValue::Text(actual)) if actual == expected => {}
                Some(actual) => acc.fail(
                    MessageKind::InconsistentValue,
                    format!(
                        "Variable attribute {field} has value {actual} inconsistent with \
                         {expected} defined in table {table}"
                    ),
                ),
                None => acc.fail(
                    MessageKind::MissingAttribute,
                    format!("Variable attribute '{field}' absent in '{variable}'"),
                ),
            }
        }

        for field in ["missing_value", "_FillValue"] {
            match var_attrs.get(field).and_then(Option::as_ref) {
                Some(AttrValue::Double(actual)) if *actual == FILL_VALUE_SENTINEL => {}
                Some(actual) => acc.fail(
                    MessageKind::InconsistentValue,
                    format!(
                        "Variable attribute {field} has value {actual} instead of \
                         {FILL_VALUE_SENTINEL:e}"
                    ),
                ),
                None => acc.fail(
                    MessageKind::MissingAttribute,
                    format!("Variable attribute '{field}' absent in '{variable}'"),
                ),
            }
        }
    }

    /// `further_info_url` must equal the identifier derived from the file's
    /// own facet attributes.
    fn check_further_info_url(
        &self,
        ds: &dyn DataFile,
        attrs: &BTreeMap<&str, Option<AttrValue>>,
        acc: &mut CheckAccumulator,
    ) {
        let parts: Option<Vec<String>> = [
            "mip_era",
            "institution_id",
            "source_id",
            "experiment_id",
            "sub_experiment_id",
            "variant_label",
        ]
        .iter()
        .map(|name| attr_display(attrs, name))
        .collect();

        match parts {
            Some(parts) => {
                let further_info_url = format!("{ESDOC_BASE_URL}/{}", parts.join("."));
                self.exists_and_valid(
                    ds,
                    "further_info_url",
                    &Rule::value_in([further_info_url]),
                    acc,
                );
            }
            None => acc.fail(
                MessageKind::MissingAttribute,
                "Cannot compute further_info_url from global attributes",
            ),
        }
    }

    fn check_variable_in_table(
        &self,
        ds: &dyn DataFile,
        attrs: &BTreeMap<&str, Option<AttrValue>>,
        acc: &mut CheckAccumulator,
    ) {
        let Some(table) = attr_text(attrs, "table_id") else {
            acc.fail(
                MessageKind::MissingAttribute,
                "Cannot validate variable_id without table_id",
            );
            return;
        };
        match self.tables.variables_of(table) {
            Ok(variables) => {
                self.exists_and_valid(ds, "variable_id", &Rule::value_in(variables), acc);
            }
            Err(err) => acc.fail(
                MessageKind::InvalidValue,
                format!("Cannot validate variable_id: {err}"),
            ),
        }
    }

    /// `variant_label` must equal `r<realization>i<initialization>p<physics>f<forcing>`
    /// composed from the four run indices.
    fn check_variant_label_composition(
        &self,
        ds: &dyn DataFile,
        attrs: &BTreeMap<&str, Option<AttrValue>>,
        acc: &mut CheckAccumulator,
    ) {
        let (Some(r), Some(i), Some(p), Some(f)) = (
            attr_display(attrs, "realization_index"),
            attr_display(attrs, "initialization_index"),
            attr_display(attrs, "physics_index"),
            attr_display(attrs, "forcing_index"),
        ) else {
            acc.fail(
                MessageKind::MissingAttribute,
                "Cannot compose variant_label from run indices",
            );
            return;
        };
        let composed = format!("r{r}i{i}p{p}f{f}");
        self.exists_and_valid(ds, "variant_label", &Rule::value_in([composed]), acc);
    }

    /// Branch provenance: either a complete, internally consistent parent
    /// cluster, or no parent and a cluster that is absent or sentinel-valued.
    fn check_parent_provenance(
        &self,
        ds: &dyn DataFile,
        attrs: &BTreeMap<&str, Option<AttrValue>>,
        acc: &mut CheckAccumulator,
    ) {
        let parent_experiment = ds.attribute("parent_experiment_id");
        let has_parent = parent_experiment
            .as_ref()
            .and_then(AttrValue::as_text)
            .is_some_and(|text| text != NO_PARENT);

        if has_parent {
            self.validate_cv_attribute(ds, "experiment-id", Some("parent_experiment_id"), acc);
            self.validate_cv_attribute(ds, "activity-id", Some("parent_activity_id"), acc);
            self.validate_cv_attribute(ds, "source-id", Some("parent_source_id"), acc);

            self.exists_and_valid(ds, "branch_method", &Rule::Nonempty, acc);
            self.exists_and_valid(ds, "branch_time_in_child", &Rule::FloatStrict, acc);
            self.exists_and_valid(ds, "branch_time_in_parent", &Rule::FloatStrict, acc);
            self.exists_and_valid(ds, "parent_mip_era", &Rule::value_in(["CMIP6"]), acc);

            match attr_display(attrs, "source_id") {
                Some(source_id) => {
                    self.exists_and_valid(ds, "parent_source_id", &Rule::value_in([source_id]), acc);
                }
                None => acc.fail(
                    MessageKind::InconsistentValue,
                    "Unable to check consistency of parent_source_id with source_id",
                ),
            }

            self.exists_and_valid(
                ds,
                "parent_time_units",
                &Rule::text_matching(&PARENT_TIME_UNITS_RE),
                acc,
            );
            self.exists_and_valid(
                ds,
                "parent_variant_label",
                &Rule::text_matching(&VARIANT_LABEL_RE),
                acc,
            );
        } else {
            // branch_time_in_child, when present, must match the start of the
            // run; skipped when the time coordinate is unavailable.
            if let Some(start_of_run) = ds.first_coordinate_value("time") {
                self.absent_or_valid(
                    ds,
                    "branch_time_in_child",
                    &Rule::value_in([start_of_run]),
                    acc,
                );
            }
            self.absent_or_valid(ds, "branch_time_in_parent", &Rule::value_in([0.0]), acc);

            let no_parent = Rule::value_in([NO_PARENT]);
            for attr in PARENT_ATTRIBUTES {
                self.absent_or_valid(ds, attr, &no_parent, acc);
            }
        }
    }

    /// A mandatory attribute: missing or invalid is a failure.
    fn exists_and_valid(
        &self,
        ds: &dyn DataFile,
        attr: &str,
        rule: &Rule,
        acc: &mut CheckAccumulator,
    ) {
        match ds.attribute(attr) {
            None => acc.fail(
                MessageKind::MissingAttribute,
                format!("Attribute {attr} must exist and have a proper value"),
            ),
            Some(value) if !rule.evaluate(&value) => acc.fail(
                MessageKind::InvalidValue,
                format!("Attribute {attr} must exist and have a proper value"),
            ),
            Some(_) => {}
        }
    }

    /// An optional attribute: absence is fine, an invalid value is not.
    fn absent_or_valid(
        &self,
        ds: &dyn DataFile,
        attr: &str,
        rule: &Rule,
        acc: &mut CheckAccumulator,
    ) {
        if let Some(value) = ds.attribute(attr)
            && !rule.evaluate(&value)
        {
            acc.fail(
                MessageKind::InvalidValue,
                format!("Attribute {attr} needs to have a valid value or be omitted"),
            );
        }
    }

    /// An attribute whose value must be a CV label. `nc_name` overrides the
    /// attribute name when it differs from the collection name.
    fn validate_cv_attribute(
        &self,
        ds: &dyn DataFile,
        collection: &str,
        nc_name: Option<&str>,
        acc: &mut CheckAccumulator,
    ) {
        let attr_name = match nc_name {
            Some(name) => name.to_string(),
            None => collection.replace('-', "_"),
        };
        let Some(value) = ds.attribute(&attr_name) else {
            acc.fail(
                MessageKind::MissingAttribute,
                format!("Attribute {attr_name} is missing from the ncdf file"),
            );
            return;
        };
        let Some(term) = value.as_text() else {
            acc.fail(
                MessageKind::InvalidValue,
                format!("Attribute {attr_name} has illegal value {value}"),
            );
            return;
        };
        match self.cache.validate(self.cv, term, collection, TermKind::Label) {
            TermValidity::Valid => {}
            TermValidity::Invalid => acc.fail(
                MessageKind::InvalidValue,
                format!("Attribute {attr_name} has illegal value {term}"),
            ),
            TermValidity::UnknownCollection => acc.fail(
                MessageKind::UnknownCvCollection,
                format!("Unknown CV collection type {collection}"),
            ),
        }
    }
}

fn collect_term_data(cv: &dyn CvSource, collection: &str, field: &str) -> Vec<AttrValue> {
    cv.terms(collection)
        .unwrap_or_default()
        .iter()
        .filter_map(|term| term.data.get(field))
        .map(|text| AttrValue::Text(text.clone()))
        .collect()
}

fn attr_text<'m>(attrs: &'m BTreeMap<&str, Option<AttrValue>>, name: &str) -> Option<&'m str> {
    attrs.get(name)?.as_ref()?.as_text()
}

fn attr_display(attrs: &BTreeMap<&str, Option<AttrValue>>, name: &str) -> Option<String> {
    Some(attrs.get(name)?.as_ref()?.to_string())
}

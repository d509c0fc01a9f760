//! Controlled-vocabulary collaborator interface.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Which textual representation of a CV term to match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermKind {
    CanonicalName,
    Label,
    RawName,
}

/// One term of a CV collection.
///
/// Every term carries three textual views of the same underlying entry plus
/// auxiliary data fields (e.g. `postal_address` on institution terms,
/// `experiment` on experiment terms).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CvTerm {
    pub canonical_name: String,
    pub label: String,
    pub raw_name: String,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl CvTerm {
    pub fn new(
        canonical_name: impl Into<String>,
        label: impl Into<String>,
        raw_name: impl Into<String>,
    ) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            label: label.into(),
            raw_name: raw_name.into(),
            data: BTreeMap::new(),
        }
    }

    /// A term whose canonical and raw names are the lowercased label, the
    /// usual shape of WCRP CV entries.
    pub fn named(label: impl Into<String>) -> Self {
        let label = label.into();
        let lower = label.to_lowercase();
        Self::new(lower.clone(), label, lower)
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// The textual view selected by `kind`.
    pub fn representation(&self, kind: TermKind) -> &str {
        match kind {
            TermKind::CanonicalName => &self.canonical_name,
            TermKind::Label => &self.label,
            TermKind::RawName => &self.raw_name,
        }
    }
}

/// A source of CV collections, e.g. the WCRP CMIP6 vocabulary scope.
pub trait CvSource {
    /// Whether the scope knows a collection of this name.
    fn contains_collection(&self, name: &str) -> bool;

    /// The terms of a collection, or `None` for an unknown collection.
    fn terms(&self, collection: &str) -> Option<Vec<CvTerm>>;
}

/// In-memory CV source, for hosts that preload the vocabulary and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryCv {
    collections: BTreeMap<String, Vec<CvTerm>>,
}

impl MemoryCv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(mut self, name: impl Into<String>, terms: Vec<CvTerm>) -> Self {
        self.collections.insert(name.into(), terms);
        self
    }
}

impl CvSource for MemoryCv {
    fn contains_collection(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    fn terms(&self, collection: &str) -> Option<Vec<CvTerm>> {
        self.collections.get(collection).cloned()
    }
}

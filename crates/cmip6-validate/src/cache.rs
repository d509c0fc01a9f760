//! Memoized controlled-vocabulary term validation.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use cmip6_model::{CvSource, TermKind};

/// Outcome of validating a term against a CV collection.
///
/// "Term not in collection" and "collection unknown to the CV source" are
/// distinct outcomes; callers must not conflate them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermValidity {
    /// The collection contains the term under the requested representation.
    Valid,
    /// The collection exists but does not contain the term.
    Invalid,
    /// The CV source does not recognize the collection name.
    UnknownCollection,
}

impl TermValidity {
    pub fn is_valid(self) -> bool {
        self == Self::Valid
    }
}

/// Memoizing layer over CV lookups.
///
/// Entries are written once per (kind, collection, term) key and never
/// evicted; the term space is small and finite. The cache is built once at
/// process start and injected into each checker rather than reached for
/// globally, so lifetime and test isolation stay explicit.
#[derive(Debug, Default)]
pub struct TermCache {
    state: Mutex<CacheState>,
}

#[derive(Debug, Default)]
struct CacheState {
    /// Whether a collection exists in the CV scope, resolved once per
    /// (kind, collection) pair.
    collections: HashMap<(TermKind, String), bool>,
    terms: HashMap<(TermKind, String, String), TermValidity>,
}

impl TermCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `term` against `collection` under the given representation,
    /// consulting `cv` at most once per distinct key.
    ///
    /// The lock spans the whole check-then-write sequence, so hosts that
    /// parallelize file checks cannot race two first writes for one key.
    pub fn validate(
        &self,
        cv: &dyn CvSource,
        term: &str,
        collection: &str,
        kind: TermKind,
    ) -> TermValidity {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let key = (kind, collection.to_string(), term.to_string());
        if let Some(validity) = state.terms.get(&key) {
            return *validity;
        }

        let collection_key = (kind, collection.to_string());
        let exists = match state.collections.get(&collection_key) {
            Some(exists) => *exists,
            None => {
                let exists = cv.contains_collection(collection);
                state.collections.insert(collection_key, exists);
                exists
            }
        };

        let validity = if !exists {
            TermValidity::UnknownCollection
        } else {
            let found = cv
                .terms(collection)
                .unwrap_or_default()
                .iter()
                .any(|cv_term| cv_term.representation(kind) == term);
            if found {
                TermValidity::Valid
            } else {
                TermValidity::Invalid
            }
        };
        state.terms.insert(key, validity);
        validity
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use cmip6_model::{CvSource, CvTerm};

    use super::*;

    /// CV stub that counts how often the underlying scope is consulted.
    struct CountingCv {
        term: CvTerm,
        contains_calls: Cell<usize>,
        terms_calls: Cell<usize>,
    }

    impl CountingCv {
        fn new() -> Self {
            Self {
                term: CvTerm::named("piControl"),
                contains_calls: Cell::new(0),
                terms_calls: Cell::new(0),
            }
        }
    }

    impl CvSource for CountingCv {
        fn contains_collection(&self, name: &str) -> bool {
            self.contains_calls.set(self.contains_calls.get() + 1);
            name == "experiment-id"
        }

        fn terms(&self, collection: &str) -> Option<Vec<CvTerm>> {
            self.terms_calls.set(self.terms_calls.get() + 1);
            (collection == "experiment-id").then(|| vec![self.term.clone()])
        }
    }

    #[test]
    fn repeated_lookups_hit_the_cache() {
        let cv = CountingCv::new();
        let cache = TermCache::new();

        let first = cache.validate(&cv, "piControl", "experiment-id", TermKind::Label);
        let second = cache.validate(&cv, "piControl", "experiment-id", TermKind::Label);
        assert_eq!(first, TermValidity::Valid);
        assert_eq!(second, first);
        assert_eq!(cv.terms_calls.get(), 1);
        assert_eq!(cv.contains_calls.get(), 1);
    }

    #[test]
    fn term_not_in_collection_is_invalid() {
        let cv = CountingCv::new();
        let cache = TermCache::new();
        assert_eq!(
            cache.validate(&cv, "amip", "experiment-id", TermKind::Label),
            TermValidity::Invalid
        );
    }

    #[test]
    fn unknown_collection_is_memoized_without_term_queries() {
        let cv = CountingCv::new();
        let cache = TermCache::new();

        for term in ["a", "b", "c"] {
            assert_eq!(
                cache.validate(&cv, term, "colour", TermKind::CanonicalName),
                TermValidity::UnknownCollection
            );
        }
        // Collection existence resolved once; term listing never consulted.
        assert_eq!(cv.contains_calls.get(), 1);
        assert_eq!(cv.terms_calls.get(), 0);
    }

    #[test]
    fn representation_kinds_are_cached_independently() {
        let cv = CountingCv::new();
        let cache = TermCache::new();

        assert_eq!(
            cache.validate(&cv, "piControl", "experiment-id", TermKind::Label),
            TermValidity::Valid
        );
        assert_eq!(
            cache.validate(&cv, "piControl", "experiment-id", TermKind::CanonicalName),
            TermValidity::Invalid
        );
        assert_eq!(
            cache.validate(&cv, "picontrol", "experiment-id", TermKind::CanonicalName),
            TermValidity::Valid
        );
    }
}

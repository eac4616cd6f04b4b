//! Distinct tag extraction.

use std::collections::BTreeSet;
use std::sync::{Arc, Weak};

use crate::Document;

/// Returns the union of every document's tags.
pub fn distinct_tags(documents: &[Document]) -> BTreeSet<String> {
    documents
        .iter()
        .flat_map(|doc| doc.tags.iter())
        .map(str::to_owned)
        .collect()
}

/// Memoized [`distinct_tags`] keyed on the identity of a document snapshot.
///
/// Document collections are replaced wholesale on every change, so a new
/// snapshot always has a new allocation and invalidates the cached set. The
/// weak handle keeps the old allocation address from being reused while it is
/// cached.
#[derive(Debug, Default)]
pub struct TagIndex {
    cached: Option<(Weak<Vec<Document>>, BTreeSet<String>)>,
}

impl TagIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the distinct tags of `documents`, recomputing only when the
    /// snapshot differs from the one seen last.
    pub fn tags(&mut self, documents: &Arc<Vec<Document>>) -> &BTreeSet<String> {
        let stale = match &self.cached {
            Some((source, _)) => !Weak::ptr_eq(source, &Arc::downgrade(documents)),
            None => true,
        };

        if stale {
            self.cached = None;
        }

        let (_, tags) = self
            .cached
            .get_or_insert_with(|| (Arc::downgrade(documents), distinct_tags(documents)));
        tags
    }

    /// Returns whether the cached set was computed for `documents`.
    pub fn is_current(&self, documents: &Arc<Vec<Document>>) -> bool {
        self.cached
            .as_ref()
            .is_some_and(|(source, _)| Weak::ptr_eq(source, &Arc::downgrade(documents)))
    }
}

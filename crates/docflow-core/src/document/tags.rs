//! Document tag set.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Tag assigned to every freshly uploaded document.
pub const UPLOAD_TAG: &str = "New";

/// A set of tags attached to a document.
///
/// Insertion order is not meaningful and duplicates collapse, so the tags are
/// kept in a sorted set and serialized as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(BTreeSet<String>);

impl Tags {
    /// Creates a new empty tag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tag set from any iterator of strings.
    pub fn from_strings<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tags.into_iter().map(Into::into).collect())
    }

    /// Returns whether the set contains the specified tag.
    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    /// Returns whether at least one of the given tags is in this set.
    pub fn contains_any<'a, I>(&self, tags: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        tags.into_iter().any(|tag| self.0.contains(tag))
    }

    /// Adds a tag. Returns `true` if it was not present yet.
    pub fn add(&mut self, tag: impl Into<String>) -> bool {
        self.0.insert(tag.into())
    }

    /// Removes a tag. Returns `true` if it was present.
    pub fn remove(&mut self, tag: &str) -> bool {
        self.0.remove(tag)
    }

    /// Returns an iterator over the tags in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns the number of tags.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Tags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_strings(iter)
    }
}

impl<'a> IntoIterator for &'a Tags {
    type IntoIter = std::collections::btree_set::Iter<'a, String>;
    type Item = &'a String;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_collapse() {
        let tags = Tags::from_strings(["Legal", "Contracts", "Legal"]);
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_add_and_remove() {
        let mut tags = Tags::new();
        assert!(tags.add("Finance"));
        assert!(!tags.add("Finance"));
        assert!(tags.remove("Finance"));
        assert!(!tags.remove("Finance"));
        assert!(tags.is_empty());
    }

    #[test]
    fn test_contains_any() {
        let tags = Tags::from_strings(["Finance", "Report"]);
        let wanted = vec!["Legal".to_string(), "Report".to_string()];
        assert!(tags.contains_any(&wanted));
        assert!(!tags.contains_any(&vec!["Legal".to_string()]));
    }

    #[test]
    fn test_serializes_as_array() {
        let tags = Tags::from_strings(["b", "a"]);
        assert_eq!(serde_json::to_string(&tags).unwrap(), r#"["a","b"]"#);
    }
}

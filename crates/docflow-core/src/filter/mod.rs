//! Document filter engine.
//!
//! A [`DocumentFilter`] combines independent categories with logical AND:
//!
//! - name: case-insensitive substring match,
//! - tags: the document must carry at least one selected tag (OR within the category),
//! - upload date: inclusive calendar range, the upper bound extended to the end of its day,
//! - size: inclusive range in mebibytes.
//!
//! Filtering is pure and stable: the output is always a subsequence of the input
//! in the original order.

mod bounds;
mod tags;

use std::collections::BTreeSet;

use jiff::Timestamp;
use jiff::civil::Date;
use jiff::tz::TimeZone;
use serde::{Deserialize, Serialize};

pub use self::bounds::{parse_date_bound, parse_size_bound};
pub use self::tags::{TagIndex, distinct_tags};
use crate::{Document, TRACING_TARGET_FILTER};

/// Filter criteria for a document list.
///
/// The default value matches every document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentFilter {
    /// Case-insensitive substring of the document name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_query: Option<String>,
    /// Documents must carry at least one of these tags.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
    /// Earliest upload day, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<Date>,
    /// Latest upload day, inclusive through 23:59:59.999.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<Date>,
    /// Minimum size in MB, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size_mb: Option<f64>,
    /// Maximum size in MB, inclusive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size_mb: Option<f64>,
}

impl DocumentFilter {
    /// Creates a filter that matches everything.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by name substring.
    pub fn with_name_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.name_query = (!query.is_empty()).then_some(query);
        self
    }

    /// Adds a tag to the accepted tag set.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Replaces the accepted tag set.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Toggles a tag in the accepted set, as a tag chip would.
    pub fn toggle_tag(&mut self, tag: &str) {
        if !self.tags.remove(tag) {
            self.tags.insert(tag.to_owned());
        }
    }

    /// Sets the earliest upload day.
    #[inline]
    pub fn with_date_from(mut self, date: Date) -> Self {
        self.date_from = Some(date);
        self
    }

    /// Sets the latest upload day.
    #[inline]
    pub fn with_date_to(mut self, date: Date) -> Self {
        self.date_to = Some(date);
        self
    }

    /// Sets the minimum size in MB.
    #[inline]
    pub fn with_min_size_mb(mut self, mb: f64) -> Self {
        self.min_size_mb = Some(mb);
        self
    }

    /// Sets the maximum size in MB.
    #[inline]
    pub fn with_max_size_mb(mut self, mb: f64) -> Self {
        self.max_size_mb = Some(mb);
        self
    }

    /// Sets the minimum size from raw user input.
    ///
    /// Unparsable input is logged and leaves the bound unset instead of
    /// rejecting the whole filter.
    pub fn with_min_size_input(mut self, input: &str) -> Self {
        self.min_size_mb = Self::lenient_size(input, "min");
        self
    }

    /// Sets the maximum size from raw user input. See [`Self::with_min_size_input`].
    pub fn with_max_size_input(mut self, input: &str) -> Self {
        self.max_size_mb = Self::lenient_size(input, "max");
        self
    }

    fn lenient_size(input: &str, bound: &'static str) -> Option<f64> {
        parse_size_bound(input).unwrap_or_else(|error| {
            tracing::warn!(
                target: TRACING_TARGET_FILTER,
                bound,
                input,
                %error,
                "ignoring invalid size bound"
            );
            None
        })
    }

    /// Number of non-default categories: name, tags, date range, size range.
    pub fn active_filter_count(&self) -> usize {
        [
            self.name_query.as_deref().is_some_and(|q| !q.is_empty()),
            !self.tags.is_empty(),
            self.date_from.is_some() || self.date_to.is_some(),
            self.min_size_mb.is_some() || self.max_size_mb.is_some(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    /// Returns whether this filter matches everything.
    ///
    /// Callers use this to tell "no documents" apart from "nothing matched".
    #[inline]
    pub fn is_default(&self) -> bool {
        self.active_filter_count() == 0
    }

    /// Resets every category.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Combines two filters into one that matches exactly the documents both
    /// match, when a single filter can express that.
    ///
    /// Returns `None` when the name queries are unrelated substrings or the two
    /// filters select different non-empty tag sets.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let name_query = match (self.name_query.as_deref(), other.name_query.as_deref()) {
            (Some(a), Some(b)) => {
                let (la, lb) = (a.to_lowercase(), b.to_lowercase());
                if la.contains(&lb) {
                    Some(a.to_owned())
                } else if lb.contains(&la) {
                    Some(b.to_owned())
                } else {
                    return None;
                }
            }
            (a, b) => a.or(b).map(str::to_owned),
        };

        let tags = match (self.tags.is_empty(), other.tags.is_empty()) {
            (true, _) => other.tags.clone(),
            (_, true) => self.tags.clone(),
            _ if self.tags == other.tags => self.tags.clone(),
            _ => return None,
        };

        Some(Self {
            name_query,
            tags,
            date_from: max_option(self.date_from, other.date_from),
            date_to: min_option(self.date_to, other.date_to),
            min_size_mb: max_option_f64(self.min_size_mb, other.min_size_mb),
            max_size_mb: min_option_f64(self.max_size_mb, other.max_size_mb),
        })
    }

    /// Resolves calendar bounds in `tz` for repeated matching.
    pub fn compile(&self, tz: &TimeZone) -> CompiledFilter<'_> {
        CompiledFilter {
            filter: self,
            name_query: self.name_query.as_ref().map(|q| q.to_lowercase()),
            from: self.date_from.and_then(|d| bounds::start_of_day(d, tz)),
            to: self.date_to.and_then(|d| bounds::end_of_day(d, tz)),
        }
    }

    /// Returns whether `document` passes, resolving dates in the system time zone.
    pub fn matches(&self, document: &Document) -> bool {
        self.compile(&TimeZone::system()).matches(document)
    }

    /// Filters `documents` with dates resolved in the system time zone.
    pub fn apply(&self, documents: &[Document]) -> Vec<Document> {
        self.apply_in(documents, &TimeZone::system())
    }

    /// Filters `documents` with dates resolved in `tz`.
    pub fn apply_in(&self, documents: &[Document], tz: &TimeZone) -> Vec<Document> {
        let compiled = self.compile(tz);
        let selected: Vec<Document> = compiled.select(documents).cloned().collect();

        tracing::debug!(
            target: TRACING_TARGET_FILTER,
            total = documents.len(),
            matched = selected.len(),
            active_filters = self.active_filter_count(),
            "filtered documents"
        );

        selected
    }
}

/// Filters `documents` by `filter`, preserving input order.
pub fn filter(documents: &[Document], filter: &DocumentFilter) -> Vec<Document> {
    filter.apply(documents)
}

/// A [`DocumentFilter`] with its time zone dependent parts resolved.
#[derive(Debug, Clone)]
pub struct CompiledFilter<'a> {
    filter: &'a DocumentFilter,
    name_query: Option<String>,
    from: Option<Timestamp>,
    to: Option<Timestamp>,
}

impl CompiledFilter<'_> {
    /// Returns whether `document` passes every active category.
    pub fn matches(&self, document: &Document) -> bool {
        if let Some(query) = self.name_query.as_deref()
            && !query.is_empty()
            && !document.name.to_lowercase().contains(query)
        {
            return false;
        }

        if !self.filter.tags.is_empty() && !document.tags.contains_any(&self.filter.tags) {
            return false;
        }

        if self.from.is_some_and(|from| document.uploaded_at < from) {
            return false;
        }
        if self.to.is_some_and(|to| document.uploaded_at > to) {
            return false;
        }

        let size_mb = document.size_mb();
        if self.filter.min_size_mb.is_some_and(|min| size_mb < min) {
            return false;
        }
        if self.filter.max_size_mb.is_some_and(|max| size_mb > max) {
            return false;
        }

        true
    }

    /// Iterates over the matching documents in input order.
    pub fn select<'d>(&self, documents: &'d [Document]) -> impl Iterator<Item = &'d Document> {
        documents.iter().filter(move |doc| self.matches(doc))
    }
}

fn max_option<T: Ord>(a: Option<T>, b: Option<T>) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

fn min_option<T: Ord>(a: Option<T>, b: Option<T>) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn max_option_f64(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

fn min_option_f64(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

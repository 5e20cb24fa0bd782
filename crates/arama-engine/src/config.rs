//! Engine configuration.
//!
//! One [`SearchConfig`] is supplied at construction and never changes for
//! the lifetime of an engine instance. It can be deserialized from a JSON
//! view definition; every field has a serde default so partial configs work.

use std::time::Duration;

use serde::Deserialize;

use arama::{Collation, SortSpec, TextMatcher};

/// Immutable per-engine search configuration.
///
/// The field lists describe which record fields participate in free-text
/// search and which the UI may offer for filtering and sorting; the engine
/// consults `searchable_fields` during local evaluation, while the filter
/// and sort lists are carried for the view layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchConfig {
    /// Dot paths searched by the free-text query.
    pub searchable_fields: Vec<String>,
    /// Dot paths the view may filter on.
    pub filterable_fields: Vec<String>,
    /// Dot paths the view may sort on.
    pub sortable_fields: Vec<String>,
    /// Sort applied when none has been chosen, and restored by `reset`.
    pub default_sort: SortSpec,
    /// Page size.
    pub items_per_page: usize,
    /// Fuzzy subsequence matching instead of substring containment.
    #[serde(rename = "enableFuzzySearch")]
    pub fuzzy: bool,
    /// Turkish character folding and collation.
    #[serde(rename = "enableTurkishSearch")]
    pub turkish: bool,
    /// Quiet period before a mutation triggers execution, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            searchable_fields: Vec::new(),
            filterable_fields: Vec::new(),
            sortable_fields: Vec::new(),
            default_sort: SortSpec::desc("id"),
            items_per_page: 20,
            fuzzy: false,
            turkish: false,
            debounce_ms: 300,
        }
    }
}

impl SearchConfig {
    /// Creates a configuration searching the given fields, with defaults
    /// for everything else.
    pub fn new<I, S>(searchable_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SearchConfig {
            searchable_fields: searchable_fields.into_iter().map(Into::into).collect(),
            ..SearchConfig::default()
        }
    }

    /// Sets the default sort.
    pub fn with_default_sort(mut self, sort: SortSpec) -> Self {
        self.default_sort = sort;
        self
    }

    /// Sets the page size.
    pub fn with_items_per_page(mut self, items_per_page: usize) -> Self {
        self.items_per_page = items_per_page;
        self
    }

    /// Enables or disables fuzzy matching.
    pub fn with_fuzzy(mut self, fuzzy: bool) -> Self {
        self.fuzzy = fuzzy;
        self
    }

    /// Enables or disables Turkish folding and collation.
    pub fn with_turkish(mut self, turkish: bool) -> Self {
        self.turkish = turkish;
        self
    }

    /// Sets the debounce quiet period in milliseconds.
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// The debounce quiet period.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// The text matcher this configuration selects.
    pub fn matcher(&self) -> TextMatcher {
        TextMatcher::new(self.fuzzy, self.turkish)
    }

    /// The collation this configuration selects.
    pub fn collation(&self) -> Collation {
        if self.turkish {
            Collation::Turkish
        } else {
            Collation::Simple
        }
    }
}

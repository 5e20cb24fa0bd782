//! Observable search state.
//!
//! One [`SearchState`] exists per list view, owned exclusively by the
//! engine; the view layer receives clones through the engine's watch
//! channel and renders from them.

use chrono::{DateTime, Utc};

use arama::{Filter, SortSpec};

use crate::config::SearchConfig;

/// Snapshot of a list view's query state and results.
///
/// Invariants maintained by the engine:
/// - `current_page` lies in `[1, max(1, total_pages)]`
/// - `total_pages = max(1, ceil(total_items / items_per_page))`
#[derive(Debug, Clone)]
pub struct SearchState<T> {
    /// Free-text query.
    pub query: String,
    /// Active filters, at most one per field.
    pub filters: Vec<Filter>,
    /// Active sort.
    pub sort: SortSpec,
    /// Current page, 1-based.
    pub current_page: usize,
    /// Page size.
    pub items_per_page: usize,
    /// Committed results. Grows across pages when loading more.
    pub results: Vec<T>,
    /// Total matching items across all pages.
    pub total_items: usize,
    /// Total pages, at least 1.
    pub total_pages: usize,
    /// An execution is in flight.
    pub is_loading: bool,
    /// Pages beyond the current one exist.
    pub has_more: bool,
    /// Completion time of the last committed execution.
    pub last_search_time: Option<DateTime<Utc>>,
}

impl<T> SearchState<T> {
    pub(crate) fn initial(config: &SearchConfig) -> Self {
        SearchState {
            query: String::new(),
            filters: Vec::new(),
            sort: config.default_sort.clone(),
            current_page: 1,
            items_per_page: config.items_per_page.max(1),
            results: Vec::new(),
            total_items: 0,
            total_pages: 1,
            is_loading: false,
            has_more: false,
            last_search_time: None,
        }
    }

    /// Returns `true` if any filter is active.
    pub fn has_active_filters(&self) -> bool {
        !self.filters.is_empty()
    }

    /// Returns `true` if the committed result set is non-empty.
    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }

    /// Returns `true` when a search is settled with nothing to show: not
    /// loading, no results, and a query or filters active.
    pub fn is_empty(&self) -> bool {
        !self.is_loading
            && self.results.is_empty()
            && (!self.query.is_empty() || !self.filters.is_empty())
    }

    /// Adds a filter, replacing any existing filter on the same field in
    /// place so the filter list keeps its order.
    pub(crate) fn upsert_filter(&mut self, filter: Filter) {
        match self.filters.iter_mut().find(|f| f.field == filter.field) {
            Some(existing) => *existing = filter,
            None => self.filters.push(filter),
        }
    }

    /// Removes the filter on a field, if present.
    pub(crate) fn remove_filter(&mut self, field: &str) {
        self.filters.retain(|f| f.field != field);
    }

    /// Drops results and counts back to the empty set.
    pub(crate) fn clear_results(&mut self) {
        self.results.clear();
        self.total_items = 0;
        self.total_pages = 1;
        self.has_more = false;
    }
}

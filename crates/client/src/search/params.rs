//! Canonical search/pagination parameters
//!
//! Filter values are normalized (trimmed, blanks dropped) and kept in a
//! sorted map, so two logically identical parameter sets always render the
//! same cache key regardless of how callers assembled them.

use std::collections::BTreeMap;

use registra_domain::DEFAULT_PAGE_SIZE;

/// Default sort order applied when callers don't specify one.
pub const DEFAULT_SORT: &str = "id,asc";

/// Canonicalized filter, paging, and sort state for list reads.
///
/// `page` is a zero-based index. Any change to a filter value or the sort
/// order resets `page` to 0; changing only the page preserves everything
/// else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    filters: BTreeMap<String, String>,
    page: u32,
    size: u32,
    sort: String,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            filters: BTreeMap::new(),
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: DEFAULT_SORT.to_string(),
        }
    }
}

impl SearchParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonicalize a raw filter collection: values are trimmed and
    /// blank/whitespace-only entries are dropped.
    #[must_use]
    pub fn from_raw<I, K, V>(raw: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut params = Self::new();
        for (field, value) in raw {
            let trimmed = value.as_ref().trim();
            if !trimmed.is_empty() {
                params.filters.insert(field.into(), trimmed.to_string());
            }
        }
        params
    }

    /// Set, replace, or (for blank values) clear a filter.
    ///
    /// Resets the page to 0 only when the canonical value actually changes.
    #[must_use]
    pub fn with_filter(mut self, field: &str, value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            if self.filters.remove(field).is_some() {
                self.page = 0;
            }
        } else if self.filters.get(field).map(String::as_str) != Some(trimmed) {
            self.filters.insert(field.to_string(), trimmed.to_string());
            self.page = 0;
        }
        self
    }

    /// Move to a page, preserving filters, size, and sort.
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Change the page size; resets to the first page.
    #[must_use]
    pub fn with_size(mut self, size: u32) -> Self {
        if self.size != size {
            self.size = size;
            self.page = 0;
        }
        self
    }

    /// Change the sort order; resets to the first page.
    #[must_use]
    pub fn with_sort(mut self, sort: &str) -> Self {
        if self.sort != sort {
            self.sort = sort.to_string();
            self.page = 0;
        }
        self
    }

    #[must_use]
    pub fn filter(&self, field: &str) -> Option<&str> {
        self.filters.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[must_use]
    pub fn sort(&self) -> &str {
        &self.sort
    }

    /// Render the canonical cache key for a resource type.
    ///
    /// Filter names are sorted and blank values never appear, so key-insertion
    /// order cannot produce distinct keys for identical queries.
    #[must_use]
    pub fn cache_key(&self, resource_type: &str) -> String {
        let mut key = String::with_capacity(64);
        key.push_str(resource_type);
        key.push('?');
        for (field, value) in &self.filters {
            key.push_str(field);
            key.push('=');
            key.push_str(value);
            key.push('&');
        }
        key.push_str(&format!("page={}&size={}&sort={}", self.page, self.size, self.sort));
        key
    }

    /// Render the wire query string pairs (`page`, `size`, `sort`, filters).
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("page".to_string(), self.page.to_string()),
            ("size".to_string(), self.size.to_string()),
            ("sort".to_string(), self.sort.clone()),
        ];
        for (field, value) in &self.filters {
            query.push((field.clone(), value.clone()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for parameter canonicalization.
    use super::*;

    #[test]
    fn insertion_order_does_not_change_the_key() {
        let a = SearchParams::from_raw([("lastName", "smith"), ("gradeLevel", "9")]);
        let b = SearchParams::from_raw([("gradeLevel", "9"), ("lastName", "smith")]);

        assert_eq!(a.cache_key("student"), b.cache_key("student"));
    }

    #[test]
    fn blank_values_are_absent() {
        let a = SearchParams::from_raw([("lastName", "smith"), ("email", "   ")]);
        let b = SearchParams::from_raw([("lastName", "smith")]);

        assert_eq!(a, b);
        assert_eq!(a.cache_key("student"), b.cache_key("student"));
        assert!(a.filter("email").is_none());
    }

    #[test]
    fn values_are_trimmed() {
        let params = SearchParams::new().with_filter("lastName", "  smith  ");
        assert_eq!(params.filter("lastName"), Some("smith"));
    }

    #[test]
    fn filter_change_resets_page() {
        let params = SearchParams::new().with_page(4).with_filter("lastName", "smith");
        assert_eq!(params.page(), 0);
    }

    #[test]
    fn unchanged_filter_preserves_page() {
        let params = SearchParams::new().with_filter("lastName", "smith").with_page(4);
        let same = params.clone().with_filter("lastName", " smith ");
        assert_eq!(same.page(), 4);
        assert_eq!(same, params.with_page(4));
    }

    #[test]
    fn clearing_a_filter_resets_page() {
        let params =
            SearchParams::new().with_filter("lastName", "smith").with_page(2).with_filter("lastName", "");
        assert_eq!(params.page(), 0);
        assert!(params.filter("lastName").is_none());
    }

    #[test]
    fn clearing_an_absent_filter_preserves_page() {
        let params = SearchParams::new().with_page(2).with_filter("lastName", "  ");
        assert_eq!(params.page(), 2);
    }

    #[test]
    fn page_change_preserves_filters() {
        let params = SearchParams::new().with_filter("lastName", "smith").with_page(3);
        assert_eq!(params.filter("lastName"), Some("smith"));
        assert_eq!(params.page(), 3);
    }

    #[test]
    fn sort_change_resets_page() {
        let params = SearchParams::new().with_page(3).with_sort("lastName,desc");
        assert_eq!(params.page(), 0);
        assert_eq!(params.sort(), "lastName,desc");
    }

    #[test]
    fn defaults_appear_in_key_and_query() {
        let params = SearchParams::new();
        assert_eq!(
            params.cache_key("student"),
            format!("student?page=0&size={DEFAULT_PAGE_SIZE}&sort={DEFAULT_SORT}")
        );

        let query = params.to_query();
        assert!(query.contains(&("page".to_string(), "0".to_string())));
        assert!(query.contains(&("sort".to_string(), DEFAULT_SORT.to_string())));
    }

    #[test]
    fn key_distinguishes_pages_and_types() {
        let params = SearchParams::new();
        assert_ne!(params.cache_key("student"), params.cache_key("setting"));
        assert_ne!(
            params.clone().with_page(0).cache_key("student"),
            params.with_page(1).cache_key("student")
        );
    }
}

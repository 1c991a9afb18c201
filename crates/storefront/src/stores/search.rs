//! Global search query store.
//!
//! One query is shared by every list view. Filtering is applied locally to
//! whatever page of results a view currently holds; it never requests more
//! pages from the backend, so matches are limited to the held page.

use std::sync::Arc;

use tokio::sync::watch;

use crate::api::types::Product;

/// Hard cap on the raw query length, in characters.
const MAX_QUERY_CHARS: usize = 200;

/// The shared search query.
///
/// Cheaply cloneable; clones share the same query. Mutations that leave
/// the query unchanged do not notify subscribers, so downstream filtering
/// is not recomputed for redundant keystrokes.
#[derive(Clone)]
pub struct SearchStore {
    inner: Arc<watch::Sender<String>>,
}

impl Default for SearchStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchStore {
    /// Create a store with an empty query.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(String::new());
        Self {
            inner: Arc::new(tx),
        }
    }

    /// Set the raw query, truncating to the length cap.
    pub fn set_query(&self, raw: &str) {
        let capped: String = raw.chars().take(MAX_QUERY_CHARS).collect();

        self.inner.send_if_modified(|query| {
            if *query == capped {
                false
            } else {
                tracing::debug!(query = %capped, "Search query updated");
                *query = capped;
                true
            }
        });
    }

    /// Clear the query. A no-op when already empty.
    pub fn clear(&self) {
        self.inner.send_if_modified(|query| {
            if query.is_empty() {
                false
            } else {
                tracing::debug!("Search query cleared");
                query.clear();
                true
            }
        });
    }

    /// The raw query as last set.
    #[must_use]
    pub fn query(&self) -> String {
        self.inner.borrow().clone()
    }

    /// Trimmed, lower-cased view of the query, recomputed on demand.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.inner.borrow().trim().to_lowercase()
    }

    /// Filter a held page of products against the current query.
    ///
    /// `include_category` additionally matches the resolved category name,
    /// which only the flat product list does.
    #[must_use]
    pub fn filter_page<'a>(
        &self,
        products: &'a [Product],
        include_category: bool,
    ) -> Vec<&'a Product> {
        let normalized = self.normalized();
        products
            .iter()
            .filter(|product| matches_product(product, &normalized, include_category))
            .collect()
    }

    /// Subscribe to query changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.inner.subscribe()
    }
}

/// Case-insensitive substring match across a product's text fields.
///
/// An empty query matches every product.
#[must_use]
pub fn matches_product(product: &Product, normalized_query: &str, include_category: bool) -> bool {
    if normalized_query.is_empty() {
        return true;
    }

    let mut haystacks = vec![
        product.name.as_str(),
        product.description.as_str(),
        product.brand.as_str(),
    ];
    if include_category {
        haystacks.push(product.category_name());
    }

    haystacks
        .iter()
        .filter(|field| !field.is_empty())
        .any(|field| field.to_lowercase().contains(normalized_query))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::api::fallback;

    #[test]
    fn test_normalized_trims_and_lowercases() {
        let search = SearchStore::new();
        search.set_query("  CaMeRa  ");
        assert_eq!(search.query(), "  CaMeRa  ");
        assert_eq!(search.normalized(), "camera");
    }

    #[test]
    fn test_query_is_capped_at_200_chars() {
        let search = SearchStore::new();
        search.set_query(&"x".repeat(500));
        assert_eq!(search.query().chars().count(), 200);
    }

    #[test]
    fn test_redundant_set_does_not_notify() {
        let search = SearchStore::new();
        search.set_query("camera");

        let mut rx = search.subscribe();
        search.set_query("camera");
        assert!(!rx.has_changed().expect("channel open"));

        search.set_query("cam");
        assert!(rx.has_changed().expect("channel open"));
    }

    #[test]
    fn test_clear_when_empty_does_not_notify() {
        let search = SearchStore::new();
        let mut rx = search.subscribe();

        search.clear();
        assert!(!rx.has_changed().expect("channel open"));

        search.set_query("something");
        search.clear();
        assert_eq!(search.query(), "");
    }

    #[test]
    fn test_filter_matches_name_substring() {
        let search = SearchStore::new();
        let page = fallback::catalog();

        search.set_query("cam");
        let filtered = search.filter_page(&page, true);
        assert!(
            filtered
                .iter()
                .any(|p| p.name == "Professional DSLR Camera")
        );

        search.clear();
        assert_eq!(search.filter_page(&page, true).len(), page.len());
    }

    #[test]
    fn test_filter_matches_brand_and_description() {
        let page = fallback::catalog();

        let by_brand: Vec<_> = page
            .iter()
            .filter(|p| matches_product(p, "soundtech", false))
            .collect();
        assert_eq!(by_brand.len(), 1);

        let by_description: Vec<_> = page
            .iter()
            .filter(|p| matches_product(p, "noise cancellation", false))
            .collect();
        assert_eq!(by_description.len(), 1);
    }

    #[test]
    fn test_category_only_matches_when_included() {
        let page = fallback::catalog();

        let with_category: Vec<_> = page
            .iter()
            .filter(|p| matches_product(p, "home-decor", true))
            .collect();
        assert_eq!(with_category.len(), 1);

        let without_category: Vec<_> = page
            .iter()
            .filter(|p| matches_product(p, "home-decor", false))
            .collect();
        assert!(without_category.is_empty());
    }
}

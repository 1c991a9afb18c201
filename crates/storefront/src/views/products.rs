//! Flat product listing view.

use tracing::instrument;

use crate::api::types::{Product, ProductPage};
use crate::api::{ApiError, StorefrontApi, fallback};
use crate::stores::SearchStore;

use super::{LoadState, PageRequest, resolve_page};

/// Paginated view over the whole catalog.
///
/// Holds exactly one server page at a time. The shared search query filters
/// the held page locally; it does not trigger additional fetches.
pub struct ProductsView {
    api: StorefrontApi,
    search: SearchStore,
    per_page: u32,
    current_page: u32,
    total_pages: u32,
    total_count: u64,
    products: Vec<Product>,
    state: LoadState,
}

impl ProductsView {
    /// Create an idle view; nothing is fetched until [`Self::load`].
    #[must_use]
    pub fn new(api: StorefrontApi, search: SearchStore, per_page: u32) -> Self {
        Self {
            api,
            search,
            per_page,
            current_page: 1,
            total_pages: 1,
            total_count: 0,
            products: Vec::new(),
            state: LoadState::Idle,
        }
    }

    /// Fetch the current page from the API.
    ///
    /// On transport failure the view keeps an error message and falls back
    /// to the fixed catalog rather than rendering empty. A response that
    /// parses but has the wrong envelope shape falls back silently.
    #[instrument(skip(self), fields(page = self.current_page))]
    pub async fn load(&mut self) {
        self.state = LoadState::Loading;

        match self.api.products(self.current_page, self.per_page).await {
            Ok(page) => {
                tracing::info!(
                    count = page.products.len(),
                    total = page.total,
                    pages = page.pages,
                    "Products page loaded"
                );
                self.apply_page(page);
                self.state = LoadState::Loaded;
            }
            Err(ApiError::UnexpectedResponse(detail)) => {
                tracing::warn!(%detail, "Invalid product listing, using fallback catalog");
                self.apply_fallback();
                self.state = LoadState::Loaded;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load products");
                self.apply_fallback();
                self.state =
                    LoadState::Error("Failed to load products. Please try again later.".to_owned());
            }
        }
    }

    /// Change page and re-fetch. Requests outside `[1, total_pages]` are a
    /// no-op; a previously seen page is still re-fetched, never reused.
    pub async fn change_page(&mut self, request: PageRequest) {
        let next = resolve_page(request, self.current_page, self.total_pages);
        if next == self.current_page {
            return;
        }
        self.current_page = next;
        self.load().await;
    }

    /// The held page filtered by the shared search query, category name
    /// included in the match.
    #[must_use]
    pub fn filtered(&self) -> Vec<&Product> {
        self.search.filter_page(&self.products, true)
    }

    fn apply_page(&mut self, page: ProductPage) {
        self.products = page.products;
        self.total_count = page.total;
        self.total_pages = page.pages;
    }

    fn apply_fallback(&mut self) {
        self.apply_page(fallback::paginate(self.current_page, self.per_page));
    }

    // =========================================================================
    // Display Accessors
    // =========================================================================

    #[must_use]
    pub const fn state(&self) -> &LoadState {
        &self.state
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    #[must_use]
    pub const fn total_count(&self) -> u64 {
        self.total_count
    }

    #[must_use]
    pub const fn is_prev_disabled(&self) -> bool {
        self.current_page == 1
    }

    #[must_use]
    pub const fn is_next_disabled(&self) -> bool {
        self.current_page == self.total_pages
    }

    /// All page numbers, for rendering pagination controls.
    #[must_use]
    pub fn page_numbers(&self) -> Vec<u32> {
        (1..=self.total_pages).collect()
    }

    /// Index of the last product on the current page, 1-based, for the
    /// "showing x-y of z" line.
    #[must_use]
    pub fn end_product_index(&self) -> u64 {
        (u64::from(self.current_page) * u64::from(self.per_page)).min(self.total_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::StorefrontConfig;

    fn view(per_page: u32) -> ProductsView {
        let api = StorefrontApi::new(&StorefrontConfig::default()).expect("client builds");
        ProductsView::new(api, SearchStore::new(), per_page)
    }

    /// A view holding one applied server page, as if a load completed.
    fn loaded_view(page: u32, pages: u32, total: u64) -> ProductsView {
        let mut v = view(18);
        v.current_page = page;
        v.apply_page(ProductPage {
            products: fallback::catalog(),
            total,
            page,
            pages,
        });
        v.state = LoadState::Loaded;
        v
    }

    #[tokio::test]
    async fn test_change_page_out_of_bounds_is_noop() {
        // 42 products at 18 per page: 3 pages
        let mut v = loaded_view(2, 3, 42);

        v.change_page(PageRequest::Page(0)).await;
        assert_eq!(v.current_page(), 2);

        v.change_page(PageRequest::Page(4)).await;
        assert_eq!(v.current_page(), 2);
    }

    #[tokio::test]
    async fn test_change_page_at_edges_is_noop() {
        let mut v = loaded_view(1, 3, 42);
        v.change_page(PageRequest::Prev).await;
        assert_eq!(v.current_page(), 1);

        let mut v = loaded_view(3, 3, 42);
        v.change_page(PageRequest::Next).await;
        assert_eq!(v.current_page(), 3);
    }

    #[test]
    fn test_filtered_applies_search_query() {
        let v = loaded_view(1, 1, 6);
        v.search.set_query("cam");

        let filtered = v.filtered();
        assert!(
            filtered
                .iter()
                .any(|p| p.name == "Professional DSLR Camera")
        );
        assert!(filtered.len() < v.products().len());

        v.search.clear();
        assert_eq!(v.filtered().len(), v.products().len());
    }

    #[test]
    fn test_filtered_matches_category_name() {
        let v = loaded_view(1, 1, 6);
        v.search.set_query("plants");
        assert!(!v.filtered().is_empty());
    }

    #[test]
    fn test_pagination_display_helpers() {
        let v = loaded_view(3, 3, 42);
        assert!(v.is_next_disabled());
        assert!(!v.is_prev_disabled());
        assert_eq!(v.page_numbers(), vec![1, 2, 3]);
        // Page 3 of 42 at 18 per page shows through item 42, not 54
        assert_eq!(v.end_product_index(), 42);
    }

    #[test]
    fn test_new_view_is_idle() {
        let v = view(18);
        assert_eq!(*v.state(), LoadState::Idle);
        assert!(v.products().is_empty());
        assert_eq!(v.current_page(), 1);
    }
}

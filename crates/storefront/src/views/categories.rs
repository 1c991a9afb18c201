//! Category browser: category list plus per-category product pages.

use tracing::instrument;

use crate::api::types::{Category, Product, ProductPage};
use crate::api::{ApiError, StorefrontApi};
use crate::stores::SearchStore;

use super::{LoadState, PageRequest, resolve_page};

/// Two-level view: the category list, and the paginated products of the
/// selected category.
///
/// Category list and product page keep independent load state, so a failed
/// product fetch does not disturb the already-loaded category list.
pub struct CategoryBrowser {
    api: StorefrontApi,
    search: SearchStore,
    per_page: u32,

    categories: Vec<Category>,
    categories_state: LoadState,

    selected: Option<Category>,
    products: Vec<Product>,
    products_state: LoadState,
    current_page: u32,
    total_pages: u32,
    total_count: u64,
}

impl CategoryBrowser {
    /// Create an idle browser; nothing is fetched until
    /// [`Self::load_categories`].
    #[must_use]
    pub fn new(api: StorefrontApi, search: SearchStore, per_page: u32) -> Self {
        Self {
            api,
            search,
            per_page,
            categories: Vec::new(),
            categories_state: LoadState::Idle,
            selected: None,
            products: Vec::new(),
            products_state: LoadState::Idle,
            current_page: 1,
            total_pages: 1,
            total_count: 0,
        }
    }

    /// Fetch the category list.
    #[instrument(skip(self))]
    pub async fn load_categories(&mut self) {
        self.categories_state = LoadState::Loading;

        match self.api.categories().await {
            Ok(categories) => {
                tracing::info!(count = categories.len(), "Categories loaded");
                self.categories = categories;
                self.categories_state = LoadState::Loaded;
            }
            Err(ApiError::UnexpectedResponse(detail)) => {
                tracing::warn!(%detail, "Invalid categories response");
                self.categories_state =
                    LoadState::Error("Invalid categories data received.".to_owned());
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load categories");
                self.categories_state = LoadState::Error(
                    "Failed to load categories. Please try again later.".to_owned(),
                );
            }
        }
    }

    /// Select a category and fetch its first product page.
    pub async fn select_category(&mut self, category: Category) {
        tracing::info!(category = %category.name, "Category selected");
        self.selected = Some(category);
        self.current_page = 1;
        self.load_products().await;
    }

    /// Fetch the current product page of the selected category.
    ///
    /// A no-op when no category is selected.
    #[instrument(skip(self), fields(page = self.current_page))]
    pub async fn load_products(&mut self) {
        let Some(category) = self.selected.clone() else {
            return;
        };

        self.products_state = LoadState::Loading;

        match self
            .api
            .products_by_category(&category.id, self.current_page, self.per_page)
            .await
        {
            Ok(page) => {
                tracing::info!(
                    category = %category.name,
                    count = page.products.len(),
                    "Category products loaded"
                );
                self.apply_page(page);
                self.products_state = LoadState::Loaded;
            }
            Err(ApiError::UnexpectedResponse(detail)) => {
                tracing::warn!(%detail, "Invalid category products response");
                self.products_state =
                    LoadState::Error("Invalid products data received.".to_owned());
            }
            Err(e) => {
                tracing::error!(error = %e, category = %category.name, "Failed to load products");
                self.products_state = LoadState::Error(format!(
                    "Failed to load products for {}. Please try again later.",
                    category.name
                ));
            }
        }
    }

    /// Change product page and re-fetch.
    ///
    /// A no-op without a selected category, or when the request falls
    /// outside `[1, total_pages]`.
    pub async fn change_page(&mut self, request: PageRequest) {
        if self.selected.is_none() {
            tracing::warn!("Page change requested with no category selected");
            return;
        }

        let next = resolve_page(request, self.current_page, self.total_pages);
        if next == self.current_page {
            return;
        }
        self.current_page = next;
        self.load_products().await;
    }

    /// Return to the category list, dropping the selection and held page.
    pub fn back_to_categories(&mut self) {
        self.selected = None;
        self.products.clear();
        self.products_state = LoadState::Idle;
        self.current_page = 1;
        self.total_pages = 1;
        self.total_count = 0;
    }

    /// The held product page filtered by the shared search query. Category
    /// name is not part of the match here; the category is already fixed.
    #[must_use]
    pub fn filtered(&self) -> Vec<&Product> {
        self.search.filter_page(&self.products, false)
    }

    fn apply_page(&mut self, page: ProductPage) {
        self.products = page.products;
        self.total_count = page.total;
        self.total_pages = page.pages;
    }

    // =========================================================================
    // Display Accessors
    // =========================================================================

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub const fn categories_state(&self) -> &LoadState {
        &self.categories_state
    }

    #[must_use]
    pub const fn selected(&self) -> Option<&Category> {
        self.selected.as_ref()
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub const fn products_state(&self) -> &LoadState {
        &self.products_state
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
    pub const fn is_prev_disabled(&self) -> bool {
        self.current_page == 1
    }

    #[must_use]
    pub const fn is_next_disabled(&self) -> bool {
        self.current_page == self.total_pages
    }

    #[must_use]
    pub fn page_numbers(&self) -> Vec<u32> {
        (1..=self.total_pages).collect()
    }

    #[must_use]
    pub fn end_product_index(&self) -> u64 {
        (u64::from(self.current_page) * u64::from(self.per_page)).min(self.total_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use bazaar_core::CategoryId;

    use crate::api::fallback;
    use crate::config::StorefrontConfig;

    fn browser() -> CategoryBrowser {
        let api = StorefrontApi::new(&StorefrontConfig::default()).expect("client builds");
        CategoryBrowser::new(api, SearchStore::new(), 12)
    }

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: CategoryId::new(id),
            name: name.to_owned(),
            slug: String::new(),
            parent_id: None,
            image: String::new(),
        }
    }

    /// A browser with a selected category and one applied product page.
    fn loaded_browser(page: u32, pages: u32, total: u64) -> CategoryBrowser {
        let mut b = browser();
        b.selected = Some(category("cat-1", "Electronics"));
        b.current_page = page;
        b.apply_page(ProductPage {
            products: fallback::catalog(),
            total,
            page,
            pages,
        });
        b.products_state = LoadState::Loaded;
        b
    }

    #[tokio::test]
    async fn test_change_page_without_selection_is_noop() {
        let mut b = browser();
        b.change_page(PageRequest::Next).await;
        assert_eq!(b.current_page(), 1);
        assert_eq!(*b.products_state(), LoadState::Idle);
    }

    #[tokio::test]
    async fn test_change_page_out_of_bounds_is_noop() {
        let mut b = loaded_browser(2, 3, 30);

        b.change_page(PageRequest::Page(0)).await;
        assert_eq!(b.current_page(), 2);

        b.change_page(PageRequest::Page(7)).await;
        assert_eq!(b.current_page(), 2);
    }

    #[tokio::test]
    async fn test_load_products_without_selection_is_noop() {
        let mut b = browser();
        b.load_products().await;
        assert_eq!(*b.products_state(), LoadState::Idle);
        assert!(b.products().is_empty());
    }

    #[test]
    fn test_back_to_categories_resets_product_state() {
        let mut b = loaded_browser(2, 3, 30);
        b.back_to_categories();

        assert!(b.selected().is_none());
        assert!(b.products().is_empty());
        assert_eq!(b.current_page(), 1);
        assert_eq!(*b.products_state(), LoadState::Idle);
    }

    #[test]
    fn test_filtered_ignores_category_name() {
        let b = loaded_browser(1, 1, 6);

        // "home-decor" only appears as a category id, which this view
        // does not match against
        b.search.set_query("home-decor");
        assert!(b.filtered().is_empty());

        b.search.set_query("vases");
        assert_eq!(b.filtered().len(), 1);
    }

    #[test]
    fn test_pagination_display_helpers() {
        let b = loaded_browser(3, 3, 30);
        assert!(b.is_next_disabled());
        assert!(!b.is_prev_disabled());
        assert_eq!(b.page_numbers(), vec![1, 2, 3]);
        assert_eq!(b.end_product_index(), 30);
    }
}

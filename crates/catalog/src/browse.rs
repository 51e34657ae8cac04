//! Browse state and the filter → sort → page pipeline over a `CatalogStore`.

use serde::{Deserialize, Serialize};

use storefront_core::{CategoryId, DomainResult};

use crate::filter::{FilterCriteria, FilterEngine, PriceRange};
use crate::paginate::Paginator;
use crate::product::Product;
use crate::sort::{SortEngine, SortMode};
use crate::store::{CatalogStore, ProductSource, SourceError};

/// Everything the user has selected on the catalog page.
///
/// Mutated only through the methods below. Any change to the criteria or the
/// sort mode puts the pager back on page 1, since the old page number may
/// point past the end of the new result set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowseState {
    criteria: FilterCriteria,
    sort: SortMode,
    pager: Paginator,
}

impl BrowseState {
    pub fn new(page_size: usize) -> DomainResult<Self> {
        Ok(Self {
            criteria: FilterCriteria::default(),
            sort: SortMode::default(),
            pager: Paginator::new(page_size)?,
        })
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    pub fn pager(&self) -> &Paginator {
        &self.pager
    }

    pub fn page(&self) -> usize {
        self.pager.page()
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.pager.reset();
    }

    /// Add the category to the selection, or remove it if already selected.
    pub fn toggle_category(&mut self, category: CategoryId) {
        if !self.criteria.categories.remove(&category) {
            self.criteria.categories.insert(category);
        }
        self.pager.reset();
    }

    pub fn set_price_range(&mut self, range: PriceRange) {
        self.criteria.price = range;
        self.pager.reset();
    }

    pub fn set_want_in_stock(&mut self, want: bool) {
        self.criteria.want_in_stock = want;
        self.pager.reset();
    }

    pub fn set_want_pre_order(&mut self, want: bool) {
        self.criteria.want_pre_order = want;
        self.pager.reset();
    }

    pub fn clear_filters(&mut self) {
        self.criteria = FilterCriteria::default();
        self.pager.reset();
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        self.sort = sort;
        self.pager.reset();
    }

    pub fn go_to_page(&mut self, page: usize) -> bool {
        self.pager.go_to_page(page)
    }

    pub fn next_page(&mut self) -> bool {
        self.pager.next_page()
    }

    pub fn prev_page(&mut self) -> bool {
        self.pager.prev_page()
    }

    fn set_total(&mut self, total: usize) {
        self.pager.set_total(total);
    }
}

/// Serializable rendering of the current page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageView {
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_results: usize,
    pub sort: SortMode,
    pub items: Vec<Product>,
}

/// Drives browsing over a catalog.
///
/// Results are recomputed in full (filter, then sort) whenever the catalog,
/// the criteria or the sort mode change. Catalogs are small enough that this
/// stays cheap.
#[derive(Debug, Clone)]
pub struct CatalogBrowser {
    store: CatalogStore,
    state: BrowseState,
    results: Vec<Product>,
}

impl CatalogBrowser {
    pub fn new(store: CatalogStore, page_size: usize) -> DomainResult<Self> {
        let mut browser = Self {
            store,
            state: BrowseState::new(page_size)?,
            results: Vec::new(),
        };
        browser.refresh();
        Ok(browser)
    }

    /// Resume from a previously serialized state. The page is pulled back
    /// into range if the catalog shrank in the meantime.
    pub fn restore(&mut self, state: BrowseState) {
        self.state = state;
        self.refresh();
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn state(&self) -> &BrowseState {
        &self.state
    }

    /// Re-fetch the catalog and recompute results.
    ///
    /// A failed load leaves the current results untouched.
    pub async fn reload<S>(&mut self, source: &S) -> Result<usize, SourceError>
    where
        S: ProductSource + ?Sized,
    {
        let count = self.store.reload(source).await?;
        self.refresh();
        Ok(count)
    }

    pub fn replace_store(&mut self, store: CatalogStore) {
        self.store = store;
        self.refresh();
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.state.set_criteria(criteria);
        self.refresh();
    }

    pub fn toggle_category(&mut self, category: CategoryId) {
        self.state.toggle_category(category);
        self.refresh();
    }

    pub fn set_price_range(&mut self, range: PriceRange) {
        self.state.set_price_range(range);
        self.refresh();
    }

    pub fn set_want_in_stock(&mut self, want: bool) {
        self.state.set_want_in_stock(want);
        self.refresh();
    }

    pub fn set_want_pre_order(&mut self, want: bool) {
        self.state.set_want_pre_order(want);
        self.refresh();
    }

    pub fn clear_filters(&mut self) {
        self.state.clear_filters();
        self.refresh();
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        self.state.set_sort(sort);
        self.refresh();
    }

    pub fn go_to_page(&mut self, page: usize) -> bool {
        self.state.go_to_page(page)
    }

    pub fn next_page(&mut self) -> bool {
        self.state.next_page()
    }

    pub fn prev_page(&mut self) -> bool {
        self.state.prev_page()
    }

    pub fn page(&self) -> usize {
        self.state.page()
    }

    pub fn total_pages(&self) -> usize {
        self.state.pager().total_pages()
    }

    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    /// Full filtered and sorted result set.
    pub fn results(&self) -> &[Product] {
        &self.results
    }

    pub fn current_page_items(&self) -> &[Product] {
        self.state.pager().window(&self.results)
    }

    pub fn snapshot(&self) -> PageView {
        let pager = self.state.pager();
        PageView {
            page: pager.page(),
            page_size: pager.page_size(),
            total_pages: pager.total_pages(),
            total_results: self.results.len(),
            sort: self.state.sort(),
            items: self.current_page_items().to_vec(),
        }
    }

    fn refresh(&mut self) {
        let mut results = FilterEngine::apply(self.store.products(), self.state.criteria());
        SortEngine::sort_in_place(&mut results, self.state.sort());
        tracing::debug!(
            results = results.len(),
            sort = %self.state.sort(),
            "catalog results recomputed"
        );
        self.state.set_total(results.len());
        self.results = results;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paginate::DEFAULT_PAGE_SIZE;
    use crate::product::StockStatus;
    use storefront_core::ProductId;

    fn catalog(n: usize) -> CatalogStore {
        CatalogStore::from_products(
            (1..=n)
                .map(|i| {
                    let mut p = Product::new(ProductId::new(), format!("item {i}"));
                    p.price = Some(i as u64 * 100);
                    p
                })
                .collect(),
        )
    }

    fn names(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn seven_products_two_pages() {
        let mut browser = CatalogBrowser::new(catalog(7), DEFAULT_PAGE_SIZE).unwrap();

        assert_eq!(browser.total_pages(), 2);
        assert_eq!(
            names(browser.current_page_items()),
            ["item 1", "item 2", "item 3", "item 4", "item 5", "item 6"]
        );

        assert!(browser.go_to_page(2));
        assert_eq!(names(browser.current_page_items()), ["item 7"]);

        assert!(!browser.go_to_page(3));
        assert_eq!(browser.page(), 2);
    }

    #[test]
    fn every_filter_or_sort_change_resets_page() {
        let category = storefront_core::CategoryId::new();
        let products = catalog(30)
            .products()
            .iter()
            .cloned()
            .map(|mut p| {
                p.category_id = Some(category);
                p
            })
            .collect();
        let mut browser = CatalogBrowser::new(CatalogStore::from_products(products), 5).unwrap();
        type Change = Box<dyn Fn(&mut CatalogBrowser)>;
        let changes: Vec<Change> = vec![
            Box::new(|b: &mut CatalogBrowser| b.set_sort(SortMode::PriceDesc)),
            Box::new(|b: &mut CatalogBrowser| {
                b.set_price_range(PriceRange::between(0, 2_500).unwrap())
            }),
            Box::new(|b: &mut CatalogBrowser| b.set_want_in_stock(true)),
            Box::new(|b: &mut CatalogBrowser| b.set_want_pre_order(false)),
            Box::new(move |b: &mut CatalogBrowser| b.toggle_category(category)),
            Box::new(move |b: &mut CatalogBrowser| b.toggle_category(category)),
            Box::new(|b: &mut CatalogBrowser| b.set_criteria(FilterCriteria::default())),
            Box::new(|b: &mut CatalogBrowser| b.clear_filters()),
        ];

        for change in changes {
            assert!(browser.go_to_page(3));
            change(&mut browser);
            assert_eq!(browser.page(), 1);
        }
    }

    #[test]
    fn shrinking_results_never_strand_the_page() {
        let mut browser = CatalogBrowser::new(catalog(30), 6).unwrap();
        assert!(browser.go_to_page(5));

        browser.set_price_range(PriceRange::between(0, 700).unwrap());

        assert_eq!(browser.result_count(), 7);
        assert_eq!(browser.page(), 1);
        assert_eq!(browser.current_page_items().len(), 6);
    }

    #[test]
    fn both_stock_toggles_empty_the_page() {
        let mut browser = CatalogBrowser::new(catalog(4), 6).unwrap();
        browser.set_want_in_stock(true);
        assert_eq!(browser.result_count(), 4);
        browser.set_want_pre_order(true);
        assert_eq!(browser.result_count(), 0);
        assert_eq!(browser.total_pages(), 0);
        assert!(browser.current_page_items().is_empty());
    }

    #[test]
    fn pipeline_filters_then_sorts() {
        let mut products: Vec<Product> = catalog(5).products().to_vec();
        products[1].stock_status = StockStatus::PreOrder;
        products[3].stock_status = StockStatus::PreOrder;
        let mut browser = CatalogBrowser::new(CatalogStore::from_products(products), 6).unwrap();

        browser.set_want_pre_order(true);
        browser.set_sort(SortMode::PriceDesc);

        assert_eq!(names(browser.results()), ["item 4", "item 2"]);
    }

    #[test]
    fn state_survives_serialization() {
        let mut browser = CatalogBrowser::new(catalog(20), 6).unwrap();
        browser.set_sort(SortMode::PriceDesc);
        browser.set_want_in_stock(true);
        assert!(browser.go_to_page(3));

        let json = serde_json::to_string(browser.state()).unwrap();
        let state: BrowseState = serde_json::from_str(&json).unwrap();

        let mut resumed = CatalogBrowser::new(catalog(20), 6).unwrap();
        resumed.restore(state);

        assert_eq!(resumed.page(), 3);
        assert_eq!(resumed.state().sort(), SortMode::PriceDesc);
        assert!(resumed.state().criteria().want_in_stock);
    }

    #[test]
    fn restore_clamps_page_to_smaller_catalog() {
        let mut big = CatalogBrowser::new(catalog(40), 6).unwrap();
        assert!(big.go_to_page(7));

        let mut small = CatalogBrowser::new(catalog(8), 6).unwrap();
        small.restore(big.state().clone());

        assert_eq!(small.page(), 2);
        assert_eq!(small.current_page_items().len(), 2);
    }

    #[test]
    fn snapshot_describes_current_page() {
        let mut browser = CatalogBrowser::new(catalog(13), 6).unwrap();
        assert!(browser.next_page());

        let view = browser.snapshot();

        assert_eq!(view.page, 2);
        assert_eq!(view.page_size, 6);
        assert_eq!(view.total_pages, 3);
        assert_eq!(view.total_results, 13);
        assert_eq!(view.items.len(), 6);
        assert_eq!(view.items[0].name, "item 7");
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(CatalogBrowser::new(catalog(1), 0).is_err());
    }
}

//! In-memory catalog: the single source of truth for browsing.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use storefront_core::{CategoryId, ProductId};

use crate::product::{Product, sort_images};

/// Catalog load failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("catalog source unavailable: {0}")]
    Unavailable(String),

    #[error("failed to decode catalog: {0}")]
    Decode(String),
}

/// Read side of the external persistence layer.
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// All products with their images embedded.
    async fn list_products(&self) -> Result<Vec<Product>, SourceError>;
}

#[async_trait]
impl<S> ProductSource for Arc<S>
where
    S: ProductSource + ?Sized,
{
    async fn list_products(&self) -> Result<Vec<Product>, SourceError> {
        (**self).list_products().await
    }
}

/// Full, unfiltered product collection, fetched once and re-fetched on demand.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    products: Vec<Product>,
    loaded: bool,
    last_error: Option<SourceError>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store directly (image lists are put into display order).
    pub fn from_products(products: Vec<Product>) -> Self {
        let mut store = Self::new();
        store.replace(products);
        store
    }

    /// Re-fetch the catalog.
    ///
    /// On failure the previous collection is kept (empty on a first load) and
    /// the error is remembered for display until the next successful load.
    pub async fn reload<S>(&mut self, source: &S) -> Result<usize, SourceError>
    where
        S: ProductSource + ?Sized,
    {
        match source.list_products().await {
            Ok(products) => {
                self.replace(products);
                tracing::info!(products = self.products.len(), "catalog loaded");
                Ok(self.products.len())
            }
            Err(err) => {
                tracing::warn!(error = %err, kept = self.products.len(), "catalog load failed; keeping previous state");
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    fn replace(&mut self, mut products: Vec<Product>) {
        for product in &mut products {
            sort_images(&mut product.images);
        }
        self.products = products;
        self.loaded = true;
        self.last_error = None;
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Whether at least one load has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Error from the most recent failed load, cleared by the next success.
    pub fn last_error(&self) -> Option<&SourceError> {
        self.last_error.as_ref()
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.slug == slug)
    }

    /// Distinct categories referenced by the catalog.
    pub fn categories(&self) -> Vec<CategoryId> {
        self.products
            .iter()
            .filter_map(|p| p.category_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Highest known price; the natural upper end of a price slider.
    pub fn price_ceiling(&self) -> Option<u64> {
        self.products.iter().filter_map(|p| p.price).max()
    }

    /// Active products flagged for the home page.
    pub fn homepage(&self) -> Vec<&Product> {
        self.active_where(|p| p.show_on_homepage)
    }

    pub fn featured(&self) -> Vec<&Product> {
        self.active_where(|p| p.is_featured)
    }

    pub fn new_arrivals(&self) -> Vec<&Product> {
        self.active_where(|p| p.is_new)
    }

    pub fn bestsellers(&self) -> Vec<&Product> {
        self.active_where(|p| p.is_bestseller)
    }

    fn active_where(&self, pred: impl Fn(&Product) -> bool) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.is_active() && pred(p))
            .collect()
    }
}

//! Multi-attribute product filtering.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use storefront_core::{CategoryId, DomainError, DomainResult, ValueObject};

use crate::product::{Product, StockStatus};

/// Closed price interval in smallest currency unit. `max = None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: u64,
    pub max: Option<u64>,
}

impl PriceRange {
    /// `[0, +∞)`.
    pub const UNBOUNDED: PriceRange = PriceRange { min: 0, max: None };

    /// Build a range, rejecting `min > max`.
    pub fn new(min: u64, max: Option<u64>) -> DomainResult<Self> {
        if let Some(max) = max {
            if min > max {
                return Err(DomainError::validation(format!(
                    "price range minimum {min} exceeds maximum {max}"
                )));
            }
        }
        Ok(Self { min, max })
    }

    /// `[min, max]`, both ends inclusive.
    pub fn between(min: u64, max: u64) -> DomainResult<Self> {
        Self::new(min, Some(max))
    }

    pub fn contains(&self, price: u64) -> bool {
        price >= self.min && self.max.is_none_or(|max| price <= max)
    }

    pub fn is_unbounded(&self) -> bool {
        *self == Self::UNBOUNDED
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

impl ValueObject for PriceRange {}

/// Combined category / price / stock selection applied to the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Selected categories. Empty means no category restriction.
    pub categories: BTreeSet<CategoryId>,
    pub price: PriceRange,
    pub want_in_stock: bool,
    pub want_pre_order: bool,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: CategoryId) -> Self {
        self.categories.insert(category);
        self
    }

    pub fn with_price(mut self, price: PriceRange) -> Self {
        self.price = price;
        self
    }

    pub fn in_stock_only(mut self) -> Self {
        self.want_in_stock = true;
        self
    }

    pub fn pre_order_only(mut self) -> Self {
        self.want_pre_order = true;
        self
    }

    /// True when no predicate would exclude anything.
    pub fn is_unrestricted(&self) -> bool {
        self.categories.is_empty()
            && self.price.is_unbounded()
            && !self.want_in_stock
            && !self.want_pre_order
    }

    /// Whether a single product survives every active predicate.
    pub fn matches(&self, product: &Product) -> bool {
        self.category_matches(product)
            && self.price_matches(product)
            && self.in_stock_matches(product)
            && self.pre_order_matches(product)
    }

    fn category_matches(&self, product: &Product) -> bool {
        if self.categories.is_empty() {
            return true;
        }
        product
            .category_id
            .is_some_and(|c| self.categories.contains(&c))
    }

    // Unknown price never excludes a product.
    fn price_matches(&self, product: &Product) -> bool {
        product.price.is_none_or(|p| self.price.contains(p))
    }

    fn in_stock_matches(&self, product: &Product) -> bool {
        !self.want_in_stock || product.stock_status == StockStatus::InStock
    }

    // Applied on top of the in-stock toggle, not instead of it: with both
    // toggles on nothing can match.
    fn pre_order_matches(&self, product: &Product) -> bool {
        !self.want_pre_order || product.stock_status == StockStatus::PreOrder
    }
}

impl ValueObject for FilterCriteria {}

/// Derives the filtered subset of a product collection.
///
/// Pure: input order is preserved and the input is never modified.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterEngine;

impl FilterEngine {
    /// Owned copies of every product matching `criteria`, in input order.
    pub fn apply(products: &[Product], criteria: &FilterCriteria) -> Vec<Product> {
        products
            .iter()
            .filter(|p| criteria.matches(p))
            .cloned()
            .collect()
    }

    /// Borrowing variant of [`FilterEngine::apply`].
    pub fn select<'a>(products: &'a [Product], criteria: &FilterCriteria) -> Vec<&'a Product> {
        products.iter().filter(|p| criteria.matches(p)).collect()
    }
}

//! Deterministic product ordering.

use core::borrow::Borrow;
use core::cmp::Reverse;
use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, ValueObject};

use crate::product::Product;

/// Sort modes offered on the catalog page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Featured products first, otherwise catalog order.
    #[default]
    Recommended,
    PriceAsc,
    PriceDesc,
    Newest,
}

impl SortMode {
    pub const ALL: [SortMode; 4] = [
        SortMode::Recommended,
        SortMode::PriceAsc,
        SortMode::PriceDesc,
        SortMode::Newest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Recommended => "recommended",
            SortMode::PriceAsc => "price-asc",
            SortMode::PriceDesc => "price-desc",
            SortMode::Newest => "newest",
        }
    }
}

impl core::fmt::Display for SortMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "recommended" => Ok(SortMode::Recommended),
            "price-asc" => Ok(SortMode::PriceAsc),
            "price-desc" => Ok(SortMode::PriceDesc),
            "newest" => Ok(SortMode::Newest),
            other => Err(DomainError::validation(format!(
                "unknown sort mode '{other}' (expected one of: recommended, price-asc, price-desc, newest)"
            ))),
        }
    }
}

impl ValueObject for SortMode {}

/// Orders a product subset.
///
/// Every mode is a stable sort: products with equal keys keep the relative
/// order they had coming out of the filter stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortEngine;

impl SortEngine {
    /// Sorted copy of `products`.
    pub fn apply(products: &[Product], mode: SortMode) -> Vec<Product> {
        let mut sorted = products.to_vec();
        Self::sort_in_place(&mut sorted, mode);
        sorted
    }

    /// Sort owned products or product references in place.
    pub fn sort_in_place<P: Borrow<Product>>(items: &mut [P], mode: SortMode) {
        match mode {
            // A stable partition: `false` sorts before `true`.
            SortMode::Recommended => items.sort_by_key(|p| !p.borrow().is_featured),
            SortMode::PriceAsc => items.sort_by_key(|p| price_key(p.borrow())),
            SortMode::PriceDesc => items.sort_by_key(|p| Reverse(price_key(p.borrow()))),
            SortMode::Newest => items.sort_by_key(|p| Reverse(created_key(p.borrow()))),
        }
    }
}

fn price_key(product: &Product) -> u64 {
    product.price.unwrap_or(0)
}

fn created_key(product: &Product) -> DateTime<Utc> {
    product.created_at.unwrap_or(DateTime::UNIX_EPOCH)
}

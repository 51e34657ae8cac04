use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{CategoryId, Entity, ImageId, ProductId};

/// Product lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
}

/// Stock availability as shown on the storefront.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    #[default]
    InStock,
    OutOfStock,
    PreOrder,
}

/// A persisted image attached to a product.
///
/// `sort_order` is a display rank. Values need not be contiguous; equal ranks
/// fall back to `created_at` (oldest first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: ImageId,
    pub product_id: ProductId,
    pub url: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

impl Entity for ProductImage {
    type Id = ImageId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Put images into display order: `sort_order`, then `created_at`.
///
/// The sort is stable, so records that tie on both keys keep their incoming
/// order.
pub fn sort_images(images: &mut [ProductImage]) {
    images.sort_by(display_order);
}

fn display_order(a: &ProductImage, b: &ProductImage) -> Ordering {
    a.sort_order
        .cmp(&b.sort_order)
        .then_with(|| a.created_at.cmp(&b.created_at))
}

/// Catalog product as read from the persistence layer.
///
/// The browse pipeline treats products as read-only values; the only part the
/// core ever writes back is the image ordering (see `storefront-media`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Price in smallest currency unit. `None` means "price on request".
    #[serde(default)]
    pub price: Option<u64>,
    #[serde(default = "default_show_price")]
    pub show_price: bool,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub stock_status: StockStatus,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_bestseller: bool,
    #[serde(default)]
    pub show_on_homepage: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

fn default_show_price() -> bool {
    true
}

impl Product {
    /// A new active, in-stock product with no price, category or images.
    pub fn new(id: ProductId, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id,
            slug: slugify(&name),
            name,
            category_id: None,
            price: None,
            show_price: true,
            status: ProductStatus::Active,
            stock_status: StockStatus::InStock,
            is_featured: false,
            is_new: false,
            is_bestseller: false,
            show_on_homepage: false,
            created_at: None,
            images: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }

    /// Price to render, honoring the display-price flag.
    pub fn display_price(&self) -> Option<u64> {
        if self.show_price { self.price } else { None }
    }

    /// First image in display order.
    pub fn primary_image(&self) -> Option<&ProductImage> {
        self.images.iter().min_by(|a, b| display_order(a, b))
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut dash = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            dash = false;
        } else if !dash && !slug.is_empty() {
            slug.push('-');
            dash = true;
        }
    }
    if slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn image(product_id: ProductId, sort_order: i32, secs: i64) -> ProductImage {
        ProductImage {
            id: ImageId::new(),
            product_id,
            url: format!("memory://img/{sort_order}-{secs}"),
            sort_order,
            created_at: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    #[test]
    fn new_product_has_storefront_defaults() {
        let p = Product::new(ProductId::new(), "Oak Side Table");
        assert_eq!(p.slug, "oak-side-table");
        assert!(p.is_active());
        assert!(p.show_price);
        assert_eq!(p.stock_status, StockStatus::InStock);
        assert!(p.images.is_empty());
    }

    #[test]
    fn slugify_collapses_punctuation() {
        assert_eq!(slugify("  Chair -- Walnut / 2 "), "chair-walnut-2");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn display_price_respects_flag() {
        let mut p = Product::new(ProductId::new(), "Lamp");
        p.price = Some(4_500);
        assert_eq!(p.display_price(), Some(4_500));
        p.show_price = false;
        assert_eq!(p.display_price(), None);
    }

    #[test]
    fn sort_images_breaks_ties_by_created_at() {
        let pid = ProductId::new();
        let late_zero = image(pid, 0, 200);
        let early_zero = image(pid, 0, 100);
        let one = image(pid, 1, 50);
        let mut images = vec![one.clone(), late_zero.clone(), early_zero.clone()];

        sort_images(&mut images);

        assert_eq!(images, vec![early_zero, late_zero, one]);
    }

    #[test]
    fn primary_image_is_lowest_rank() {
        let pid = ProductId::new();
        let mut p = Product::new(pid, "Rug");
        let first = image(pid, 3, 10);
        p.images = vec![image(pid, 7, 0), first.clone(), image(pid, 3, 20)];
        assert_eq!(p.primary_image(), Some(&first));
    }

    #[test]
    fn primary_image_is_head_of_sorted_images() {
        let pid = ProductId::new();
        let mut p = Product::new(pid, "Mirror");
        let twin_a = image(pid, 2, 40);
        let twin_b = ProductImage { id: ImageId::new(), ..twin_a.clone() };
        p.images = vec![image(pid, 2, 90), twin_a.clone(), twin_b, image(pid, 5, 1)];

        let mut sorted = p.images.clone();
        sort_images(&mut sorted);

        assert_eq!(p.primary_image(), Some(&twin_a));
        assert_eq!(p.primary_image(), sorted.first());
    }

    #[test]
    fn deserializes_with_missing_optional_fields() {
        let id = ProductId::new();
        let json = format!(
            r#"{{"id":"{id}","name":"Vase","price":1200,"stock_status":"pre_order","is_featured":true}}"#
        );
        let p: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(p.price, Some(1200));
        assert_eq!(p.stock_status, StockStatus::PreOrder);
        assert!(p.is_featured);
        assert!(p.show_price);
        assert_eq!(p.status, ProductStatus::Active);
        assert_eq!(p.created_at, None);
    }
}

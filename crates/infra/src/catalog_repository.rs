use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use storefront_catalog::{Product, ProductImage, ProductSource, SourceError, sort_images};
use storefront_core::{ImageId, ProductId, position_by_id};
use storefront_media::{ImageRecordStore, ImageStoreError, OrderUpdate};

/// In-memory product and image-record store.
///
/// Intended for tests/dev. Products keep their insertion order and their
/// embedded image lists are kept in display order after every write.
#[derive(Debug, Default)]
pub struct InMemoryCatalogRepository {
    products: RwLock<Vec<Product>>,
    batch_writes: bool,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_products(products: Vec<Product>) -> Self {
        let repo = Self::new();
        for product in products {
            repo.upsert_product(product);
        }
        repo
    }

    /// Parse a JSON array of products.
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        let products: Vec<Product> =
            serde_json::from_str(json).map_err(|e| SourceError::Decode(e.to_string()))?;
        Ok(Self::from_products(products))
    }

    /// Accept [`ImageRecordStore::update_image_orders`] as an atomic batch.
    pub fn with_batch_writes(mut self) -> Self {
        self.batch_writes = true;
        self
    }

    /// Insert or replace a product by id.
    pub fn upsert_product(&self, mut product: Product) {
        sort_images(&mut product.images);
        let Ok(mut products) = self.products.write() else {
            tracing::error!(product_id = %product.id, "catalog lock poisoned; product dropped");
            return;
        };
        match position_by_id(products.as_slice(), &product.id) {
            Some(index) => products[index] = product,
            None => products.push(product),
        }
    }

    pub fn product(&self, product_id: ProductId) -> Option<Product> {
        self.products
            .read()
            .ok()?
            .iter()
            .find(|p| p.id == product_id)
            .cloned()
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<Product>>, ImageStoreError> {
        self.products
            .write()
            .map_err(|_| ImageStoreError::Backend("lock poisoned".to_string()))
    }

    fn product_mut(products: &mut [Product], product_id: ProductId) -> Result<&mut Product, ImageStoreError> {
        products
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or(ImageStoreError::ProductNotFound(product_id))
    }

    /// Index of the product owning `image_id` and of the image within it.
    fn locate(products: &[Product], image_id: ImageId) -> Option<(usize, usize)> {
        products.iter().enumerate().find_map(|(p, product)| {
            position_by_id(&product.images, &image_id).map(|i| (p, i))
        })
    }
}

#[async_trait]
impl ProductSource for InMemoryCatalogRepository {
    async fn list_products(&self) -> Result<Vec<Product>, SourceError> {
        let products = self
            .products
            .read()
            .map_err(|_| SourceError::Unavailable("lock poisoned".to_string()))?;
        Ok(products.clone())
    }
}

#[async_trait]
impl ImageRecordStore for InMemoryCatalogRepository {
    async fn list_images(&self, product_id: ProductId) -> Result<Vec<ProductImage>, ImageStoreError> {
        let products = self
            .products
            .read()
            .map_err(|_| ImageStoreError::Backend("lock poisoned".to_string()))?;
        products
            .iter()
            .find(|p| p.id == product_id)
            .map(|p| p.images.clone())
            .ok_or(ImageStoreError::ProductNotFound(product_id))
    }

    async fn update_image_order(&self, image_id: ImageId, sort_order: i32) -> Result<(), ImageStoreError> {
        let mut products = self.write()?;
        let (p, i) = Self::locate(&products, image_id).ok_or(ImageStoreError::NotFound(image_id))?;
        let images = &mut products[p].images;
        images[i].sort_order = sort_order;
        sort_images(images);
        Ok(())
    }

    async fn update_image_orders(&self, updates: &[OrderUpdate]) -> Result<(), ImageStoreError> {
        if !self.batch_writes {
            return Err(ImageStoreError::Unsupported);
        }
        let mut products = self.write()?;

        // Resolve every target before touching anything.
        let mut targets = Vec::with_capacity(updates.len());
        for update in updates {
            let slot = Self::locate(&products, update.image_id)
                .ok_or(ImageStoreError::NotFound(update.image_id))?;
            targets.push((slot, update.sort_order));
        }

        for ((p, i), sort_order) in &targets {
            products[*p].images[*i].sort_order = *sort_order;
        }
        for product in products.iter_mut() {
            sort_images(&mut product.images);
        }
        Ok(())
    }

    async fn delete_image_record(&self, image_id: ImageId) -> Result<(), ImageStoreError> {
        let mut products = self.write()?;
        let (p, i) = Self::locate(&products, image_id).ok_or(ImageStoreError::NotFound(image_id))?;
        products[p].images.remove(i);
        Ok(())
    }

    async fn insert_image_record(
        &self,
        product_id: ProductId,
        url: &str,
        sort_order: i32,
    ) -> Result<ProductImage, ImageStoreError> {
        let mut products = self.write()?;
        let product = Self::product_mut(&mut products, product_id)?;
        let record = ProductImage {
            id: ImageId::new(),
            product_id,
            url: url.to_string(),
            sort_order,
            created_at: Utc::now(),
        };
        product.images.push(record.clone());
        sort_images(&mut product.images);
        Ok(record)
    }
}

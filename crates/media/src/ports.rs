//! Storage boundaries used by the media manager.
//!
//! Both ports are async and assume nothing about the backend: the in-memory
//! adapters in `storefront-infra` serve tests and local runs, a managed
//! database or object store serves production.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use storefront_catalog::ProductImage;
use storefront_core::{ImageId, ProductId};

use crate::model::OrderUpdate;

/// Image record store failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImageStoreError {
    #[error("image record not found: {0}")]
    NotFound(ImageId),

    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// The store has no atomic batch write; callers fall back to single writes.
    #[error("operation not supported by this store")]
    Unsupported,

    #[error("image store backend error: {0}")]
    Backend(String),
}

/// Blob store failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BlobStoreError {
    #[error("upload failed: {0}")]
    Upload(String),

    #[error("object not found: {0}")]
    NotFound(String),

    #[error("blob store backend error: {0}")]
    Backend(String),
}

/// Structured record store holding product image rows.
///
/// No optimistic concurrency: the last writer wins.
#[async_trait]
pub trait ImageRecordStore: Send + Sync {
    /// Images of one product ordered by `sort_order`, then `created_at`.
    async fn list_images(&self, product_id: ProductId) -> Result<Vec<ProductImage>, ImageStoreError>;

    async fn update_image_order(&self, image_id: ImageId, sort_order: i32) -> Result<(), ImageStoreError>;

    /// Apply every update or none of them.
    ///
    /// Stores without transactional writes keep the default, which reports
    /// [`ImageStoreError::Unsupported`].
    async fn update_image_orders(&self, updates: &[OrderUpdate]) -> Result<(), ImageStoreError> {
        let _ = updates;
        Err(ImageStoreError::Unsupported)
    }

    async fn delete_image_record(&self, image_id: ImageId) -> Result<(), ImageStoreError>;

    async fn insert_image_record(
        &self,
        product_id: ProductId,
        url: &str,
        sort_order: i32,
    ) -> Result<ProductImage, ImageStoreError>;
}

#[async_trait]
impl<S> ImageRecordStore for Arc<S>
where
    S: ImageRecordStore + ?Sized,
{
    async fn list_images(&self, product_id: ProductId) -> Result<Vec<ProductImage>, ImageStoreError> {
        (**self).list_images(product_id).await
    }

    async fn update_image_order(&self, image_id: ImageId, sort_order: i32) -> Result<(), ImageStoreError> {
        (**self).update_image_order(image_id, sort_order).await
    }

    async fn update_image_orders(&self, updates: &[OrderUpdate]) -> Result<(), ImageStoreError> {
        (**self).update_image_orders(updates).await
    }

    async fn delete_image_record(&self, image_id: ImageId) -> Result<(), ImageStoreError> {
        (**self).delete_image_record(image_id).await
    }

    async fn insert_image_record(
        &self,
        product_id: ProductId,
        url: &str,
        sort_order: i32,
    ) -> Result<ProductImage, ImageStoreError> {
        (**self).insert_image_record(product_id, url, sort_order).await
    }
}

/// Object storage for image binaries.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` at `path`, returning the public URL.
    async fn upload(&self, bytes: &[u8], path: &str, content_type: &str) -> Result<String, BlobStoreError>;

    /// Delete the object at `path`.
    async fn remove(&self, path: &str) -> Result<(), BlobStoreError>;

    /// Map a public URL produced by [`BlobStore::upload`] back to its path.
    fn object_path(&self, url: &str) -> Option<String>;
}

#[async_trait]
impl<B> BlobStore for Arc<B>
where
    B: BlobStore + ?Sized,
{
    async fn upload(&self, bytes: &[u8], path: &str, content_type: &str) -> Result<String, BlobStoreError> {
        (**self).upload(bytes, path, content_type).await
    }

    async fn remove(&self, path: &str) -> Result<(), BlobStoreError> {
        (**self).remove(path).await
    }

    fn object_path(&self, url: &str) -> Option<String> {
        (**self).object_path(url)
    }
}

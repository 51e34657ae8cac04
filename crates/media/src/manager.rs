//! The per-product media editing session.

use serde::{Deserialize, Serialize};

use storefront_catalog::{ProductImage, sort_images};
use storefront_core::{ImageId, ProductId, position_by_id};

use crate::error::MediaError;
use crate::model::{MediaList, OrderUpdate, PendingImage};
use crate::ports::{BlobStore, ImageRecordStore, ImageStoreError};
use crate::reorder::move_item;

/// A pending entry that did not make it into the persisted list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFailure {
    /// Position of the entry in the pending list at commit time.
    pub index: usize,
    pub file_name: String,
    pub error: MediaError,
}

/// Result of [`MediaOrderingManager::commit_pending_upload`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub inserted: Vec<ProductImage>,
    pub failures: Vec<UploadFailure>,
}

impl UploadReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Result of [`MediaOrderingManager::commit_persisted_reorder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReorderOutcome {
    /// Every entry now has `sort_order == index`.
    Committed { writes: usize, batched: bool },
    /// A write failed and the persisted list was re-read from the store.
    ///
    /// `failed_at` is the index of the failing entry for sequential writes and
    /// `None` when an atomic batch was rejected. Entries before `failed_at`
    /// already carry their new `sort_order`; later ones do not.
    Resynchronized { failed_at: Option<usize>, error: String },
}

/// Result of [`MediaOrderingManager::remove`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalReport {
    pub image: ProductImage,
    /// Whether the stored file was removed as well.
    pub blob_removed: bool,
}

/// Ordered image lists of one product being edited.
///
/// Persistence calls are awaited one at a time. There is no locking and no
/// version check against other sessions, and nothing is rolled back: partial
/// failures are repaired by re-reading the store (see [`Self::resync`]).
pub struct MediaOrderingManager<S, B> {
    records: S,
    blobs: B,
    product_id: Option<ProductId>,
    pending: Vec<PendingImage>,
    persisted: Vec<ProductImage>,
    order_dirty: bool,
    errors: Vec<MediaError>,
}

impl<S, B> MediaOrderingManager<S, B>
where
    S: ImageRecordStore,
    B: BlobStore,
{
    /// Session for a product that does not exist yet.
    pub fn new(records: S, blobs: B) -> Self {
        Self {
            records,
            blobs,
            product_id: None,
            pending: Vec::new(),
            persisted: Vec::new(),
            order_dirty: false,
            errors: Vec::new(),
        }
    }

    /// Session seeded with images already fetched with the catalog.
    pub fn for_product(records: S, blobs: B, product_id: ProductId, mut images: Vec<ProductImage>) -> Self {
        sort_images(&mut images);
        let mut manager = Self::new(records, blobs);
        manager.product_id = Some(product_id);
        manager.persisted = images;
        manager
    }

    pub fn product_id(&self) -> Option<ProductId> {
        self.product_id
    }

    pub fn pending(&self) -> &[PendingImage] {
        &self.pending
    }

    pub fn persisted(&self) -> &[ProductImage] {
        &self.persisted
    }

    /// Errors reported since the last clear, oldest first.
    pub fn errors(&self) -> &[MediaError] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<MediaError> {
        std::mem::take(&mut self.errors)
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    /// True after a persisted-list reorder that has not been committed.
    pub fn has_unsaved_order(&self) -> bool {
        self.order_dirty
    }

    /// Point the session at `product_id` and read its images.
    pub async fn load(&mut self, product_id: ProductId) -> Result<(), MediaError> {
        self.product_id = Some(product_id);
        self.resync().await
    }

    /// Replace the persisted list with what the store currently holds.
    ///
    /// This is the recovery path after a partial write: it does not restore
    /// the previous order, it shows the real one. On failure the in-memory
    /// list is kept.
    pub async fn resync(&mut self) -> Result<(), MediaError> {
        let product_id = self.product_id.ok_or(MediaError::NoProduct)?;
        match self.records.list_images(product_id).await {
            Ok(mut images) => {
                sort_images(&mut images);
                tracing::debug!(%product_id, images = images.len(), "persisted images reloaded");
                self.persisted = images;
                self.order_dirty = false;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%product_id, error = %err, "failed to reload persisted images");
                Err(self.report(MediaError::Load(err)))
            }
        }
    }

    /// Queue a file for upload.
    pub fn attach(&mut self, file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> &PendingImage {
        let index = self.pending.len();
        self.pending.push(PendingImage::new(file_name, content_type, bytes));
        &self.pending[index]
    }

    /// Drop a queued file before it is uploaded.
    pub fn discard_pending(&mut self, index: usize) -> Result<PendingImage, MediaError> {
        if index >= self.pending.len() {
            return Err(MediaError::IndexOutOfRange {
                list: MediaList::Pending,
                index,
                len: self.pending.len(),
            });
        }
        Ok(self.pending.remove(index))
    }

    /// Move an entry within one list. Entries never cross between lists.
    pub fn reorder(&mut self, list: MediaList, from: usize, to: usize) -> Result<(), MediaError> {
        let (moved, len) = match list {
            MediaList::Pending => (move_item(&mut self.pending, from, to), self.pending.len()),
            MediaList::Persisted => (move_item(&mut self.persisted, from, to), self.persisted.len()),
        };
        if !moved {
            let index = if from >= len { from } else { to };
            return Err(MediaError::IndexOutOfRange { list, index, len });
        }
        if list == MediaList::Persisted && from != to {
            self.order_dirty = true;
        }
        Ok(())
    }

    /// Upload every pending file and record it after the current images.
    ///
    /// Entry `i` of the pending list gets `sort_order = max + 1 + i`. A failed
    /// entry is reported and skipped; its slot is not reused and the loop
    /// carries on. Entries whose `sort_order` would pass `i32::MAX` fail
    /// without being uploaded. Nothing already uploaded is rolled back. The pending list
    /// is empty afterwards either way.
    pub async fn commit_pending_upload(&mut self, product_id: ProductId) -> Result<UploadReport, MediaError> {
        match self.product_id {
            Some(expected) if expected != product_id => {
                return Err(MediaError::ProductMismatch {
                    expected,
                    actual: product_id,
                });
            }
            _ => self.product_id = Some(product_id),
        }

        let max = self.persisted.iter().map(|img| img.sort_order).max();

        let pending = std::mem::take(&mut self.pending);
        let mut report = UploadReport::default();

        for (index, image) in pending.into_iter().enumerate() {
            let attempt = match next_sort_order(max, index) {
                Some(sort_order) => self.upload_one(product_id, &image, sort_order).await,
                None => Err(MediaError::SortOrderOverflow {
                    file_name: image.file_name().to_string(),
                    after: max.unwrap_or(0),
                }),
            };
            match attempt {
                Ok(record) => {
                    tracing::debug!(%product_id, image_id = %record.id, sort_order = record.sort_order, "image uploaded");
                    self.persisted.push(record.clone());
                    report.inserted.push(record);
                }
                Err(error) => {
                    tracing::warn!(%product_id, index, file = image.file_name(), error = %error, "image upload skipped");
                    self.errors.push(error.clone());
                    report.failures.push(UploadFailure {
                        index,
                        file_name: image.file_name().to_string(),
                        error,
                    });
                }
            }
        }

        tracing::info!(
            %product_id,
            inserted = report.inserted.len(),
            failed = report.failures.len(),
            "pending images committed"
        );
        Ok(report)
    }

    async fn upload_one(
        &self,
        product_id: ProductId,
        image: &PendingImage,
        sort_order: i32,
    ) -> Result<ProductImage, MediaError> {
        let path = image.object_path(product_id);
        let url = self
            .blobs
            .upload(image.bytes(), &path, image.content_type())
            .await
            .map_err(|source| MediaError::Upload {
                file_name: image.file_name().to_string(),
                source,
            })?;

        match self.records.insert_image_record(product_id, &url, sort_order).await {
            Ok(record) => Ok(record),
            Err(source) => {
                // The file has no record pointing at it; try not to leak it.
                if let Err(err) = self.blobs.remove(&path).await {
                    tracing::warn!(%path, error = %err, "orphaned upload could not be removed");
                }
                Err(MediaError::Record {
                    file_name: image.file_name().to_string(),
                    source,
                })
            }
        }
    }

    /// Persist the current persisted-list order as `sort_order = index`.
    ///
    /// Uses the store's atomic batch write when it has one. Otherwise writes
    /// one entry at a time and stops at the first failure, after which the
    /// list is re-read from the store. Entries already written stay written.
    pub async fn commit_persisted_reorder(&mut self) -> Result<ReorderOutcome, MediaError> {
        let product_id = self.product_id.ok_or(MediaError::NoProduct)?;
        let updates: Vec<OrderUpdate> = self
            .persisted
            .iter()
            .enumerate()
            .map(|(index, img)| OrderUpdate {
                image_id: img.id,
                sort_order: index as i32,
            })
            .collect();

        match self.records.update_image_orders(&updates).await {
            Ok(()) => {
                self.apply_committed_order();
                tracing::info!(%product_id, writes = updates.len(), batched = true, "image order committed");
                return Ok(ReorderOutcome::Committed {
                    writes: updates.len(),
                    batched: true,
                });
            }
            Err(ImageStoreError::Unsupported) => {}
            Err(source) => {
                let error = self.report(MediaError::BatchOrderWrite(source));
                return self.recover_after_failed_write(None, error).await;
            }
        }

        for (index, update) in updates.iter().enumerate() {
            if let Err(source) = self
                .records
                .update_image_order(update.image_id, update.sort_order)
                .await
            {
                let error = self.report(MediaError::OrderWrite {
                    image_id: update.image_id,
                    source,
                });
                tracing::warn!(%product_id, index, written = index, remaining = updates.len() - index, "image order write failed mid-sequence");
                return self.recover_after_failed_write(Some(index), error).await;
            }
            tracing::debug!(%product_id, image_id = %update.image_id, sort_order = update.sort_order, "image order written");
        }

        self.apply_committed_order();
        tracing::info!(%product_id, writes = updates.len(), batched = false, "image order committed");
        Ok(ReorderOutcome::Committed {
            writes: updates.len(),
            batched: false,
        })
    }

    fn apply_committed_order(&mut self) {
        for (index, img) in self.persisted.iter_mut().enumerate() {
            img.sort_order = index as i32;
        }
        self.order_dirty = false;
    }

    async fn recover_after_failed_write(
        &mut self,
        failed_at: Option<usize>,
        error: MediaError,
    ) -> Result<ReorderOutcome, MediaError> {
        self.resync().await?;
        Ok(ReorderOutcome::Resynchronized {
            failed_at,
            error: error.to_string(),
        })
    }

    /// Delete a persisted image.
    ///
    /// The record goes first. If that fails nothing changes. Once the record
    /// is gone the stored file is removed best-effort: a failure there is
    /// reported but does not bring the record back.
    pub async fn remove(&mut self, image_id: ImageId) -> Result<RemovalReport, MediaError> {
        let Some(position) = position_by_id(&self.persisted, &image_id) else {
            return Err(MediaError::ImageNotFound(image_id));
        };

        if let Err(source) = self.records.delete_image_record(image_id).await {
            tracing::warn!(%image_id, error = %source, "image record delete failed");
            return Err(self.report(MediaError::Delete { image_id, source }));
        }
        let image = self.persisted.remove(position);

        let blob_removed = match self.blobs.object_path(&image.url) {
            Some(path) => match self.blobs.remove(&path).await {
                Ok(()) => true,
                Err(source) => {
                    tracing::warn!(%image_id, %path, error = %source, "stored file left behind after record delete");
                    self.errors.push(MediaError::BlobRemove { path, source });
                    false
                }
            },
            None => {
                tracing::warn!(%image_id, url = %image.url, "url does not map to a stored file; skipping file removal");
                false
            }
        };

        tracing::info!(%image_id, blob_removed, "image removed");
        Ok(RemovalReport { image, blob_removed })
    }

    fn report(&mut self, error: MediaError) -> MediaError {
        self.errors.push(error.clone());
        error
    }
}

/// `sort_order` of the pending entry at `index`: `max + 1 + index`, or
/// `index` when the product has no images yet. `None` past `i32::MAX`.
fn next_sort_order(max: Option<i32>, index: usize) -> Option<i32> {
    let index = i32::try_from(index).ok()?;
    match max {
        Some(max) => max.checked_add(1)?.checked_add(index),
        None => Some(index),
    }
}

impl<S, B> core::fmt::Debug for MediaOrderingManager<S, B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MediaOrderingManager")
            .field("product_id", &self.product_id)
            .field("pending", &self.pending)
            .field("persisted", &self.persisted)
            .field("order_dirty", &self.order_dirty)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

//! Media manager errors.

use thiserror::Error;

use storefront_core::{ImageId, ProductId};

use crate::model::MediaList;
use crate::ports::{BlobStoreError, ImageStoreError};

/// Failure of a media operation.
///
/// Every variant is recoverable: the manager stays usable and keeps a copy of
/// each reported error until the caller clears it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MediaError {
    #[error("index {index} is out of range for the {list} list (length {len})")]
    IndexOutOfRange { list: MediaList, index: usize, len: usize },

    #[error("image {0} is not in this product's list")]
    ImageNotFound(ImageId),

    #[error("no product is loaded for this session")]
    NoProduct,

    #[error("session belongs to product {expected}, not {actual}")]
    ProductMismatch { expected: ProductId, actual: ProductId },

    #[error("upload of '{file_name}' failed: {source}")]
    Upload {
        file_name: String,
        #[source]
        source: BlobStoreError,
    },

    /// The next `sort_order` for this entry does not fit in an `i32`.
    #[error("no sort order left for '{file_name}' after {after}")]
    SortOrderOverflow { file_name: String, after: i32 },

    #[error("saving the record for '{file_name}' failed: {source}")]
    Record {
        file_name: String,
        #[source]
        source: ImageStoreError,
    },

    #[error("loading images failed: {0}")]
    Load(#[source] ImageStoreError),

    #[error("writing the order of image {image_id} failed: {source}")]
    OrderWrite {
        image_id: ImageId,
        #[source]
        source: ImageStoreError,
    },

    #[error("batch order write failed: {0}")]
    BatchOrderWrite(#[source] ImageStoreError),

    #[error("deleting image {image_id} failed: {source}")]
    Delete {
        image_id: ImageId,
        #[source]
        source: ImageStoreError,
    },

    #[error("removing stored file '{path}' failed: {source}")]
    BlobRemove {
        path: String,
        #[source]
        source: BlobStoreError,
    },
}

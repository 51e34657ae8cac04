//! Product media ordering.
//!
//! **Responsibility:** the image list of one product being edited.
//!
//! Two lists are kept apart for the whole session:
//! - `pending`: attached files that have no record yet (no stable id);
//! - `persisted`: stored records with an id and a `sort_order`.
//!
//! They only meet at commit time, when pending uploads become persisted
//! records appended after the current maximum `sort_order`.

pub mod error;
pub mod manager;
pub mod model;
pub mod ports;
pub mod reorder;

pub use error::MediaError;
pub use manager::{MediaOrderingManager, RemovalReport, ReorderOutcome, UploadFailure, UploadReport};
pub use model::{MediaList, OrderUpdate, PendingImage};
pub use ports::{BlobStore, BlobStoreError, ImageRecordStore, ImageStoreError};
pub use reorder::{drag_target, move_item};

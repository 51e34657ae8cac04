//! Infrastructure layer: in-memory and local-directory adapters, configuration.

pub mod blob_store;
pub mod catalog_repository;
pub mod config;
pub mod fs_blob_store;


pub use blob_store::InMemoryBlobStore;
pub use catalog_repository::InMemoryCatalogRepository;
pub use config::{ConfigError, FromEnv, StorefrontConfig};
pub use fs_blob_store::FsBlobStore;

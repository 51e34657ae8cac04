//! Catalog browsing core.
//!
//! Data flows leaf to root:
//! `CatalogStore` → `FilterEngine` → `SortEngine` → `Paginator` → presentation.
//!
//! Everything here is deterministic, in-memory data shaping. The only IO
//! boundary is [`ProductSource`], used by [`CatalogStore::reload`].

pub mod browse;
pub mod filter;
pub mod paginate;
pub mod product;
pub mod sort;
pub mod store;

pub use browse::{BrowseState, CatalogBrowser, PageView};
pub use filter::{FilterCriteria, FilterEngine, PriceRange};
pub use paginate::{DEFAULT_PAGE_SIZE, Paginator};
pub use product::{Product, ProductImage, ProductStatus, StockStatus, sort_images};
pub use sort::{SortEngine, SortMode};
pub use store::{CatalogStore, ProductSource, SourceError};

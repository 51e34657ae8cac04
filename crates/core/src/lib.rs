//! `storefront-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the catalog and
//! media crates (no IO, no storage concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::{Entity, position_by_id};
pub use error::{DomainError, DomainResult};
pub use id::{CategoryId, ImageId, ProductId};
pub use value_object::ValueObject;

//! `inventory-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, composite store keys, the identifier-generation capability and
//! the error model shared by validation and request handling.

pub mod error;
pub mod id;
pub mod key;

pub use error::{DomainError, DomainResult, FieldErrors};
pub use id::{
    FixedIdGenerator, IdGenerator, ProductId, SequentialIdGenerator, UuidV4Generator, WarehouseId,
};
pub use key::CompositeKey;

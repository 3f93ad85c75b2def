//! Conditional-insert store boundary.
//!
//! This module defines the single capability the creation protocol needs from a
//! partitioned key-value store: an atomic "insert only if absent" write. It makes
//! no other assumption about the backing engine.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryConditionalStore;
pub use postgres::PostgresConditionalStore;
pub use r#trait::{ConditionalStore, InsertOutcome, StoreError};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use thiserror::Error;

use inventory_core::CompositeKey;

/// Result of a successful round trip to the store.
///
/// A failed precondition is an expected outcome, not an error.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The item was committed at its key.
    Inserted,
    /// An item already occupied the key; nothing was written.
    AlreadyExists,
}

/// Store operation error.
///
/// Anything other than "the key is taken": connectivity, throttling, encoding
/// and backend faults. Carries diagnostic detail for server-side logs only.
///
/// ## Error Categories
///
/// - **Unavailable**: the store could not be reached (pool closed, IO, timeouts acquiring a connection)
/// - **Throttled**: the store shed the request (capacity, serialization failures)
/// - **InvalidItem**: the item could not be encoded for the store
/// - **Timeout**: the write did not finish within the caller's bound
/// - **Backend**: any other fault reported by the engine
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("request throttled: {0}")]
    Throttled(String),

    #[error("invalid item: {0}")]
    InvalidItem(String),

    #[error("write timed out after {0:?}")]
    Timeout(Duration),

    #[error("store backend error: {0}")]
    Backend(String),
}

/// A partitioned key-value store offering an atomic conditional insert.
///
/// ## Contract
///
/// `insert_if_absent()` must:
/// - evaluate "no item exists at `key`" and commit `item` as one atomic step
/// - return `AlreadyExists` (not an error) when the precondition fails
/// - never leave a partially written item visible, including when the returned
///   future is dropped before completion
///
/// When N callers race on the same key, exactly one observes `Inserted`.
#[async_trait]
pub trait ConditionalStore: Send + Sync {
    async fn insert_if_absent(
        &self,
        key: &CompositeKey,
        item: &JsonValue,
    ) -> Result<InsertOutcome, StoreError>;
}

#[async_trait]
impl<S> ConditionalStore for Arc<S>
where
    S: ConditionalStore + ?Sized,
{
    async fn insert_if_absent(
        &self,
        key: &CompositeKey,
        item: &JsonValue,
    ) -> Result<InsertOutcome, StoreError> {
        (**self).insert_if_absent(key, item).await
    }
}

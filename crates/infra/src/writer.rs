//! Conditional writer: commits a product record exactly once.
//!
//! One call to [`ConditionalWriter::attempt_create`] issues exactly one
//! `insert_if_absent` request. There is no existence check beforehand; the
//! store's atomic precondition is the only thing deciding who wins a key.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error};

use inventory_products::ProductRecord;

use crate::config::DEFAULT_WRITE_TIMEOUT;
use crate::store::{ConditionalStore, InsertOutcome, StoreError};

/// Outcome of one creation attempt.
#[derive(Debug)]
pub enum WriteResult {
    Created,
    /// The key was already occupied. Expected under retries and races.
    AlreadyExists,
    /// Any other failure, including the write timing out.
    StoreFailure(StoreError),
}

/// Long-lived handle around the process-wide store client.
#[derive(Clone)]
pub struct ConditionalWriter {
    store: Arc<dyn ConditionalStore>,
    timeout: Duration,
}

impl core::fmt::Debug for ConditionalWriter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConditionalWriter")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ConditionalWriter {
    pub fn new(store: Arc<dyn ConditionalStore>) -> Self {
        Self {
            store,
            timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Insert `record` only if nothing exists at its key.
    ///
    /// If the timeout elapses the in-flight request is dropped. A store honoring
    /// the [`ConditionalStore`] contract either committed the whole item or
    /// nothing; replaying with the same product id converges to `AlreadyExists`.
    pub async fn attempt_create(&self, record: &ProductRecord) -> WriteResult {
        let key = record.key();

        let item = match record.to_item() {
            Ok(item) => item,
            Err(e) => {
                error!(%key, error = %e, "failed to encode product record");
                return WriteResult::StoreFailure(StoreError::InvalidItem(e.to_string()));
            }
        };

        let attempt = self.store.insert_if_absent(&key, &item);
        match tokio::time::timeout(self.timeout, attempt).await {
            Ok(Ok(InsertOutcome::Inserted)) => {
                debug!(%key, "product record committed");
                WriteResult::Created
            }
            Ok(Ok(InsertOutcome::AlreadyExists)) => {
                debug!(%key, "conditional check failed: key already occupied");
                WriteResult::AlreadyExists
            }
            Ok(Err(e)) => {
                error!(%key, error = %e, "conditional write failed");
                WriteResult::StoreFailure(e)
            }
            Err(_elapsed) => {
                error!(%key, timeout_ms = self.timeout.as_millis() as u64, "conditional write timed out");
                WriteResult::StoreFailure(StoreError::Timeout(self.timeout))
            }
        }
    }
}

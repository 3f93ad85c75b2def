//! Composite keys for partitioned key-value stores.

use serde::{Deserialize, Serialize};

/// Partition + sort key pair that addresses exactly one record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompositeKey {
    pub partition_key: String,
    pub sort_key: String,
}

impl CompositeKey {
    pub fn new(partition_key: impl Into<String>, sort_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            sort_key: sort_key.into(),
        }
    }
}

impl core::fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.partition_key, self.sort_key)
    }
}

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use inventory_core::CompositeKey;

use super::r#trait::{ConditionalStore, InsertOutcome, StoreError};

/// In-memory partitioned store (partition key -> sort key -> item).
///
/// Intended for tests/dev. The existence check and the insert happen under one
/// write lock, which gives the same atomicity a real engine provides.
#[derive(Debug, Default)]
pub struct InMemoryConditionalStore {
    partitions: RwLock<HashMap<String, BTreeMap<String, JsonValue>>>,
}

impl InMemoryConditionalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CompositeKey) -> Option<JsonValue> {
        let partitions = self.partitions.read().ok()?;
        partitions
            .get(&key.partition_key)
            .and_then(|p| p.get(&key.sort_key))
            .cloned()
    }

    /// Items in one partition, ordered by sort key.
    pub fn partition(&self, partition_key: &str) -> Vec<JsonValue> {
        match self.partitions.read() {
            Ok(partitions) => partitions
                .get(partition_key)
                .map(|p| p.values().cloned().collect())
                .unwrap_or_default(),
            Err(_) => vec![],
        }
    }

    /// Total number of items across all partitions.
    pub fn len(&self) -> usize {
        match self.partitions.read() {
            Ok(partitions) => partitions.values().map(BTreeMap::len).sum(),
            Err(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ConditionalStore for InMemoryConditionalStore {
    async fn insert_if_absent(
        &self,
        key: &CompositeKey,
        item: &JsonValue,
    ) -> Result<InsertOutcome, StoreError> {
        let mut partitions = self
            .partitions
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        let partition = partitions.entry(key.partition_key.clone()).or_default();
        if partition.contains_key(&key.sort_key) {
            return Ok(InsertOutcome::AlreadyExists);
        }

        partition.insert(key.sort_key.clone(), item.clone());
        Ok(InsertOutcome::Inserted)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;

    fn key(pk: &str, sk: &str) -> CompositeKey {
        CompositeKey::new(pk, sk)
    }

    #[tokio::test]
    async fn first_insert_wins_and_second_is_rejected() {
        let store = InMemoryConditionalStore::new();
        let k = key("WAREHOUSE#WH1", "PRODUCT#P1");

        let first = store.insert_if_absent(&k, &json!({"v": 1})).await.unwrap();
        let second = store.insert_if_absent(&k, &json!({"v": 2})).await.unwrap();

        assert_eq!(first, InsertOutcome::Inserted);
        assert_eq!(second, InsertOutcome::AlreadyExists);
        // The original item is untouched.
        assert_eq!(store.get(&k), Some(json!({"v": 1})));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn same_sort_key_in_different_partitions_does_not_collide() {
        let store = InMemoryConditionalStore::new();

        let a = store
            .insert_if_absent(&key("WAREHOUSE#WH1", "PRODUCT#P1"), &json!({}))
            .await
            .unwrap();
        let b = store
            .insert_if_absent(&key("WAREHOUSE#WH2", "PRODUCT#P1"), &json!({}))
            .await
            .unwrap();

        assert_eq!(a, InsertOutcome::Inserted);
        assert_eq!(b, InsertOutcome::Inserted);
        assert_eq!(store.partition("WAREHOUSE#WH1").len(), 1);
        assert_eq!(store.partition("WAREHOUSE#WH2").len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_on_one_key_yield_a_single_winner() {
        let store = Arc::new(InMemoryConditionalStore::new());
        let k = key("WAREHOUSE#WH1", "PRODUCT#RACE");

        let mut handles = Vec::new();
        for i in 0..32 {
            let store = store.clone();
            let k = k.clone();
            handles.push(tokio::spawn(async move {
                store.insert_if_absent(&k, &json!({ "writer": i })).await.unwrap()
            }));
        }

        let mut inserted = 0;
        let mut rejected = 0;
        for h in handles {
            match h.await.unwrap() {
                InsertOutcome::Inserted => inserted += 1,
                InsertOutcome::AlreadyExists => rejected += 1,
            }
        }

        assert_eq!(inserted, 1);
        assert_eq!(rejected, 31);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn missing_key_reads_as_none() {
        let store = InMemoryConditionalStore::new();
        assert!(store.get(&key("WAREHOUSE#X", "PRODUCT#Y")).is_none());
        assert!(store.is_empty());
    }
}

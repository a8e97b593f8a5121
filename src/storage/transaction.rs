//! Transactions
//!
//! Buffered writes applied atomically on commit.

use std::time::Duration;

use super::error::Result;
use super::store::TtlStore;

/// A buffered write operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Set { key: String, value: String },
    SetWithTtl { key: String, value: String, ttl: Duration },
    Delete { key: String },
}

/// Operations queued against a store.
///
/// Nothing is visible to readers until [`commit`](Self::commit). Dropping a
/// transaction without committing discards it.
///
/// ```rust
/// use std::time::Duration;
/// use ttlstore::TtlStore;
///
/// let store = TtlStore::new();
/// let mut tx = store.begin();
/// tx.set("a", "1").set_with_ttl("b", "2", Duration::from_secs(30)).delete("c");
/// assert_eq!(store.get("a"), None);
///
/// assert_eq!(tx.commit().unwrap(), 3);
/// assert_eq!(store.get("a").as_deref(), Some("1"));
/// ```
#[must_use = "a transaction does nothing until committed"]
#[derive(Debug)]
pub struct Transaction {
    store: TtlStore,
    operations: Vec<Operation>,
}

impl Transaction {
    pub(crate) fn new(store: TtlStore) -> Self {
        Self {
            store,
            operations: Vec::new(),
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.push(Operation::Set {
            key: key.into(),
            value: value.into(),
        })
    }

    /// Queue a TTL write; the deadline is computed when the transaction commits
    pub fn set_with_ttl(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
        ttl: Duration,
    ) -> &mut Self {
        self.push(Operation::SetWithTtl {
            key: key.into(),
            value: value.into(),
            ttl,
        })
    }

    pub fn delete(&mut self, key: impl Into<String>) -> &mut Self {
        self.push(Operation::Delete { key: key.into() })
    }

    pub fn push(&mut self, operation: Operation) -> &mut Self {
        self.operations.push(operation);
        self
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Apply every queued operation, in order, or none of them.
    ///
    /// Returns the number of operations applied.
    pub fn commit(self) -> Result<usize> {
        let Self { store, operations } = self;
        store.apply(operations)
    }

    /// Discard the queued operations
    pub fn rollback(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{ManualClock, StoreConfig, StoreError};
    use std::sync::Arc;

    #[test]
    fn test_commit_applies_in_order() {
        let store = TtlStore::new();
        store.set("stale", "x").unwrap();

        let mut tx = store.begin();
        tx.set("key1", "value1")
            .set("key2", "value2")
            .delete("stale")
            .set("key1", "final");
        assert_eq!(tx.len(), 4);
        assert_eq!(tx.commit().unwrap(), 4);

        assert_eq!(store.get("key1").as_deref(), Some("final"));
        assert_eq!(store.get("key2").as_deref(), Some("value2"));
        assert_eq!(store.get("stale"), None);
        assert_eq!(store.stats().commits, 1);
    }

    #[test]
    fn test_rollback_discards_operations() {
        let store = TtlStore::new();
        store.set("key2", "value2").unwrap();

        let mut tx = store.begin();
        tx.delete("key2");
        tx.rollback();
        assert_eq!(store.get("key2").as_deref(), Some("value2"));

        let mut dropped = store.begin();
        dropped.set("key3", "value3");
        drop(dropped);
        assert_eq!(store.get("key3"), None);
    }

    #[test]
    fn test_ttl_counts_from_commit() {
        let clock = ManualClock::new();
        let store = TtlStore::with_clock(StoreConfig::default(), Arc::new(clock.clone())).unwrap();

        let mut tx = store.begin();
        tx.set_with_ttl("k", "v", Duration::from_secs(5));
        clock.advance(Duration::from_secs(4));
        tx.commit().unwrap();

        clock.advance(Duration::from_secs(4));
        assert_eq!(store.get("k").as_deref(), Some("v"));
        clock.advance(Duration::from_secs(1));
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_invalid_ttl_aborts_whole_transaction() {
        let store = TtlStore::new();

        let mut tx = store.begin();
        tx.set("a", "1").set_with_ttl("b", "2", Duration::MAX);
        let err = tx.commit().unwrap_err();

        assert!(matches!(err, StoreError::InvalidArgument(_)));
        assert!(store.is_empty());
        assert_eq!(store.stats().commits, 0);
    }

    #[test]
    fn test_capacity_checked_against_final_state() {
        let store = TtlStore::with_config(StoreConfig::new().with_max_entries(2)).unwrap();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();

        // Net growth is zero: one delete frees room for one insert
        let mut tx = store.begin();
        tx.set("c", "3").delete("a");
        assert_eq!(tx.commit().unwrap(), 2);
        assert_eq!(store.get("c").as_deref(), Some("3"));

        let mut tx = store.begin();
        tx.set("d", "4").set("e", "5");
        assert_eq!(
            tx.commit().unwrap_err(),
            StoreError::CapacityExceeded { max_entries: 2 }
        );
        assert_eq!(store.get("d"), None);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_push_queues_prebuilt_operations() {
        let store = TtlStore::new();
        store.set("old", "x").unwrap();

        let ops = vec![
            Operation::Set {
                key: "a".to_string(),
                value: "1".to_string(),
            },
            Operation::SetWithTtl {
                key: "b".to_string(),
                value: "2".to_string(),
                ttl: Duration::ZERO,
            },
            Operation::Delete {
                key: "old".to_string(),
            },
        ];

        let mut tx = store.begin();
        for op in ops.clone() {
            tx.push(op);
        }
        assert_eq!(tx.operations(), ops.as_slice());
        assert!(!tx.is_empty());

        assert_eq!(tx.commit().unwrap(), 3);
        assert_eq!(store.get("a").as_deref(), Some("1"));
        assert_eq!(store.get("b"), None);
        assert_eq!(store.get("old"), None);
    }

    #[test]
    fn test_empty_commit() {
        let store = TtlStore::new();
        assert_eq!(store.begin().commit().unwrap(), 0);
    }
}

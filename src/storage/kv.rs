//! Key-Value Capability
//!
//! The narrow surface an embedding layer adapts to.

use std::time::Duration;

use super::error::Result;
use super::store::TtlStore;

/// Operations every embeddable key-value backend provides.
///
/// Absent and expired keys read as `None`; deletes never fail.
pub trait KeyValueStore: Send + Sync {
    /// Write a value that never expires, clearing any previous TTL
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Write a value that expires after `ttl`; zero expires immediately
    fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    fn get(&self, key: &str) -> Option<String>;

    /// Remove a key if present. Idempotent.
    fn delete(&self, key: &str);
}

impl KeyValueStore for TtlStore {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        TtlStore::set(self, key, value)
    }

    fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        TtlStore::set_with_ttl(self, key, value, ttl)
    }

    fn get(&self, key: &str) -> Option<String> {
        TtlStore::get(self, key)
    }

    fn delete(&self, key: &str) {
        TtlStore::delete(self, key);
    }
}

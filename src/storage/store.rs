//! In-Memory Key-Value Store
//!
//! Thread-safe hashmap with per-entry deadlines. Expiry is decided on every
//! read against the store's clock; the optional sweeper only reclaims memory.

use hashbrown::HashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{trace, warn};

use super::clock::{Clock, SystemClock};
use super::config::StoreConfig;
use super::entry::Entry;
use super::error::{Result, StoreError};
use super::sweeper::Sweeper;
use super::transaction::{Operation, Transaction};
use crate::metrics::{Stats, StatsSnapshot};

pub(crate) struct StoreInner {
    data: Mutex<HashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
    stats: Stats,
    max_entries: usize,
    /// Dropped with the store; sweepers watching it stop
    shutdown_tx: watch::Sender<()>,
}

/// Thread-safe in-memory key-value store with optional per-entry TTL.
///
/// Cloning is cheap and every clone refers to the same entries. A single
/// mutex guards the whole map, so each operation is atomic with respect to
/// every other one.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use ttlstore::TtlStore;
///
/// let store = TtlStore::new();
/// store.set("user:1", "alice").unwrap();
/// store.set_with_ttl("session", "token", Duration::ZERO).unwrap();
///
/// assert_eq!(store.get("user:1").as_deref(), Some("alice"));
/// assert_eq!(store.get("session"), None);
/// ```
#[derive(Clone)]
pub struct TtlStore {
    inner: Arc<StoreInner>,
}

impl std::fmt::Debug for TtlStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlStore")
            .field("entries", &self.len())
            .field("max_entries", &self.inner.max_entries)
            .field("clock", &self.inner.clock)
            .finish()
    }
}

impl Default for TtlStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TtlStore {
    /// Create a new empty store with sweeping disabled
    pub fn new() -> Self {
        Self::build(&StoreConfig::default(), Arc::new(SystemClock))
    }

    /// Create a store from a configuration.
    ///
    /// Fails with [`StoreError::NoRuntime`] if a sweep interval is set and no
    /// Tokio runtime is running on this thread.
    pub fn with_config(config: StoreConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a store that reads time from `clock`
    pub fn with_clock(config: StoreConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let sweep_interval = config.sweep_interval.filter(|d| !d.is_zero());
        if sweep_interval.is_some() && tokio::runtime::Handle::try_current().is_err() {
            return Err(StoreError::NoRuntime);
        }

        let store = Self::build(&config, clock);
        if let Some(interval) = sweep_interval {
            // Detached: the task exits on its own once the store is dropped
            Sweeper::spawn(&store, interval);
        }
        Ok(store)
    }

    fn build(config: &StoreConfig, clock: Arc<dyn Clock>) -> Self {
        let (shutdown_tx, _) = watch::channel(());
        Self {
            inner: Arc::new(StoreInner {
                data: Mutex::new(HashMap::with_capacity(config.initial_capacity)),
                clock,
                stats: Stats::new(),
                max_entries: config.max_entries,
                shutdown_tx,
            }),
        }
    }

    pub(crate) fn from_inner(inner: Arc<StoreInner>) -> Self {
        Self { inner }
    }

    pub(crate) fn downgrade(&self) -> std::sync::Weak<StoreInner> {
        Arc::downgrade(&self.inner)
    }

    /// Receiver that reports an error once the last store handle is dropped
    pub(crate) fn shutdown_signal(&self) -> watch::Receiver<()> {
        self.inner.shutdown_tx.subscribe()
    }

    /// Get value by key, returns None if key doesn't exist or is expired.
    ///
    /// An expired entry is removed as a side effect.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut map = self.inner.data.lock();
        let now = self.inner.clock.now();

        let value = match map.get(key) {
            None => {
                self.inner.stats.record_miss(false);
                return None;
            }
            Some(entry) if entry.is_live_at(now) => Some(entry.value().to_owned()),
            Some(_) => None,
        };

        match value {
            Some(value) => {
                self.inner.stats.record_hit();
                Some(value)
            }
            None => {
                map.remove(key);
                trace!(key, "Evicted expired key on read");
                self.inner.stats.record_miss(true);
                None
            }
        }
    }

    /// Set a key that never expires, replacing any previous entry and its TTL
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let mut map = self.inner.data.lock();
        self.insert_locked(&mut map, key.into(), Entry::permanent(value.into()))
    }

    /// Set a key that expires `ttl` from now. A zero `ttl` expires immediately.
    pub fn set_with_ttl(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
        ttl: Duration,
    ) -> Result<()> {
        let mut map = self.inner.data.lock();
        let entry = Entry::expiring(value.into(), self.inner.clock.now(), ttl)?;
        self.insert_locked(&mut map, key.into(), entry)
    }

    /// Delete key, live or expired. Returns true if a live entry was removed.
    pub fn delete(&self, key: &str) -> bool {
        let mut map = self.inner.data.lock();
        let now = self.inner.clock.now();
        self.inner.stats.record_delete();
        map.remove(key).map(|e| e.is_live_at(now)).unwrap_or(false)
    }

    /// Check if key exists and is not expired
    pub fn exists(&self, key: &str) -> bool {
        let map = self.inner.data.lock();
        let now = self.inner.clock.now();
        map.get(key).map(|e| e.is_live_at(now)).unwrap_or(false)
    }

    /// Remaining lifetime of a key.
    ///
    /// `None` if absent or expired, `Some(None)` if it never expires.
    pub fn ttl(&self, key: &str) -> Option<Option<Duration>> {
        let map = self.inner.data.lock();
        let now = self.inner.clock.now();
        map.get(key)
            .filter(|e| e.is_live_at(now))
            .map(|e| e.remaining_at(now))
    }

    /// Get the number of keys (including expired ones not yet removed)
    pub fn len(&self) -> usize {
        self.inner.data.lock().len()
    }

    /// Check if store is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live keys, in no particular order
    pub fn keys(&self) -> Vec<String> {
        let map = self.inner.data.lock();
        let now = self.inner.clock.now();
        map.iter()
            .filter(|(_, e)| e.is_live_at(now))
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Remove expired keys, returns count of removed keys
    pub fn purge_expired(&self) -> usize {
        let mut map = self.inner.data.lock();
        let now = self.inner.clock.now();
        self.purge_locked(&mut map, now)
    }

    /// Remove every entry
    pub fn clear(&self) {
        self.inner.data.lock().clear();
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.inner.stats.snapshot()
    }

    /// Start buffering operations to apply atomically
    pub fn begin(&self) -> Transaction {
        Transaction::new(self.clone())
    }

    /// Apply `ops` in order under one lock acquisition.
    ///
    /// Every TTL and the resulting capacity are checked before the first
    /// operation is applied, so an error leaves the store untouched.
    pub(crate) fn apply(&self, ops: Vec<Operation>) -> Result<usize> {
        let mut map = self.inner.data.lock();
        let now = self.inner.clock.now();

        let mut prepared = Vec::with_capacity(ops.len());
        for op in ops {
            prepared.push(match op {
                Operation::Set { key, value } => (key, Some(Entry::permanent(value))),
                Operation::SetWithTtl { key, value, ttl } => {
                    (key, Some(Entry::expiring(value, now, ttl)?))
                }
                Operation::Delete { key } => (key, None),
            });
        }

        let (mut inserted, mut growth) = batch_growth(&map, &prepared);
        if growth > 0 && self.over_capacity(map.len() + growth) {
            self.purge_locked(&mut map, now);
            (inserted, growth) = batch_growth(&map, &prepared);
        }
        if growth > 0 {
            self.ensure_room(&map, growth)?;
        }
        // Operations apply in order, so room is needed for every new key the
        // batch writes even if a later delete cancels it out
        if inserted > 0 {
            map.try_reserve(inserted)
                .map_err(|_| StoreError::AllocationFailed)?;
        }

        let applied = prepared.len();
        for (key, entry) in prepared {
            match entry {
                Some(entry) => {
                    self.inner.stats.record_set();
                    map.insert(key, entry);
                }
                None => {
                    self.inner.stats.record_delete();
                    map.remove(&key);
                }
            }
        }
        self.inner.stats.record_commit();
        Ok(applied)
    }

    fn insert_locked(
        &self,
        map: &mut HashMap<String, Entry>,
        key: String,
        entry: Entry,
    ) -> Result<()> {
        if !map.contains_key(&key) {
            if self.over_capacity(map.len() + 1) {
                let now = self.inner.clock.now();
                self.purge_locked(map, now);
            }
            self.ensure_room(map, 1)?;
            map.try_reserve(1)
                .map_err(|_| StoreError::AllocationFailed)?;
        }
        self.inner.stats.record_set();
        map.insert(key, entry);
        Ok(())
    }

    fn over_capacity(&self, len: usize) -> bool {
        self.inner.max_entries > 0 && len > self.inner.max_entries
    }

    fn ensure_room(&self, map: &HashMap<String, Entry>, additional: usize) -> Result<()> {
        if self.over_capacity(map.len() + additional) {
            warn!(
                entries = map.len(),
                max_entries = self.inner.max_entries,
                "Rejecting insert, store is full"
            );
            return Err(StoreError::CapacityExceeded {
                max_entries: self.inner.max_entries,
            });
        }
        Ok(())
    }

    fn purge_locked(&self, map: &mut HashMap<String, Entry>, now: Instant) -> usize {
        let before = map.len();
        map.retain(|_, entry| entry.is_live_at(now));
        let removed = before - map.len();
        self.inner.stats.record_swept(removed);
        removed
    }
}

/// New keys written by `batch`, and the net change in entry count once it
/// has been applied to `map`
fn batch_growth(
    map: &HashMap<String, Entry>,
    batch: &[(String, Option<Entry>)],
) -> (usize, usize) {
    // key -> (written at some point, present at the end)
    let mut touched: HashMap<&str, (bool, bool)> = HashMap::new();
    for (key, entry) in batch {
        let slot = touched.entry(key.as_str()).or_insert((false, false));
        slot.0 |= entry.is_some();
        slot.1 = entry.is_some();
    }

    let (mut inserted, mut added, mut removed) = (0usize, 0usize, 0usize);
    for (key, (written, present)) in &touched {
        let existing = map.contains_key(*key);
        if *written && !existing {
            inserted += 1;
        }
        match (existing, *present) {
            (false, true) => added += 1,
            (true, false) => removed += 1,
            _ => {}
        }
    }
    (inserted, added.saturating_sub(removed))
}

//! ttlstore - Embeddable In-Memory Key-Value Store with TTL
//!
//! Entries may carry a deadline after which reads treat them as absent.
//! Expiry is checked on every read against an injectable monotonic clock;
//! an optional background sweeper reclaims memory held by dead entries.

pub mod metrics;
pub mod storage;

pub use metrics::{Stats, StatsSnapshot};
pub use storage::{
    Clock, KeyValueStore, ManualClock, StoreConfig, StoreError, Sweeper, SystemClock,
    Transaction, TtlStore,
};

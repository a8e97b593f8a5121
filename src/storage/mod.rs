//! Storage Engine
//!
//! In-memory key-value store with TTL support.

mod clock;
mod config;
mod entry;
mod error;
mod kv;
mod store;
mod sweeper;
mod transaction;
pub mod ttl;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::StoreConfig;
pub use entry::Entry;
pub use error::{Result, StoreError};
pub use kv::KeyValueStore;
pub use store::TtlStore;
pub use sweeper::Sweeper;
pub use transaction::{Operation, Transaction};

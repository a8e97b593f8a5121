//! TTL Sweeper
//!
//! Background task that periodically removes expired keys. Reads never
//! depend on it; it only bounds memory held by dead entries.

use std::sync::Weak;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use super::store::{StoreInner, TtlStore};

/// Background TTL sweep task
pub struct Sweeper {
    store: Weak<StoreInner>,
    interval: Duration,
    shutdown: watch::Receiver<()>,
}

impl Sweeper {
    /// Create a sweeper that does not keep `store` alive
    pub fn new(store: &TtlStore, interval: Duration) -> Self {
        Self {
            store: store.downgrade(),
            interval,
            shutdown: store.shutdown_signal(),
        }
    }

    /// Run the sweeper (should be spawned as a task).
    ///
    /// Returns once every handle to the store has been dropped.
    pub async fn run(self) {
        let Sweeper {
            store,
            interval: period,
            mut shutdown,
        } = self;

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // Skip the immediate first tick
        ticker.tick().await;
        info!("TTL sweeper started, interval: {:?}", period);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let Some(inner) = store.upgrade() else { break };
                    let removed = TtlStore::from_inner(inner).purge_expired();
                    if removed > 0 {
                        debug!(removed = removed, "Swept expired keys");
                    }
                }
                // Err once the sender inside the store is dropped
                Err(_) = shutdown.changed() => break,
            }
        }

        info!("TTL sweeper stopped");
    }

    /// Spawn the sweeper as a background task
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime or if `interval` is zero.
    pub fn spawn(store: &TtlStore, interval: Duration) -> tokio::task::JoinHandle<()> {
        let sweeper = Self::new(store, interval);
        tokio::spawn(sweeper.run())
    }
}

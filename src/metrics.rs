//! Store Metrics
//!
//! Operation counters for a single store instance.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters updated by store operations
#[derive(Debug, Default)]
pub struct Stats {
    sets: AtomicU64,
    deletes: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    expired_on_read: AtomicU64,
    swept: AtomicU64,
    commits: AtomicU64,
}

/// Point-in-time copy of [`Stats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub sets: u64,
    pub deletes: u64,
    pub hits: u64,
    pub misses: u64,
    /// Entries removed lazily by a read
    pub expired_on_read: u64,
    /// Entries removed by a purge pass
    pub swept: u64,
    pub commits: u64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_set(&self) {
        self.sets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delete(&self) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self, expired: bool) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        if expired {
            self.expired_on_read.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_swept(&self, removed: usize) {
        self.swept.fetch_add(removed as u64, Ordering::Relaxed);
    }

    pub fn record_commit(&self) {
        self.commits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            sets: self.sets.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expired_on_read: self.expired_on_read.load(Ordering::Relaxed),
            swept: self.swept.load(Ordering::Relaxed),
            commits: self.commits.load(Ordering::Relaxed),
        }
    }
}

impl StatsSnapshot {
    /// Fraction of reads that found a live value
    pub fn hit_ratio(&self) -> f64 {
        let reads = self.hits + self.misses;
        if reads == 0 {
            return 0.0;
        }
        self.hits as f64 / reads as f64
    }

    pub fn summary(&self) -> String {
        format!(
            "sets={} deletes={} hits={} misses={} (hit ratio {:.2}) | expired: on_read={} swept={} | commits={}",
            self.sets,
            self.deletes,
            self.hits,
            self.misses,
            self.hit_ratio(),
            self.expired_on_read,
            self.swept,
            self.commits
        )
    }
}

//! Store Configuration

use std::time::Duration;

/// Store configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreConfig {
    /// Interval between background sweeps (None = sweeping disabled)
    pub sweep_interval: Option<Duration>,

    /// Maximum number of entries (0 = unlimited)
    pub max_entries: usize,

    /// Capacity to preallocate for the map
    pub initial_capacity: usize,
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable background sweeping. A zero interval disables it.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = (!interval.is_zero()).then_some(interval);
        self
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}

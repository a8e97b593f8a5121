//! Store Errors

use thiserror::Error;

/// Errors returned by mutating store operations.
///
/// A missing or expired key is never an error; reads return `None`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Rejected at the call boundary (negative TTL, deadline overflow)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The configured entry limit is reached and no expired entry could be reclaimed
    #[error("store is full: {max_entries} entries maximum")]
    CapacityExceeded { max_entries: usize },

    /// The map could not grow to hold a new entry
    #[error("allocation failed while inserting entry")]
    AllocationFailed,

    /// A background sweeper was requested outside of a Tokio runtime
    #[error("sweeping requires a running Tokio runtime")]
    NoRuntime,
}

pub type Result<T> = std::result::Result<T, StoreError>;

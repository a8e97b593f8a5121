//! TTL Units
//!
//! Integer TTLs crossing an embedding boundary are milliseconds.

use std::time::Duration;

use super::error::{Result, StoreError};

/// Convert a signed millisecond count into a TTL.
///
/// Negative values are rejected rather than clamped to zero, since zero
/// already means "expires immediately".
pub fn from_millis(ms: i64) -> Result<Duration> {
    u64::try_from(ms)
        .map(Duration::from_millis)
        .map_err(|_| StoreError::InvalidArgument(format!("ttl must be non-negative, got {} ms", ms)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_millis() {
        assert_eq!(from_millis(0).unwrap(), Duration::ZERO);
        assert_eq!(from_millis(11_000).unwrap(), Duration::from_secs(11));
    }

    #[test]
    fn test_negative_ttl_rejected() {
        let err = from_millis(-1).unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)));
        assert!(err.to_string().contains("-1 ms"));
    }
}

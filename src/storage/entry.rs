//! Store Entry
//!
//! A value together with its optional deadline.

use std::time::{Duration, Instant};

use super::error::{Result, StoreError};

/// Entry in the store with value and expiration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    /// Entry that never expires
    pub fn permanent(value: String) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    /// Entry that expires `ttl` after `now`.
    ///
    /// A zero `ttl` yields a deadline equal to `now`, which is already expired.
    pub fn expiring(value: String, now: Instant, ttl: Duration) -> Result<Self> {
        Ok(Self {
            value,
            expires_at: Some(deadline(now, ttl)?),
        })
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> Option<Instant> {
        self.expires_at
    }

    /// Live while the deadline is strictly after `now`
    #[inline]
    pub fn is_live_at(&self, now: Instant) -> bool {
        self.expires_at.map(|t| t > now).unwrap_or(true)
    }

    #[inline]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        !self.is_live_at(now)
    }

    /// Time left before expiry; `None` for permanent entries
    pub fn remaining_at(&self, now: Instant) -> Option<Duration> {
        self.expires_at.map(|t| t.saturating_duration_since(now))
    }
}

pub(crate) fn deadline(now: Instant, ttl: Duration) -> Result<Instant> {
    now.checked_add(ttl).ok_or_else(|| {
        StoreError::InvalidArgument(format!("ttl of {:?} overflows the clock", ttl))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permanent_entry_never_expires() {
        let now = Instant::now();
        let entry = Entry::permanent("v".to_string());
        assert_eq!(entry.expires_at(), None);
        assert!(entry.is_live_at(now + Duration::from_secs(86_400 * 365)));
        assert_eq!(entry.remaining_at(now), None);
    }

    #[test]
    fn test_deadline_equal_to_now_is_expired() {
        let now = Instant::now();
        let entry = Entry::expiring("v".to_string(), now, Duration::ZERO).unwrap();
        assert_eq!(entry.expires_at(), Some(now));
        assert!(entry.is_expired_at(now));
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Instant::now();
        let ttl = Duration::from_millis(500);
        let entry = Entry::expiring("v".to_string(), now, ttl).unwrap();

        assert!(entry.is_live_at(now + Duration::from_millis(499)));
        assert!(entry.is_expired_at(now + ttl));
        assert_eq!(
            entry.remaining_at(now + Duration::from_millis(200)),
            Some(Duration::from_millis(300))
        );
        assert_eq!(entry.remaining_at(now + ttl * 2), Some(Duration::ZERO));
    }

    #[test]
    fn test_overflowing_ttl_is_rejected() {
        let result = Entry::expiring("v".to_string(), Instant::now(), Duration::MAX);
        assert!(matches!(result, Err(StoreError::InvalidArgument(_))));
    }
}

//! Cache-age validation policy.

use chrono::{DateTime, Days, Utc};

/// Decides whether a cached feed timestamp is still usable.
///
/// A cache is valid strictly less than the maximum age old: an entry exactly
/// at the boundary is already stale. Day arithmetic is calendar-based on UTC
/// timestamps, so the check is independent of locale and timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
  max_age_days: u64,
}

impl CachePolicy {
  pub const DEFAULT_MAX_AGE_DAYS: u64 = 7;

  pub fn new(max_age_days: u64) -> Self {
    Self { max_age_days }
  }

  pub fn validate(&self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    match timestamp.checked_add_days(Days::new(self.max_age_days)) {
      Some(expiry) => now < expiry,
      None => false,
    }
  }
}

impl Default for CachePolicy {
  fn default() -> Self {
    Self::new(Self::DEFAULT_MAX_AGE_DAYS)
  }
}

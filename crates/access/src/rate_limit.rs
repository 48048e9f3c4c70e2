//! Sliding-window attempt counting for the auth endpoints.
//!
//! The counter store is injected so the gate can run against an external
//! counter backend; the in-memory implementation keeps per-key timestamp
//! buckets and prunes them against the caller-supplied clock reading.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// Limits applied to login attempts per `(identity, origin)` key.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitPolicy {
    /// Attempts allowed within the window before rejection.
    pub max_attempts: u32,
    /// Length of the sliding window.
    pub window: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            window: Duration::hours(1),
        }
    }
}

/// A shared, concurrency-safe attempt counter.
pub trait AttemptCounter: Send + Sync {
    /// Records one attempt for `key` at `now` and returns the number of
    /// attempts within the window, including this one.
    fn record(&self, key: &str, now: DateTime<Utc>, window: Duration) -> u32;
}

/// In-process counter with per-key timestamp buckets.
#[derive(Debug, Default)]
pub struct InMemoryAttemptCounter {
    attempts: Mutex<HashMap<String, Vec<DateTime<Utc>>>>,
}

impl InMemoryAttemptCounter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AttemptCounter for InMemoryAttemptCounter {
    fn record(&self, key: &str, now: DateTime<Utc>, window: Duration) -> u32 {
        let mut attempts = self.attempts.lock().unwrap();
        let bucket = attempts.entry(key.to_string()).or_default();
        let cutoff = now - window;
        bucket.retain(|t| *t > cutoff);
        bucket.push(now);
        bucket.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_attempts_within_window() {
        let counter = InMemoryAttemptCounter::new();
        let now = Utc::now();
        let window = Duration::hours(1);

        for expected in 1..=5 {
            assert_eq!(counter.record("k", now, window), expected);
        }
    }

    #[test]
    fn test_window_rolls_over() {
        let counter = InMemoryAttemptCounter::new();
        let now = Utc::now();
        let window = Duration::hours(1);

        for _ in 0..10 {
            counter.record("k", now, window);
        }
        assert_eq!(counter.record("k", now, window), 11);

        // An hour later the old attempts have aged out.
        let later = now + Duration::hours(1) + Duration::seconds(1);
        assert_eq!(counter.record("k", later, window), 1);
    }

    #[test]
    fn test_keys_are_independent() {
        let counter = InMemoryAttemptCounter::new();
        let now = Utc::now();
        let window = Duration::hours(1);

        counter.record("alice@web", now, window);
        counter.record("alice@web", now, window);
        assert_eq!(counter.record("alice@mobile", now, window), 1);
        assert_eq!(counter.record("bob@web", now, window), 1);
    }
}

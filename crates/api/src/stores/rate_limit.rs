//! In-memory fixed-window rate limiting.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// Expired buckets are swept opportunistically once the map reaches this size.
const SWEEP_THRESHOLD: usize = 10_000;

/// Rate limiter for admitting or denying requests per client key.
#[cfg_attr(test, mockall::automock)]
pub trait RateLimiter: Send + Sync {
    /// Admit or deny a request for `key` at time `now`. Pure policy gate,
    /// never suspends.
    fn admit(&self, key: &str, now: DateTime<Utc>) -> RateLimitResult;
}

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Under the limit, includes current count.
    Allowed(u32),
    /// Over the limit, includes current count.
    Exceeded(u32),
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed(_))
    }
}

struct Bucket {
    count: u32,
    reset_at: DateTime<Utc>,
}

/// Fixed-window counter per client key.
///
/// Deliberately bursty at window edges: a client can spend the full limit
/// just before `reset_at` and the full limit again just after. A bucket is
/// overwritten, never merged, the instant `now >= reset_at`; denied requests
/// do not increment the counter. The mutex keeps lookup-then-write atomic
/// per key under parallel requests.
pub struct FixedWindowLimiter {
    limit: u32,
    window: Duration,
    sweep_threshold: usize,
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl FixedWindowLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            sweep_threshold: SWEEP_THRESHOLD,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    #[cfg(test)]
    fn with_sweep_threshold(mut self, threshold: usize) -> Self {
        self.sweep_threshold = threshold;
        self
    }

    #[cfg(test)]
    fn bucket_count(&self) -> usize {
        self.buckets.lock().expect("rate limiter mutex poisoned").len()
    }
}

impl RateLimiter for FixedWindowLimiter {
    fn admit(&self, key: &str, now: DateTime<Utc>) -> RateLimitResult {
        let mut buckets = self.buckets.lock().expect("rate limiter mutex poisoned");

        if let Some(bucket) = buckets.get_mut(key) {
            if now < bucket.reset_at {
                if bucket.count < self.limit {
                    bucket.count += 1;
                    return RateLimitResult::Allowed(bucket.count);
                }
                return RateLimitResult::Exceeded(bucket.count);
            }
        }

        // Absent or expired: start a fresh window.
        if buckets.len() >= self.sweep_threshold {
            buckets.retain(|_, bucket| bucket.reset_at > now);
        }
        buckets.insert(
            key.to_string(),
            Bucket {
                count: 1,
                reset_at: now + self.window,
            },
        );
        RateLimitResult::Allowed(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const LIMIT: u32 = 8;

    fn limiter() -> FixedWindowLimiter {
        FixedWindowLimiter::new(LIMIT, Duration::seconds(60))
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn allows_up_to_the_limit() {
        let limiter = limiter();

        for i in 1..=LIMIT {
            assert_eq!(limiter.admit("1.2.3.4", at(0)), RateLimitResult::Allowed(i));
        }
    }

    #[test]
    fn denies_the_ninth_request_in_a_window() {
        let limiter = limiter();

        for _ in 0..LIMIT {
            assert!(limiter.admit("1.2.3.4", at(0)).is_allowed());
        }
        assert_eq!(limiter.admit("1.2.3.4", at(1)), RateLimitResult::Exceeded(LIMIT));
    }

    #[test]
    fn denial_does_not_increment_the_counter() {
        let limiter = limiter();

        for _ in 0..LIMIT {
            limiter.admit("1.2.3.4", at(0));
        }
        for _ in 0..5 {
            assert_eq!(limiter.admit("1.2.3.4", at(2)), RateLimitResult::Exceeded(LIMIT));
        }
    }

    #[test]
    fn window_expiry_admits_again() {
        let limiter = limiter();

        for _ in 0..LIMIT {
            limiter.admit("1.2.3.4", at(0));
        }
        assert!(!limiter.admit("1.2.3.4", at(59)).is_allowed());
        // reset happens the instant now reaches reset_at, not before
        assert_eq!(limiter.admit("1.2.3.4", at(60)), RateLimitResult::Allowed(1));
    }

    #[test]
    fn boundary_burst_admits_double_the_limit() {
        // Fixed-window trade-off: a full limit right before the edge and a
        // full limit right after are all admitted.
        let limiter = limiter();
        let mut admitted = 0;

        for _ in 0..LIMIT {
            if limiter.admit("1.2.3.4", at(0)).is_allowed() {
                admitted += 1;
            }
        }
        for _ in 0..LIMIT {
            if limiter.admit("1.2.3.4", at(60)).is_allowed() {
                admitted += 1;
            }
        }

        assert_eq!(admitted, 2 * LIMIT);
    }

    #[test]
    fn distinct_keys_do_not_share_buckets() {
        let limiter = limiter();

        for _ in 0..LIMIT {
            limiter.admit("1.2.3.4", at(0));
        }
        assert!(limiter.admit("5.6.7.8", at(0)).is_allowed());
    }

    #[test]
    fn sweep_evicts_expired_buckets() {
        let limiter = FixedWindowLimiter::new(LIMIT, Duration::seconds(60)).with_sweep_threshold(4);

        for key in ["a", "b", "c", "d"] {
            limiter.admit(key, at(0));
        }
        assert_eq!(limiter.bucket_count(), 4);

        // All four windows are long expired; inserting a fifth key triggers
        // the sweep first.
        limiter.admit("e", at(300));
        assert_eq!(limiter.bucket_count(), 1);
    }
}

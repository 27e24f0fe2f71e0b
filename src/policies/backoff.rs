//! # Backoff policy between replacement attempts.
//!
//! [`BackoffPolicy`] controls how long the watch loop waits before each
//! process-replacement attempt of a reload cycle. It is parameterized by:
//! - [`BackoffPolicy::first`] the delay before the first attempt;
//! - [`BackoffPolicy::factor`] the multiplicative growth factor;
//! - [`BackoffPolicy::max`] the maximum delay cap.
//!
//! The delay before attempt `n` (0-indexed) is `first × factor^n`, clamped to
//! `max`. The default is a constant 250ms, which gives a slow filesystem flush
//! time to complete without busy-polling.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use autoreload::BackoffPolicy;
//!
//! let backoff = BackoffPolicy {
//!     first: Duration::from_millis(100),
//!     max: Duration::from_secs(1),
//!     factor: 2.0,
//! };
//!
//! assert_eq!(backoff.next(0), Duration::from_millis(100));
//! assert_eq!(backoff.next(1), Duration::from_millis(200));
//! assert_eq!(backoff.next(10), Duration::from_secs(1));
//! ```

use std::time::Duration;

/// Delay before each replacement attempt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackoffPolicy {
    /// Delay before the first attempt (also covers the hook's side effects).
    pub first: Duration,
    /// Maximum delay cap.
    pub max: Duration,
    /// Multiplicative growth factor (`1.0` = constant delay).
    pub factor: f64,
}

impl Default for BackoffPolicy {
    /// Returns a constant policy: `first = max = 250ms`, `factor = 1.0`.
    fn default() -> Self {
        Self::constant(Duration::from_millis(250))
    }
}

impl BackoffPolicy {
    /// Creates a policy that waits `delay` before every attempt.
    pub const fn constant(delay: Duration) -> Self {
        Self {
            first: delay,
            max: delay,
            factor: 1.0,
        }
    }

    /// Computes the delay before the given attempt number (0-indexed).
    ///
    /// Non-finite or negative intermediate values clamp to [`BackoffPolicy::max`].
    pub fn next(&self, attempt: u32) -> Duration {
        let max_secs = self.max.as_secs_f64();
        let exp = attempt.min(i32::MAX as u32) as i32;
        let secs = self.first.as_secs_f64() * self.factor.powi(exp);

        if !secs.is_finite() || secs < 0.0 || secs > max_secs {
            self.max
        } else {
            Duration::from_secs_f64(secs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_constant_250ms() {
        let policy = BackoffPolicy::default();
        for attempt in 0..10 {
            assert_eq!(
                policy.next(attempt),
                Duration::from_millis(250),
                "attempt {} should wait 250ms",
                attempt
            );
        }
    }

    #[test]
    fn test_exponential_growth() {
        let policy = BackoffPolicy {
            first: Duration::from_millis(100),
            max: Duration::from_secs(30),
            factor: 2.0,
        };

        assert_eq!(policy.next(0), Duration::from_millis(100));
        assert_eq!(policy.next(1), Duration::from_millis(200));
        assert_eq!(policy.next(2), Duration::from_millis(400));
        assert_eq!(policy.next(3), Duration::from_millis(800));
    }

    #[test]
    fn test_first_exceeds_max() {
        let policy = BackoffPolicy {
            first: Duration::from_secs(10),
            max: Duration::from_secs(5),
            factor: 1.0,
        };
        assert_eq!(policy.next(0), Duration::from_secs(5));
    }

    #[test]
    fn test_overflow_clamps_to_max() {
        let policy = BackoffPolicy {
            first: Duration::from_millis(100),
            max: Duration::from_secs(10),
            factor: 2.0,
        };
        assert_eq!(policy.next(u32::MAX), Duration::from_secs(10));
    }
}

//! Backoff calculators.
//!
//! A [`BackoffCalculator`] maps the delay just waited to the delay before
//! the next retry. It runs once per retry, after the wait, so the first
//! retry always waits exactly the policy's initial delay.
//!
//! # Rounding
//!
//! [`multiplier`] computes in whole nanoseconds and rounds to the nearest
//! one, saturating at `u64::MAX` nanoseconds. `100ms * 1.5` is exactly
//! `150ms`, `150ms * 1.5` is exactly `225ms`.
//!
//! # Example
//!
//! ```rust
//! use stillwater_retry::backoff::{self, BackoffCalculator};
//! use std::time::Duration;
//!
//! let calc = backoff::multiplier(1.5).unwrap();
//! let d1 = Duration::from_millis(100);
//! let d2 = calc.next_delay(d1);
//! let d3 = calc.next_delay(d2);
//! assert_eq!(d2, Duration::from_millis(150));
//! assert_eq!(d3, Duration::from_millis(225));
//! ```

use std::time::Duration;

use super::error::ConfigError;

/// Maps the previous delay to the next one.
pub trait BackoffCalculator: Send + Sync {
    /// The delay to wait before the retry after `previous`.
    fn next_delay(&self, previous: Duration) -> Duration;
}

impl<F> BackoffCalculator for F
where
    F: Fn(Duration) -> Duration + Send + Sync,
{
    #[inline]
    fn next_delay(&self, previous: Duration) -> Duration {
        self(previous)
    }
}

/// Keeps the delay unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Fixed;

impl BackoffCalculator for Fixed {
    #[inline]
    fn next_delay(&self, previous: Duration) -> Duration {
        previous
    }
}

/// Multiplies the delay by a constant factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Multiplier(f64);

impl Multiplier {
    /// The factor applied on each retry.
    pub fn factor(&self) -> f64 {
        self.0
    }
}

impl BackoffCalculator for Multiplier {
    fn next_delay(&self, previous: Duration) -> Duration {
        let nanos = (previous.as_nanos() as f64 * self.0).round();
        if nanos >= u64::MAX as f64 {
            Duration::from_nanos(u64::MAX)
        } else {
            Duration::from_nanos(nanos as u64)
        }
    }
}

/// Adds a constant step to the delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Linear(Duration);

impl BackoffCalculator for Linear {
    #[inline]
    fn next_delay(&self, previous: Duration) -> Duration {
        previous.saturating_add(self.0)
    }
}

/// Limits the output of another calculator from below, above, or both.
///
/// The floor is applied first, then the ceiling, so a ceiling lower than the
/// floor wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DelayClamp {
    /// Smallest delay allowed.
    pub floor: Option<Duration>,
    /// Largest delay allowed.
    pub ceiling: Option<Duration>,
}

impl DelayClamp {
    /// Apply the clamp to a calculated delay.
    pub fn apply(&self, calculated: Duration) -> Duration {
        let floored = match self.floor {
            Some(floor) => calculated.max(floor),
            None => calculated,
        };
        match self.ceiling {
            Some(ceiling) => floored.min(ceiling),
            None => floored,
        }
    }

    /// True if neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.floor.is_none() && self.ceiling.is_none()
    }
}

/// Identity backoff: every retry waits the initial delay.
pub fn fixed() -> Fixed {
    Fixed
}

/// Multiply the delay by `factor` on each retry.
///
/// Negative, NaN and infinite factors are rejected.
pub fn multiplier(factor: f64) -> Result<Multiplier, ConfigError> {
    if !factor.is_finite() || factor < 0.0 {
        return Err(ConfigError::InvalidMultiplier(factor));
    }
    Ok(Multiplier(factor))
}

/// Double the delay on each retry.
pub fn exponential() -> Multiplier {
    Multiplier(2.0)
}

/// Add `step` to the delay on each retry.
pub fn linear(step: Duration) -> Linear {
    Linear(step)
}

/// Wraps a calculator with proportional jitter.
///
/// The inner calculator's output `d` is replaced with a uniformly random
/// delay in `[d * (1 - factor), d * (1 + factor)]`.
#[cfg(feature = "jitter")]
#[derive(Debug, Clone, Copy)]
pub struct Jittered<B> {
    inner: B,
    factor: f64,
}

#[cfg(feature = "jitter")]
impl<B: BackoffCalculator> BackoffCalculator for Jittered<B> {
    fn next_delay(&self, previous: Duration) -> Duration {
        use rand::Rng;

        let base = self.inner.next_delay(previous).as_nanos() as f64;
        let spread = base * self.factor;
        let min = (base - spread).max(0.0);
        let max = (base + spread).min(u64::MAX as f64);
        if max <= min {
            return Duration::from_nanos(min as u64);
        }
        let nanos = rand::rng().random_range(min..=max);
        Duration::from_nanos(nanos as u64)
    }
}

/// Add ±`factor` proportional randomness to another calculator.
///
/// `factor` is clamped to `[0.0, 1.0]`. Requires the `jitter` feature.
///
/// # Example
///
/// ```rust
/// use stillwater_retry::backoff::{self, BackoffCalculator};
/// use std::time::Duration;
///
/// let calc = backoff::jittered(backoff::exponential(), 0.25);
/// let next = calc.next_delay(Duration::from_millis(100));
/// assert!(next >= Duration::from_millis(150));
/// assert!(next <= Duration::from_millis(250));
/// ```
#[cfg(feature = "jitter")]
pub fn jittered<B: BackoffCalculator>(inner: B, factor: f64) -> Jittered<B> {
    let factor = if factor.is_nan() {
        0.0
    } else {
        factor.clamp(0.0, 1.0)
    };
    Jittered { inner, factor }
}

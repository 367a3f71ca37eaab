//! Time sources and waiting.
//!
//! The retry loop never calls `Instant::now` or `thread::sleep` directly.
//! Both go through the [`Clock`] and [`Sleeper`] held by the policy, so a
//! test can swap in [`ManualClock`](crate::testing::ManualClock) and run a
//! ten-minute backoff schedule in microseconds.

use std::time::{Duration, Instant};

use super::error::Interrupted;

/// A source of monotonic time.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> Instant;
}

/// Blocks the calling thread between attempts.
///
/// Returning `Err(Interrupted)` reports that the wait ended early. The
/// retry loop treats that as informational only.
pub trait Sleeper: Send + Sync {
    /// Block for `duration`.
    fn sleep(&self, duration: Duration) -> Result<(), Interrupted>;
}

/// [`Clock`] backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// [`Sleeper`] backed by [`std::thread::sleep`]. Never interrupted.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
        Ok(())
    }
}

/// Adapts a closure into a [`Sleeper`].
///
/// # Example
///
/// ```rust
/// use stillwater_retry::{FnSleeper, Sleeper};
/// use std::time::Duration;
///
/// let sleeper = FnSleeper(|_d: Duration| Ok(()));
/// assert!(sleeper.sleep(Duration::from_secs(60)).is_ok());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FnSleeper<F>(pub F);

impl<F> Sleeper for FnSleeper<F>
where
    F: Fn(Duration) -> Result<(), Interrupted> + Send + Sync,
{
    #[inline]
    fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        (self.0)(duration)
    }
}

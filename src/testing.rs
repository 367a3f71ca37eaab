//! Testing utilities for code that retries.
//!
//! Real policies block the calling thread and read the system clock, which
//! makes backoff schedules slow and flaky to test. The helpers here replace
//! both with deterministic fakes.
//!
//! # Examples
//!
//! ```rust
//! use stillwater_retry::{backoff, Policy};
//! use stillwater_retry::testing::{ManualClock, RecordingLogger};
//! use std::time::Duration;
//!
//! let clock = ManualClock::new();
//! let logger = RecordingLogger::new();
//! let policy = Policy::<(), &str>::by_attempts(
//!     Duration::from_secs(30),
//!     backoff::exponential(),
//!     2,
//! )
//! .unwrap()
//! .clock(clock.clone())
//! .sleeper(clock.clone())
//! .logger(logger.sink())
//! .build();
//!
//! let _ = policy.retry(|| Err("unavailable"));
//!
//! // A minute and a half of backoff, instantly.
//! assert_eq!(clock.sleeps(), vec![Duration::from_secs(30), Duration::from_secs(60)]);
//! assert_eq!(logger.lines().len(), 2);
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::retry::{Clock, Interrupted, Sleeper};

#[derive(Debug)]
struct ManualState {
    offset: Duration,
    sleeps: Vec<Duration>,
}

/// A fake clock that only moves when told to.
///
/// `ManualClock` is both a [`Clock`] and a [`Sleeper`]: sleeping records the
/// requested duration and advances the clock by it, without blocking.
/// Clones share the same timeline, so a test can keep one handle and give
/// another to the policy.
#[derive(Debug, Clone)]
pub struct ManualClock {
    base: Instant,
    state: Arc<Mutex<ManualState>>,
}

impl ManualClock {
    /// A clock starting at the current instant.
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            state: Arc::new(Mutex::new(ManualState {
                offset: Duration::ZERO,
                sleeps: Vec::new(),
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move the clock forward without recording a sleep.
    ///
    /// Use this inside an operation to simulate how long an attempt takes.
    pub fn advance(&self, by: Duration) {
        let mut state = self.state();
        state.offset = state.offset.saturating_add(by);
    }

    /// Time elapsed since the clock was created.
    pub fn elapsed(&self) -> Duration {
        self.state().offset
    }

    /// Every sleep requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.state().sleeps.clone()
    }

    /// Sum of every sleep requested so far.
    pub fn total_slept(&self) -> Duration {
        self.state()
            .sleeps
            .iter()
            .fold(Duration::ZERO, |acc, d| acc.saturating_add(*d))
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        saturating_instant(self.base, self.state().offset)
    }
}

/// `base + offset`, or the latest representable instant past `base`.
fn saturating_instant(base: Instant, offset: Duration) -> Instant {
    if let Some(at) = base.checked_add(offset) {
        return at;
    }
    let (mut reachable, mut unreachable) = (Duration::ZERO, offset);
    while unreachable - reachable > Duration::from_nanos(1) {
        let mid = reachable + (unreachable - reachable) / 2;
        if base.checked_add(mid).is_some() {
            reachable = mid;
        } else {
            unreachable = mid;
        }
    }
    base.checked_add(reachable).unwrap_or(base)
}

impl Sleeper for ManualClock {
    fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        let mut state = self.state();
        state.sleeps.push(duration);
        state.offset = state.offset.saturating_add(duration);
        Ok(())
    }
}

/// A [`Sleeper`] whose every wait is interrupted immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterruptingSleeper;

impl Sleeper for InterruptingSleeper {
    fn sleep(&self, _duration: Duration) -> Result<(), Interrupted> {
        Err(Interrupted)
    }
}

/// Captures log lines for later assertions.
///
/// # Example
///
/// ```rust
/// use stillwater_retry::testing::RecordingLogger;
///
/// let logger = RecordingLogger::new();
/// let sink = logger.sink();
/// sink("first");
/// sink("second");
/// assert_eq!(logger.lines(), vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingLogger {
    lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingLogger {
    /// An empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink to hand to [`PolicyBuilder::logger`](crate::PolicyBuilder::logger).
    pub fn sink(&self) -> impl Fn(&str) + Send + Sync + 'static {
        let lines = Arc::clone(&self.lines);
        move |line: &str| {
            lines
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(line.to_string());
        }
    }

    /// Lines recorded so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_starts_at_zero() {
        let clock = ManualClock::new();
        assert_eq!(clock.elapsed(), Duration::ZERO);
        assert!(clock.sleeps().is_empty());
    }

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new();
        let start = clock.now();
        clock.advance(Duration::from_millis(40));
        assert_eq!(clock.now() - start, Duration::from_millis(40));
        assert!(clock.sleeps().is_empty());
    }

    #[test]
    fn test_manual_clock_sleep_records_and_advances() {
        let clock = ManualClock::new();
        let start = clock.now();
        clock.sleep(Duration::from_millis(10)).unwrap();
        clock.sleep(Duration::from_millis(20)).unwrap();
        assert_eq!(clock.now() - start, Duration::from_millis(30));
        assert_eq!(clock.total_slept(), Duration::from_millis(30));
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_millis(10), Duration::from_millis(20)]
        );
    }

    #[test]
    fn test_manual_clock_saturates_instead_of_overflowing() {
        let clock = ManualClock::new();
        let start = clock.now();
        clock.sleep(Duration::MAX).unwrap();
        let late = clock.now();
        assert!(late > start);
        clock.advance(Duration::from_secs(1));
        assert_eq!(clock.now(), late);
        assert_eq!(clock.elapsed(), Duration::MAX);
    }

    #[test]
    fn test_manual_clock_clones_share_timeline() {
        let clock = ManualClock::new();
        let other = clock.clone();
        other.advance(Duration::from_secs(1));
        assert_eq!(clock.elapsed(), Duration::from_secs(1));
    }

    #[test]
    fn test_interrupting_sleeper() {
        assert_eq!(
            InterruptingSleeper.sleep(Duration::from_secs(1)),
            Err(Interrupted)
        );
    }

    #[test]
    fn test_recording_logger() {
        let logger = RecordingLogger::new();
        let sink = logger.sink();
        sink("a");
        assert_eq!(logger.lines(), vec!["a".to_string()]);
    }
}

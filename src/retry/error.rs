//! Error types for retry operations.

use std::time::Duration;

/// Error raised when a policy is configured with invalid arguments.
///
/// Configuration errors are always reported at the builder call that
/// received the bad value, before any operation has been invoked.
///
/// # Examples
///
/// ```rust
/// use stillwater_retry::{backoff, ConfigError, Policy};
///
/// let result = Policy::<(), String>::by_attempts(-1, backoff::fixed(), 3);
/// assert!(matches!(result, Err(ConfigError::NegativeInitialDelay(-1))));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The initial delay (in milliseconds) was negative.
    NegativeInitialDelay(i64),
    /// The maximum number of retries was negative.
    NegativeMaxAttempts(i64),
    /// The maximum duration (in milliseconds) was negative.
    NegativeMaxDuration(i64),
    /// A delay floor or ceiling (in milliseconds) was negative.
    NegativeDelayBound(i64),
    /// An exception filter was given no error kinds.
    EmptyExceptionSet,
    /// A backoff multiplier was negative, NaN or infinite.
    InvalidMultiplier(f64),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeInitialDelay(v) => {
                write!(f, "initial delay must be >= 0, got {}ms", v)
            }
            Self::NegativeMaxAttempts(v) => write!(f, "max attempts must be >= 0, got {}", v),
            Self::NegativeMaxDuration(v) => {
                write!(f, "max duration must be >= 0, got {}ms", v)
            }
            Self::NegativeDelayBound(v) => write!(f, "delay bound must be >= 0, got {}ms", v),
            Self::EmptyExceptionSet => write!(f, "exception filter requires at least one kind"),
            Self::InvalidMultiplier(v) => {
                write!(f, "backoff multiplier must be finite and >= 0, got {}", v)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Error returned by [`Policy::retry_with_metadata`] when the policy stops
/// granting retries and the last attempt failed.
///
/// Contains the final error along with metadata about the retry sequence.
/// [`Policy::retry`] returns the bare error instead.
///
/// [`Policy::retry`]: crate::Policy::retry
/// [`Policy::retry_with_metadata`]: crate::Policy::retry_with_metadata
///
/// # Examples
///
/// ```rust
/// use stillwater_retry::{backoff, testing::ManualClock, Policy};
///
/// let clock = ManualClock::new();
/// let policy = Policy::<(), &str>::by_attempts(1, backoff::fixed(), 2)
///     .unwrap()
///     .clock(clock.clone())
///     .sleeper(clock)
///     .logger(|_: &str| {})
///     .build();
///
/// let exhausted = policy.retry_with_metadata(|| Err("always fails")).unwrap_err();
/// assert_eq!(exhausted.final_error, "always fails");
/// assert_eq!(exhausted.attempts, 3); // 1 initial + 2 retries
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryExhausted<E> {
    /// The error from the final attempt.
    pub final_error: E,
    /// Total number of attempts made (initial + retries).
    pub attempts: u32,
    /// Total time spent in the retry loop.
    pub total_duration: Duration,
}

impl<E> RetryExhausted<E> {
    /// Create a new RetryExhausted error.
    pub fn new(final_error: E, attempts: u32, total_duration: Duration) -> Self {
        Self {
            final_error,
            attempts,
            total_duration,
        }
    }

    /// Extract the final error, discarding metadata.
    pub fn into_error(self) -> E {
        self.final_error
    }

    /// Get a reference to the final error.
    pub fn error(&self) -> &E {
        &self.final_error
    }
}

impl<E: std::fmt::Display> std::fmt::Display for RetryExhausted<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "retry exhausted after {} attempts ({:?}): {}",
            self.attempts, self.total_duration, self.final_error
        )
    }
}

impl<E: std::error::Error + 'static> std::error::Error for RetryExhausted<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.final_error)
    }
}

/// Signal that a wait was cut short before its full duration elapsed.
///
/// Returned by a [`Sleeper`](crate::Sleeper). The retry loop logs it and
/// carries on with the next attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Interrupted;

impl std::fmt::Display for Interrupted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "wait interrupted")
    }
}

impl std::error::Error for Interrupted {}

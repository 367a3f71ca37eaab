//! Policies for operations whose input must be reset between attempts.

use std::sync::Arc;

use super::error::RetryExhausted;
use super::policy::Policy;

/// A [`Policy`] paired with a function that reconstitutes the operation's
/// input before each retry.
///
/// Useful when a failed attempt leaves its input partly consumed: a cursor
/// that has advanced, a buffer that has been drained, a request body that
/// has been streamed. The reset runs once per retry, after the wait and
/// immediately before the next invocation. The first attempt always sees
/// the caller's input unchanged.
///
/// Like the policy it wraps, a `ResettablePolicy` is immutable and cheap to
/// clone.
///
/// # Example
///
/// ```rust
/// use stillwater_retry::{backoff, testing::ManualClock, Policy};
///
/// let clock = ManualClock::new();
/// let policy = Policy::<usize, String>::by_attempts(10, backoff::fixed(), 3)?
///     .clock(clock.clone())
///     .sleeper(clock)
///     .logger(|_: &str| {})
///     .build()
///     .with_reset(|mut queue: Vec<u8>| {
///         queue.sort();
///         queue
///     });
///
/// let mut calls = 0;
/// let drained = policy.retry(vec![3, 1, 2], |queue| {
///     calls += 1;
///     let first = queue.pop().unwrap_or_default();
///     if calls == 1 {
///         queue.push(9);
///         return Err(format!("stalled after {}", first));
///     }
///     Ok(queue.len())
/// });
///
/// // second attempt saw [1, 3, 9] sorted, popped 9
/// assert_eq!(drained, Ok(2));
/// # Ok::<(), stillwater_retry::ConfigError>(())
/// ```
pub struct ResettablePolicy<I, T, E> {
    policy: Policy<T, E>,
    reset: Arc<dyn Fn(I) -> I + Send + Sync>,
}

impl<I, T, E> Clone for ResettablePolicy<I, T, E> {
    fn clone(&self) -> Self {
        Self {
            policy: self.policy.clone(),
            reset: Arc::clone(&self.reset),
        }
    }
}

impl<I, T, E> std::fmt::Debug for ResettablePolicy<I, T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResettablePolicy")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<I, T, E> ResettablePolicy<I, T, E> {
    /// The wrapped policy.
    pub fn policy(&self) -> &Policy<T, E> {
        &self.policy
    }

    /// Apply the reset function to `input`.
    pub fn reset(&self, input: I) -> I {
        (self.reset)(input)
    }

    /// Invoke `operation` on `input` until the policy stops granting
    /// retries, resetting the input before each retry.
    pub fn retry<F>(&self, input: I, operation: F) -> Result<T, E>
    where
        F: FnMut(&mut I) -> Result<T, E>,
    {
        self.policy
            .executor()
            .retry_with_input(input, |i| (self.reset)(i), operation)
    }

    /// Like [`retry`](Self::retry), but a final failure carries the attempt
    /// count and total time spent.
    pub fn retry_with_metadata<F>(&self, input: I, operation: F) -> Result<T, RetryExhausted<E>>
    where
        F: FnMut(&mut I) -> Result<T, E>,
    {
        self.policy
            .executor()
            .retry_with_input_and_metadata(input, |i| (self.reset)(i), operation)
    }
}

impl<T, E> Policy<T, E> {
    /// Pair this policy with an input-reset function.
    pub fn with_reset<I, R>(&self, reset: R) -> ResettablePolicy<I, T, E>
    where
        R: Fn(I) -> I + Send + Sync + 'static,
    {
        ResettablePolicy {
            policy: self.clone(),
            reset: Arc::new(reset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backoff;
    use crate::testing::ManualClock;

    fn policy(max_attempts: u32) -> Policy<(), String> {
        let clock = ManualClock::new();
        Policy::by_attempts(5, backoff::fixed(), max_attempts)
            .unwrap()
            .clock(clock.clone())
            .sleeper(clock)
            .logger(|_: &str| {})
            .build()
    }

    #[test]
    fn test_first_attempt_sees_original_input() {
        let resettable = policy(3).with_reset(|n: u32| n + 100);

        let mut seen = Vec::new();
        let result = resettable.retry(1, |n| {
            seen.push(*n);
            Ok(())
        });

        assert_eq!(result, Ok(()));
        assert_eq!(seen, vec![1]);
    }

    #[test]
    fn test_each_retry_resets_previous_input_once() {
        let resettable = policy(3).with_reset(|n: u32| n + 100);

        let mut seen = Vec::new();
        let result = resettable.retry(1, |n| {
            seen.push(*n);
            *n += 1;
            Err(format!("attempt on {}", n))
        });

        // every attempt bumps by one, every reset adds a hundred
        assert_eq!(seen, vec![1, 102, 203, 304]);
        assert_eq!(result, Err("attempt on 305".to_string()));
    }

    #[test]
    fn test_retry_with_metadata_counts_attempts() {
        let resettable = policy(2).with_reset(|s: String| s.to_uppercase());

        let exhausted = resettable
            .retry_with_metadata("abc".to_string(), |s| Err(s.clone()))
            .unwrap_err();

        assert_eq!(exhausted.attempts, 3);
        assert_eq!(exhausted.final_error, "ABC");
    }

    #[test]
    fn test_reset_helper_and_clone() {
        let resettable = policy(1).with_reset(|n: i64| -n);
        let cloned = resettable.clone();
        assert_eq!(cloned.reset(4), -4);
        assert_eq!(cloned.policy().initial_delay().as_millis(), 5);
        assert!(format!("{:?}", cloned).contains("ResettablePolicy"));
    }
}

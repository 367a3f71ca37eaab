//! The attempt / evaluate / wait loop.

use std::time::{Duration, Instant};

use super::condition::Outcome;
use super::error::RetryExhausted;
use super::policy::Policy;

/// Runs operations under a [`Policy`].
///
/// The executor borrows the policy; it holds no state of its own, so one
/// executor may run any number of operations. Each call keeps its attempt
/// counter, current delay and start time on its own stack.
///
/// Exactly one attempt is in flight at a time, on the calling thread, which
/// blocks for the whole wait between attempts.
pub struct RetryExecutor<'p, T, E> {
    policy: &'p Policy<T, E>,
}

impl<T, E> std::fmt::Debug for RetryExecutor<'_, T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryExecutor")
            .field("policy", self.policy)
            .finish()
    }
}

impl<T, E> Clone for RetryExecutor<'_, T, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, E> Copy for RetryExecutor<'_, T, E> {}

/// Per-call loop state.
#[derive(Debug)]
struct BackoffState {
    attempt: u32,
    current_delay: Duration,
    start: Instant,
}

impl BackoffState {
    /// Invocations made so far, counting the one in flight.
    fn invocations(&self) -> u32 {
        self.attempt.saturating_add(1)
    }

    fn begin_retry(&mut self) {
        self.attempt = self.attempt.saturating_add(1);
    }

    fn elapsed<T, E>(&self, policy: &Policy<T, E>) -> Duration {
        policy.clock.now().saturating_duration_since(self.start)
    }
}

/// How a loop ended.
struct Finished<T, E> {
    outcome: Outcome<T, E>,
    attempts: u32,
    elapsed: Duration,
}

impl<T, E> Finished<T, E> {
    fn into_exhausted(self) -> Result<T, RetryExhausted<E>> {
        let Finished {
            outcome,
            attempts,
            elapsed,
        } = self;
        outcome.map_err(|e| RetryExhausted::new(e, attempts, elapsed))
    }
}

impl<'p, T, E> RetryExecutor<'p, T, E> {
    /// Create an executor for `policy`.
    pub fn new(policy: &'p Policy<T, E>) -> Self {
        Self { policy }
    }

    /// The policy driving this executor.
    pub fn policy(&self) -> &'p Policy<T, E> {
        self.policy
    }

    /// Invoke `operation` until the policy stops granting retries.
    ///
    /// Returns the success value, or the error of the final attempt exactly
    /// as the operation produced it.
    pub fn retry<F>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
    {
        self.drive((), |_| operation(), |()| ()).outcome
    }

    /// Like [`retry`](Self::retry), but a final failure carries the attempt
    /// count and total time spent.
    pub fn retry_with_metadata<F>(&self, mut operation: F) -> Result<T, RetryExhausted<E>>
    where
        F: FnMut() -> Result<T, E>,
    {
        self.drive((), |_| operation(), |()| ()).into_exhausted()
    }

    /// Invoke `operation` on an input that is reset between attempts.
    ///
    /// The first attempt sees `input` unchanged. When attempt *i* fails and
    /// a retry is granted, attempt *i + 1* sees `reset` applied once to the
    /// input as attempt *i* left it. The reset runs after the wait,
    /// immediately before the next invocation.
    ///
    /// # Example
    ///
    /// ```rust
    /// use stillwater_retry::{backoff, testing::ManualClock, Policy, RetryExecutor};
    /// use std::io::{Cursor, Read};
    ///
    /// let clock = ManualClock::new();
    /// let policy = Policy::<String, String>::by_attempts(0, backoff::fixed(), 2)?
    ///     .clock(clock.clone())
    ///     .sleeper(clock)
    ///     .logger(|_: &str| {})
    ///     .build();
    ///
    /// let mut first = true;
    /// let body = RetryExecutor::new(&policy).retry_with_input(
    ///     Cursor::new(b"payload".to_vec()),
    ///     |mut cursor| { cursor.set_position(0); cursor },
    ///     |cursor| {
    ///         let mut head = [0u8; 3];
    ///         cursor.read_exact(&mut head).map_err(|e| e.to_string())?;
    ///         if std::mem::take(&mut first) {
    ///             return Err("connection reset".to_string());
    ///         }
    ///         let mut rest = String::new();
    ///         cursor.read_to_string(&mut rest).map_err(|e| e.to_string())?;
    ///         Ok(format!("{}{}", String::from_utf8_lossy(&head), rest))
    ///     },
    /// );
    /// assert_eq!(body, Ok("payload".to_string()));
    /// # Ok::<(), stillwater_retry::ConfigError>(())
    /// ```
    pub fn retry_with_input<I, R, F>(&self, input: I, reset: R, operation: F) -> Result<T, E>
    where
        R: FnMut(I) -> I,
        F: FnMut(&mut I) -> Result<T, E>,
    {
        self.drive(input, operation, reset).outcome
    }

    /// Like [`retry_with_input`](Self::retry_with_input), but a final
    /// failure carries the attempt count and total time spent.
    pub fn retry_with_input_and_metadata<I, R, F>(
        &self,
        input: I,
        reset: R,
        operation: F,
    ) -> Result<T, RetryExhausted<E>>
    where
        R: FnMut(I) -> I,
        F: FnMut(&mut I) -> Result<T, E>,
    {
        self.drive(input, operation, reset).into_exhausted()
    }

    fn drive<I, F, R>(&self, mut input: I, mut invoke: F, mut reset: R) -> Finished<T, E>
    where
        F: FnMut(&mut I) -> Outcome<T, E>,
        R: FnMut(I) -> I,
    {
        let policy = self.policy;
        let mut state = BackoffState {
            attempt: 0,
            current_delay: policy.initial_delay,
            start: policy.clock.now(),
        };

        loop {
            let outcome = invoke(&mut input);
            let elapsed = state.elapsed(policy);

            #[cfg(feature = "tracing")]
            tracing::debug!(
                attempt = state.invocations(),
                success = outcome.is_ok(),
                elapsed_ms = elapsed.as_millis() as u64,
                "attempt finished"
            );

            if !policy
                .condition
                .should_retry(state.attempt, elapsed, &outcome)
            {
                return Finished {
                    outcome,
                    attempts: state.invocations(),
                    elapsed,
                };
            }

            state.begin_retry();
            (policy.pre_retry_hook)();

            // time spent in the hook counts against a duration bound
            let wait = policy.wait_for(state.current_delay, state.elapsed(policy));
            let cause = match &outcome {
                Ok(_) => "successful result".to_string(),
                Err(e) => (policy.error_name)(e),
            };

            #[cfg(feature = "tracing")]
            tracing::info!(
                retry = state.attempt,
                delay_ms = wait.as_millis() as u64,
                cause = %cause,
                "retrying"
            );
            policy.logger.log(&format!(
                "Retrying {} after delay of {} ms for {}",
                state.attempt,
                wait.as_millis(),
                cause
            ));

            let wait = policy.wait_for(wait, state.elapsed(policy));
            if let Err(interrupted) = policy.sleeper.sleep(wait) {
                #[cfg(feature = "tracing")]
                tracing::warn!(retry = state.attempt, "{}; continuing", interrupted);
                policy.logger.log(&format!(
                    "Retry {}: {}; continuing",
                    state.attempt, interrupted
                ));
            }

            state.current_delay = policy.next_delay(state.current_delay);
            input = reset(input);
        }
    }
}

impl<T, E> Policy<T, E> {
    /// An executor borrowing this policy.
    pub fn executor(&self) -> RetryExecutor<'_, T, E> {
        RetryExecutor::new(self)
    }

    /// Invoke `operation` until the policy stops granting retries.
    ///
    /// See [`RetryExecutor::retry`].
    pub fn retry<F>(&self, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
    {
        self.executor().retry(operation)
    }

    /// See [`RetryExecutor::retry_with_metadata`].
    pub fn retry_with_metadata<F>(&self, operation: F) -> Result<T, RetryExhausted<E>>
    where
        F: FnMut() -> Result<T, E>,
    {
        self.executor().retry_with_metadata(operation)
    }
}

//! Retry conditions and the bounds they are composed from.
//!
//! A [`RetryCondition`] looks at one finished attempt and decides whether
//! another one should follow. Policies built from the bounded entry points
//! use [`Bounds`], an ordered list of [`Bound`] predicates that must all
//! agree. Custom conditions can be any closure over
//! `(attempt, elapsed, &outcome)` and combine with `and` / `or` / `not`.

use std::fmt::Debug;
use std::time::Duration;

use super::classify::{Classify, ErrorKind};
use super::error::ConfigError;

/// The result of one attempt: the operation's value or its error.
pub type Outcome<T, E> = Result<T, E>;

/// Decides whether a finished attempt should be followed by a retry.
///
/// `attempt` is the number of retries already performed (0 after the first
/// invocation). `elapsed` is measured from the start of the first attempt.
///
/// # Example
///
/// ```rust
/// use stillwater_retry::RetryCondition;
/// use std::time::Duration;
///
/// let retry_twice = |attempt: u32, _: Duration, outcome: &Result<i32, String>| {
///     outcome.is_err() && attempt < 2
/// };
/// let failed: Result<i32, String> = Err("x".into());
/// assert!(retry_twice.should_retry(0, Duration::ZERO, &failed));
/// assert!(!retry_twice.should_retry(2, Duration::ZERO, &failed));
/// assert!(!retry_twice.should_retry(0, Duration::ZERO, &Ok(1)));
/// ```
pub trait RetryCondition<T, E>: Send + Sync {
    /// True if another attempt should be made.
    fn should_retry(&self, attempt: u32, elapsed: Duration, outcome: &Outcome<T, E>) -> bool;
}

impl<T, E, F> RetryCondition<T, E> for F
where
    F: Fn(u32, Duration, &Outcome<T, E>) -> bool + Send + Sync,
{
    #[inline]
    fn should_retry(&self, attempt: u32, elapsed: Duration, outcome: &Outcome<T, E>) -> bool {
        self(attempt, elapsed, outcome)
    }
}

/// Combinators for retry conditions.
pub trait RetryConditionExt<T, E>: RetryCondition<T, E> + Sized {
    /// Retry only when both conditions agree.
    fn and<C: RetryCondition<T, E>>(self, other: C) -> And<Self, C> {
        And(self, other)
    }

    /// Retry when either condition asks for it.
    fn or<C: RetryCondition<T, E>>(self, other: C) -> Or<Self, C> {
        Or(self, other)
    }

    /// Invert the condition.
    fn not(self) -> Not<Self> {
        Not(self)
    }
}

impl<T, E, C: RetryCondition<T, E>> RetryConditionExt<T, E> for C {}

/// AND combinator - both conditions must ask for a retry.
#[derive(Clone, Copy, Debug)]
pub struct And<C1, C2>(pub C1, pub C2);

impl<T, E, C1: RetryCondition<T, E>, C2: RetryCondition<T, E>> RetryCondition<T, E>
    for And<C1, C2>
{
    #[inline]
    fn should_retry(&self, attempt: u32, elapsed: Duration, outcome: &Outcome<T, E>) -> bool {
        self.0.should_retry(attempt, elapsed, outcome)
            && self.1.should_retry(attempt, elapsed, outcome)
    }
}

/// OR combinator - either condition may ask for a retry.
#[derive(Clone, Copy, Debug)]
pub struct Or<C1, C2>(pub C1, pub C2);

impl<T, E, C1: RetryCondition<T, E>, C2: RetryCondition<T, E>> RetryCondition<T, E>
    for Or<C1, C2>
{
    #[inline]
    fn should_retry(&self, attempt: u32, elapsed: Duration, outcome: &Outcome<T, E>) -> bool {
        self.0.should_retry(attempt, elapsed, outcome)
            || self.1.should_retry(attempt, elapsed, outcome)
    }
}

/// NOT combinator - inverts the condition.
#[derive(Clone, Copy, Debug)]
pub struct Not<C>(pub C);

impl<T, E, C: RetryCondition<T, E>> RetryCondition<T, E> for Not<C> {
    #[inline]
    fn should_retry(&self, attempt: u32, elapsed: Duration, outcome: &Outcome<T, E>) -> bool {
        !self.0.should_retry(attempt, elapsed, outcome)
    }
}

/// One category of stopping criterion, evaluated against a failed attempt.
///
/// Bounds only ever see failures; [`Bounds`] handles the success case.
pub trait Bound<E>: Debug + Send + Sync {
    /// True if this bound still permits a retry.
    fn permits(&self, attempt: u32, elapsed: Duration, error: &E) -> bool;
}

/// Permits a retry while fewer than `n` retries have been made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxAttempts(pub u32);

impl<E> Bound<E> for MaxAttempts {
    #[inline]
    fn permits(&self, attempt: u32, _elapsed: Duration, _error: &E) -> bool {
        attempt < self.0
    }
}

/// Permits a retry while less than the given time has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxDuration(pub Duration);

impl<E> Bound<E> for MaxDuration {
    #[inline]
    fn permits(&self, _attempt: u32, elapsed: Duration, _error: &E) -> bool {
        elapsed < self.0
    }
}

/// Permits a retry based on the kind of the failing error.
///
/// Inclusive filters retry only errors that are one of the listed kinds (or
/// a more specific kind). Exclusive filters retry everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionFilter<K> {
    kinds: Vec<K>,
    inclusive: bool,
}

impl<K: ErrorKind> ExceptionFilter<K> {
    /// Create a filter. An empty kind set is rejected.
    pub fn new<I>(kinds: I, inclusive: bool) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = K>,
    {
        let kinds: Vec<K> = kinds.into_iter().collect();
        if kinds.is_empty() {
            return Err(ConfigError::EmptyExceptionSet);
        }
        Ok(Self { kinds, inclusive })
    }

    /// The configured kinds.
    pub fn kinds(&self) -> &[K] {
        &self.kinds
    }

    /// Whether listed kinds are retried (`true`) or excluded (`false`).
    pub fn is_inclusive(&self) -> bool {
        self.inclusive
    }

    /// True if `kind` is one of the listed kinds or a descendant of one.
    pub fn matches(&self, kind: &K) -> bool {
        self.kinds.iter().any(|k| kind.is_a(k))
    }
}

impl<E: Classify> Bound<E> for ExceptionFilter<E::Kind> {
    #[inline]
    fn permits(&self, _attempt: u32, _elapsed: Duration, error: &E) -> bool {
        self.matches(&error.kind()) == self.inclusive
    }
}

/// An ordered list of bounds combined with logical AND.
///
/// As a [`RetryCondition`], it requests a retry only for failures, and only
/// when the list is non-empty and every bound permits it. An empty list
/// never retries.
pub struct Bounds<E> {
    bounds: Vec<Box<dyn Bound<E>>>,
}

impl<E> Debug for Bounds<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bounds")
            .field("bounds", &self.bounds)
            .finish()
    }
}

impl<E> Bounds<E> {
    /// An empty list.
    pub fn new() -> Self {
        Self { bounds: Vec::new() }
    }

    /// Append a bound.
    pub fn push<B: Bound<E> + 'static>(&mut self, bound: B) {
        self.bounds.push(Box::new(bound));
    }

    pub(crate) fn push_boxed(&mut self, bound: Box<dyn Bound<E>>) {
        self.bounds.push(bound);
    }

    /// Append a bound, builder style.
    pub fn with<B: Bound<E> + 'static>(mut self, bound: B) -> Self {
        self.push(bound);
        self
    }

    /// Number of active bounds.
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    /// True if no bound is active.
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }
}

impl<E> Default for Bounds<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> RetryCondition<T, E> for Bounds<E> {
    fn should_retry(&self, attempt: u32, elapsed: Duration, outcome: &Outcome<T, E>) -> bool {
        match outcome {
            Ok(_) => false,
            Err(error) => {
                !self.bounds.is_empty()
                    && self
                        .bounds
                        .iter()
                        .all(|b| b.permits(attempt, elapsed, error))
            }
        }
    }
}

//! Retry policies and the builder that assembles them.

use std::sync::Arc;
use std::time::Duration;

use super::backoff::{BackoffCalculator, DelayClamp};
use super::classify::Classify;
use super::clock::{Clock, MonotonicClock, Sleeper, ThreadSleeper};
use super::condition::{Bound, Bounds, ExceptionFilter, MaxAttempts, MaxDuration, RetryCondition};
use super::convert::{IntoAttempts, IntoDelay};
use super::error::ConfigError;
use super::logger::{stdout_logger, Logger};

type Hook = Arc<dyn Fn() + Send + Sync>;
type ErrorName<E> = Arc<dyn Fn(&E) -> String + Send + Sync>;

/// An immutable description of how to retry an operation.
///
/// A policy is built once with [`PolicyBuilder`] and never changes. Cloning
/// is cheap and every clone shares the same configuration, so one policy can
/// drive any number of concurrent [`retry`](Policy::retry) calls from
/// different threads. Per-call state (attempt counter, current delay, start
/// time) lives on the stack of each call.
///
/// `T` and `E` are the success and error types of the operations the policy
/// will retry; conditions may look at either.
///
/// # Examples
///
/// ```rust
/// use stillwater_retry::{backoff, testing::ManualClock, Policy};
///
/// let clock = ManualClock::new();
/// let policy = Policy::<u32, String>::by_attempts(100, backoff::multiplier(1.5)?, 3)?
///     .clock(clock.clone())
///     .sleeper(clock.clone())
///     .build();
///
/// let mut calls = 0;
/// let result = policy.retry(|| {
///     calls += 1;
///     if calls < 4 { Err(format!("failure {}", calls)) } else { Ok(calls) }
/// });
///
/// assert_eq!(result, Ok(4));
/// assert_eq!(clock.total_slept().as_millis(), 100 + 150 + 225);
/// # Ok::<(), stillwater_retry::ConfigError>(())
/// ```
pub struct Policy<T, E> {
    pub(crate) initial_delay: Duration,
    pub(crate) backoff: Arc<dyn BackoffCalculator>,
    pub(crate) clamp: DelayClamp,
    pub(crate) condition: Arc<dyn RetryCondition<T, E>>,
    pub(crate) max_duration: Option<Duration>,
    pub(crate) logger: Logger,
    pub(crate) pre_retry_hook: Hook,
    pub(crate) error_name: ErrorName<E>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) sleeper: Arc<dyn Sleeper>,
}

impl<T, E> Clone for Policy<T, E> {
    fn clone(&self) -> Self {
        Self {
            initial_delay: self.initial_delay,
            backoff: Arc::clone(&self.backoff),
            clamp: self.clamp,
            condition: Arc::clone(&self.condition),
            max_duration: self.max_duration,
            logger: self.logger.clone(),
            pre_retry_hook: Arc::clone(&self.pre_retry_hook),
            error_name: Arc::clone(&self.error_name),
            clock: Arc::clone(&self.clock),
            sleeper: Arc::clone(&self.sleeper),
        }
    }
}

impl<T, E> std::fmt::Debug for Policy<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Policy")
            .field("initial_delay", &self.initial_delay)
            .field("clamp", &self.clamp)
            .field("max_duration", &self.max_duration)
            .finish_non_exhaustive()
    }
}

impl<T: 'static, E: 'static> Policy<T, E> {
    /// Start a policy bounded by the number of retries.
    ///
    /// `max_attempts` counts retries, not invocations: an operation that
    /// always fails is invoked `max_attempts + 1` times.
    ///
    /// # Errors
    ///
    /// Negative `initial_delay` or `max_attempts`.
    pub fn by_attempts<D, B, N>(
        initial_delay: D,
        backoff: B,
        max_attempts: N,
    ) -> Result<PolicyBuilder<T, E>, ConfigError>
    where
        D: IntoDelay,
        B: BackoffCalculator + 'static,
        N: IntoAttempts,
    {
        let initial_delay = initial_delay_of(initial_delay)?;
        let max_attempts = max_attempts_of(max_attempts)?;
        Ok(PolicyBuilder::bounded(
            initial_delay,
            Arc::new(backoff),
            Bounds::new().with(MaxAttempts(max_attempts)),
            None,
        ))
    }

    /// Start a policy bounded by total elapsed time.
    ///
    /// A retry is granted while less than `max_duration` has elapsed since
    /// the first attempt started. Waits are shortened so they never run
    /// past `max_duration`.
    ///
    /// # Errors
    ///
    /// Negative `initial_delay` or `max_duration`.
    pub fn by_duration<D, B, M>(
        initial_delay: D,
        backoff: B,
        max_duration: M,
    ) -> Result<PolicyBuilder<T, E>, ConfigError>
    where
        D: IntoDelay,
        B: BackoffCalculator + 'static,
        M: IntoDelay,
    {
        let initial_delay = initial_delay_of(initial_delay)?;
        let max_duration = max_duration_of(max_duration)?;
        Ok(PolicyBuilder::bounded(
            initial_delay,
            Arc::new(backoff),
            Bounds::new().with(MaxDuration(max_duration)),
            Some(max_duration),
        ))
    }

    /// Start a policy bounded by both retries and elapsed time.
    ///
    /// Retries stop as soon as either bound is reached.
    ///
    /// # Errors
    ///
    /// Negative `initial_delay`, `max_attempts` or `max_duration`.
    pub fn by_attempts_and_duration<D, B, N, M>(
        initial_delay: D,
        backoff: B,
        max_attempts: N,
        max_duration: M,
    ) -> Result<PolicyBuilder<T, E>, ConfigError>
    where
        D: IntoDelay,
        B: BackoffCalculator + 'static,
        N: IntoAttempts,
        M: IntoDelay,
    {
        let initial_delay = initial_delay_of(initial_delay)?;
        let max_attempts = max_attempts_of(max_attempts)?;
        let max_duration = max_duration_of(max_duration)?;
        Ok(PolicyBuilder::bounded(
            initial_delay,
            Arc::new(backoff),
            Bounds::new()
                .with(MaxAttempts(max_attempts))
                .with(MaxDuration(max_duration)),
            Some(max_duration),
        ))
    }

    /// Start a policy driven entirely by `condition`.
    ///
    /// The condition is used verbatim: it sees successes as well as
    /// failures, and no built-in bound is added. The delay starts at zero
    /// and stays fixed unless [`PolicyBuilder::backoff`] is called.
    ///
    /// # Example
    ///
    /// ```rust
    /// use stillwater_retry::{testing::ManualClock, Policy};
    /// use std::time::Duration;
    ///
    /// // Poll until the value is ready, at most 5 times.
    /// let clock = ManualClock::new();
    /// let policy = Policy::<Option<u8>, ()>::custom(
    ///     |attempt: u32, _: Duration, outcome: &Result<Option<u8>, ()>| {
    ///         attempt < 5 && matches!(outcome, Ok(None))
    ///     },
    /// )
    /// .clock(clock.clone())
    /// .sleeper(clock)
    /// .logger(|_: &str| {})
    /// .build();
    ///
    /// let mut polls = 0;
    /// let ready = policy.retry(|| {
    ///     polls += 1;
    ///     Ok(if polls == 3 { Some(7) } else { None })
    /// });
    /// assert_eq!(ready, Ok(Some(7)));
    /// ```
    pub fn custom<C>(condition: C) -> PolicyBuilder<T, E>
    where
        C: RetryCondition<T, E> + 'static,
    {
        PolicyBuilder::new(
            Duration::ZERO,
            Arc::new(super::backoff::fixed()),
            ConditionSource::Custom(Arc::new(condition)),
            None,
        )
    }
}

impl<T, E> Policy<T, E> {
    /// The delay before the first retry.
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// The duration bound, if the policy has one.
    pub fn max_duration(&self) -> Option<Duration> {
        self.max_duration
    }

    /// The floor and ceiling applied to calculated delays.
    pub fn clamp(&self) -> DelayClamp {
        self.clamp
    }

    /// Evaluate the policy's condition for one finished attempt.
    pub fn should_retry(&self, attempt: u32, elapsed: Duration, outcome: &Result<T, E>) -> bool {
        self.condition.should_retry(attempt, elapsed, outcome)
    }

    /// The delay that follows `current`: backoff, then floor and ceiling.
    pub fn next_delay(&self, current: Duration) -> Duration {
        self.clamp.apply(self.backoff.next_delay(current))
    }

    /// How long to actually wait given the current delay and the time
    /// already spent. Only a duration bound can shorten the wait.
    pub(crate) fn wait_for(&self, current: Duration, elapsed: Duration) -> Duration {
        match self.max_duration {
            Some(max) => current.min(max.saturating_sub(elapsed)),
            None => current,
        }
    }
}

fn initial_delay_of<D: IntoDelay>(delay: D) -> Result<Duration, ConfigError> {
    delay.into_delay().map_err(ConfigError::NegativeInitialDelay)
}

fn max_attempts_of<N: IntoAttempts>(attempts: N) -> Result<u32, ConfigError> {
    attempts
        .into_attempts()
        .map_err(ConfigError::NegativeMaxAttempts)
}

fn max_duration_of<M: IntoDelay>(duration: M) -> Result<Duration, ConfigError> {
    duration
        .into_delay()
        .map_err(ConfigError::NegativeMaxDuration)
}

fn default_error_name<E>(_: &E) -> String {
    std::any::type_name::<E>().to_string()
}

enum ConditionSource<T, E> {
    Bounded {
        bounds: Bounds<E>,
        filter: Option<Box<dyn Bound<E>>>,
    },
    Custom(Arc<dyn RetryCondition<T, E>>),
}

/// Builder for [`Policy`].
///
/// Obtained from one of the entry points on [`Policy`]; refinements can be
/// chained in any order before [`build`](PolicyBuilder::build).
///
/// # Example
///
/// ```rust
/// use stillwater_retry::{backoff, Policy};
/// use std::time::Duration;
///
/// let policy = Policy::<String, std::io::Error>::by_attempts_and_duration(
///     Duration::from_millis(50),
///     backoff::exponential(),
///     5,
///     Duration::from_secs(10),
/// )?
/// .max_delay(Duration::from_secs(2))?
/// .register_pre_retry_hook(|| { /* bump a metric */ })
/// .logger(|line: &str| eprintln!("{}", line))
/// .build();
///
/// assert_eq!(policy.max_duration(), Some(Duration::from_secs(10)));
/// # Ok::<(), stillwater_retry::ConfigError>(())
/// ```
pub struct PolicyBuilder<T, E> {
    initial_delay: Duration,
    backoff: Arc<dyn BackoffCalculator>,
    condition: ConditionSource<T, E>,
    max_duration: Option<Duration>,
    clamp: DelayClamp,
    logger: Logger,
    pre_retry_hook: Hook,
    error_name: ErrorName<E>,
    clock: Arc<dyn Clock>,
    sleeper: Arc<dyn Sleeper>,
}

impl<T, E> std::fmt::Debug for PolicyBuilder<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let condition = match &self.condition {
            ConditionSource::Bounded { bounds, filter } => {
                format!(
                    "Bounded({} bounds, filter: {})",
                    bounds.len(),
                    filter.is_some()
                )
            }
            ConditionSource::Custom(_) => "Custom".to_string(),
        };
        f.debug_struct("PolicyBuilder")
            .field("initial_delay", &self.initial_delay)
            .field("condition", &condition)
            .field("max_duration", &self.max_duration)
            .field("clamp", &self.clamp)
            .finish_non_exhaustive()
    }
}

impl<T: 'static, E: 'static> PolicyBuilder<T, E> {
    fn new(
        initial_delay: Duration,
        backoff: Arc<dyn BackoffCalculator>,
        condition: ConditionSource<T, E>,
        max_duration: Option<Duration>,
    ) -> Self {
        Self {
            initial_delay,
            backoff,
            condition,
            max_duration,
            clamp: DelayClamp::default(),
            logger: stdout_logger(),
            pre_retry_hook: Arc::new(|| {}),
            error_name: Arc::new(default_error_name::<E>),
            clock: Arc::new(MonotonicClock),
            sleeper: Arc::new(ThreadSleeper),
        }
    }

    fn bounded(
        initial_delay: Duration,
        backoff: Arc<dyn BackoffCalculator>,
        bounds: Bounds<E>,
        max_duration: Option<Duration>,
    ) -> Self {
        Self::new(
            initial_delay,
            backoff,
            ConditionSource::Bounded {
                bounds,
                filter: None,
            },
            max_duration,
        )
    }

    /// Send retry log lines to `logger` instead of stdout.
    ///
    /// Accepts a closure or a ready-made [`Logger`] such as
    /// [`silent_logger`](crate::silent_logger).
    pub fn logger<L: Into<Logger>>(mut self, logger: L) -> Self {
        self.logger = logger.into();
        self
    }

    /// Run `hook` once per retry, immediately before the wait.
    pub fn register_pre_retry_hook<H>(mut self, hook: H) -> Self
    where
        H: Fn() + Send + Sync + 'static,
    {
        self.pre_retry_hook = Arc::new(hook);
        self
    }

    /// Replace the initial delay and backoff calculator.
    ///
    /// # Errors
    ///
    /// Negative `initial_delay`.
    pub fn backoff<D, B>(mut self, initial_delay: D, backoff: B) -> Result<Self, ConfigError>
    where
        D: IntoDelay,
        B: BackoffCalculator + 'static,
    {
        self.initial_delay = initial_delay_of(initial_delay)?;
        self.backoff = Arc::new(backoff);
        Ok(self)
    }

    /// Never let a calculated delay drop below `floor`.
    ///
    /// The initial delay is not affected.
    ///
    /// # Errors
    ///
    /// Negative `floor`.
    pub fn min_delay<D: IntoDelay>(mut self, floor: D) -> Result<Self, ConfigError> {
        self.clamp.floor = Some(
            floor
                .into_delay()
                .map_err(ConfigError::NegativeDelayBound)?,
        );
        Ok(self)
    }

    /// Never let a calculated delay exceed `ceiling`.
    ///
    /// The initial delay is not affected.
    ///
    /// # Errors
    ///
    /// Negative `ceiling`.
    pub fn max_delay<D: IntoDelay>(mut self, ceiling: D) -> Result<Self, ConfigError> {
        self.clamp.ceiling = Some(
            ceiling
                .into_delay()
                .map_err(ConfigError::NegativeDelayBound)?,
        );
        Ok(self)
    }

    /// Use `clock` to measure elapsed time.
    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Use `sleeper` to wait between attempts.
    pub fn sleeper<S: Sleeper + 'static>(mut self, sleeper: S) -> Self {
        self.sleeper = Arc::new(sleeper);
        self
    }

    /// Control how a failing error is named in log lines.
    ///
    /// Defaults to the error's type name.
    pub fn error_name<N>(mut self, name: N) -> Self
    where
        N: Fn(&E) -> String + Send + Sync + 'static,
    {
        self.error_name = Arc::new(name);
        self
    }

    /// Finish the policy.
    pub fn build(self) -> Policy<T, E> {
        let condition: Arc<dyn RetryCondition<T, E>> = match self.condition {
            ConditionSource::Bounded { mut bounds, filter } => {
                if let Some(filter) = filter {
                    bounds.push_boxed(filter);
                }
                Arc::new(bounds)
            }
            ConditionSource::Custom(condition) => condition,
        };

        Policy {
            initial_delay: self.initial_delay,
            backoff: self.backoff,
            clamp: self.clamp,
            condition,
            max_duration: self.max_duration,
            logger: self.logger,
            pre_retry_hook: self.pre_retry_hook,
            error_name: self.error_name,
            clock: self.clock,
            sleeper: self.sleeper,
        }
    }

    fn warn(&self, message: &str) {
        #[cfg(feature = "tracing")]
        tracing::warn!("{}", message);
        self.logger.log(message);
    }
}

impl<T: 'static, E: Classify + 'static> PolicyBuilder<T, E> {
    /// Retry only (`inclusive = true`) or never (`inclusive = false`) for
    /// errors of the given kinds, including more specific kinds.
    ///
    /// Calling this again replaces the previous filter and logs a warning.
    /// Custom policies ignore the filter, with a warning.
    ///
    /// # Errors
    ///
    /// An empty `kinds` set.
    pub fn exceptions<I>(mut self, kinds: I, inclusive: bool) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = E::Kind>,
    {
        let filter = ExceptionFilter::new(kinds, inclusive)?;
        match &self.condition {
            ConditionSource::Custom(_) => {
                self.warn("exception filter ignored: custom condition is used verbatim");
            }
            ConditionSource::Bounded { filter: Some(_), .. } => {
                self.warn("exception filter replaced: previous filter discarded");
            }
            ConditionSource::Bounded { filter: None, .. } => {}
        }
        if let ConditionSource::Bounded { filter: slot, .. } = &mut self.condition {
            *slot = Some(Box::new(filter));
        }
        Ok(self)
    }

    /// Name failing errors by their kind in log lines.
    pub fn name_errors_by_kind(self) -> Self {
        self.error_name(|e: &E| format!("{:?}", e.kind()))
    }
}

#[cfg(test)]
mod policy_tests {
    use super::*;
    use crate::backoff;
    use crate::ErrorKind;
    use std::sync::Mutex;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Kind {
        Network,
        Auth,
    }

    impl ErrorKind for Kind {}

    #[derive(Debug)]
    struct TestError(Kind);

    impl Classify for TestError {
        type Kind = Kind;
        fn kind(&self) -> Kind {
            self.0
        }
    }

    const ZERO: Duration = Duration::ZERO;

    fn err(kind: Kind) -> Result<(), TestError> {
        Err(TestError(kind))
    }

    #[test]
    fn test_negative_initial_delay_rejected() {
        let result = Policy::<(), TestError>::by_attempts(-1, backoff::fixed(), 3);
        assert!(matches!(result, Err(ConfigError::NegativeInitialDelay(-1))));
    }

    #[test]
    fn test_negative_max_attempts_rejected() {
        let result = Policy::<(), TestError>::by_attempts(10, backoff::fixed(), -2);
        assert!(matches!(result, Err(ConfigError::NegativeMaxAttempts(-2))));
    }

    #[test]
    fn test_negative_max_duration_rejected() {
        let result = Policy::<(), TestError>::by_duration(10, backoff::fixed(), -5);
        assert!(matches!(result, Err(ConfigError::NegativeMaxDuration(-5))));

        let result =
            Policy::<(), TestError>::by_attempts_and_duration(10, backoff::fixed(), 3, -7_i64);
        assert!(matches!(result, Err(ConfigError::NegativeMaxDuration(-7))));
    }

    #[test]
    fn test_negative_delay_bounds_rejected() {
        let builder = Policy::<(), TestError>::by_attempts(10, backoff::fixed(), 3).unwrap();
        assert!(matches!(
            builder.max_delay(-1),
            Err(ConfigError::NegativeDelayBound(-1))
        ));
    }

    #[test]
    fn test_by_attempts_condition() {
        let policy = Policy::<(), TestError>::by_attempts(10, backoff::fixed(), 2)
            .unwrap()
            .build();
        assert!(policy.should_retry(0, ZERO, &err(Kind::Network)));
        assert!(policy.should_retry(1, ZERO, &err(Kind::Network)));
        assert!(!policy.should_retry(2, ZERO, &err(Kind::Network)));
        assert!(!policy.should_retry(0, ZERO, &Ok(())));
    }

    #[test]
    fn test_by_duration_condition() {
        let policy = Policy::<(), TestError>::by_duration(10, backoff::fixed(), 1000)
            .unwrap()
            .build();
        assert!(policy.should_retry(100, Duration::from_millis(999), &err(Kind::Auth)));
        assert!(!policy.should_retry(0, Duration::from_secs(1), &err(Kind::Auth)));
        assert_eq!(policy.max_duration(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_by_attempts_and_duration_condition() {
        let policy = Policy::<(), TestError>::by_attempts_and_duration(
            10,
            backoff::fixed(),
            3,
            Duration::from_secs(1),
        )
        .unwrap()
        .build();
        assert!(policy.should_retry(2, Duration::from_millis(10), &err(Kind::Auth)));
        assert!(!policy.should_retry(3, Duration::from_millis(10), &err(Kind::Auth)));
        assert!(!policy.should_retry(0, Duration::from_secs(2), &err(Kind::Auth)));
    }

    #[test]
    fn test_exceptions_inclusive() {
        let policy = Policy::<(), TestError>::by_attempts(10, backoff::fixed(), 3)
            .unwrap()
            .exceptions([Kind::Network], true)
            .unwrap()
            .build();
        assert!(policy.should_retry(0, ZERO, &err(Kind::Network)));
        assert!(!policy.should_retry(0, ZERO, &err(Kind::Auth)));
    }

    #[test]
    fn test_exceptions_exclusive() {
        let policy = Policy::<(), TestError>::by_attempts(10, backoff::fixed(), 3)
            .unwrap()
            .exceptions([Kind::Auth], false)
            .unwrap()
            .build();
        assert!(policy.should_retry(0, ZERO, &err(Kind::Network)));
        assert!(!policy.should_retry(0, ZERO, &err(Kind::Auth)));
    }

    #[test]
    fn test_exceptions_empty_set_rejected() {
        let result = Policy::<(), TestError>::by_attempts(10, backoff::fixed(), 3)
            .unwrap()
            .exceptions(Vec::<Kind>::new(), true);
        assert!(matches!(result, Err(ConfigError::EmptyExceptionSet)));
    }

    #[test]
    fn test_exceptions_twice_overwrites_and_warns() {
        let lines = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = Arc::clone(&lines);

        let policy = Policy::<(), TestError>::by_attempts(10, backoff::fixed(), 3)
            .unwrap()
            .logger(move |line: &str| sink.lock().unwrap().push(line.to_string()))
            .exceptions([Kind::Network], true)
            .unwrap()
            .exceptions([Kind::Auth], true)
            .unwrap()
            .build();

        assert!(policy.should_retry(0, ZERO, &err(Kind::Auth)));
        assert!(!policy.should_retry(0, ZERO, &err(Kind::Network)));

        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("replaced"));
    }

    #[test]
    fn test_custom_ignores_exception_filter() {
        let policy = Policy::<(), TestError>::custom(
            |attempt: u32, _: Duration, _: &Result<(), TestError>| attempt < 1,
        )
        .logger(|_: &str| {})
        .exceptions([Kind::Network], true)
        .unwrap()
        .build();

        assert!(policy.should_retry(0, ZERO, &err(Kind::Auth)));
        // custom conditions see successes too
        assert!(policy.should_retry(0, ZERO, &Ok(())));
        assert!(!policy.should_retry(1, ZERO, &err(Kind::Network)));
    }

    #[test]
    fn test_next_delay_applies_clamp() {
        let policy = Policy::<(), TestError>::by_attempts(100, backoff::exponential(), 10)
            .unwrap()
            .max_delay(300)
            .unwrap()
            .build();
        assert_eq!(policy.initial_delay(), Duration::from_millis(100));
        assert_eq!(
            policy.next_delay(Duration::from_millis(100)),
            Duration::from_millis(200)
        );
        assert_eq!(
            policy.next_delay(Duration::from_millis(200)),
            Duration::from_millis(300)
        );
    }

    #[test]
    fn test_min_delay_is_a_floor() {
        let halving = backoff::multiplier(0.5).unwrap();
        let policy = Policy::<(), TestError>::by_attempts(100, halving, 10)
            .unwrap()
            .min_delay(80)
            .unwrap()
            .build();
        assert_eq!(
            policy.next_delay(Duration::from_millis(100)),
            Duration::from_millis(80)
        );
        assert_eq!(policy.clamp().floor, Some(Duration::from_millis(80)));
    }

    #[test]
    fn test_wait_for_respects_duration_bound() {
        let policy = Policy::<(), TestError>::by_duration(500, backoff::fixed(), 1000)
            .unwrap()
            .build();
        assert_eq!(
            policy.wait_for(Duration::from_millis(500), Duration::from_millis(800)),
            Duration::from_millis(200)
        );
        assert_eq!(
            policy.wait_for(Duration::from_millis(500), Duration::from_millis(100)),
            Duration::from_millis(500)
        );
    }

    #[test]
    fn test_wait_for_without_duration_bound() {
        let policy = Policy::<(), TestError>::by_attempts(500, backoff::fixed(), 1)
            .unwrap()
            .build();
        assert_eq!(
            policy.wait_for(Duration::from_millis(500), Duration::from_secs(60)),
            Duration::from_millis(500)
        );
    }

    #[test]
    fn test_policy_is_clone_and_debug() {
        let policy = Policy::<(), TestError>::by_attempts(10, backoff::fixed(), 3)
            .unwrap()
            .build();
        let cloned = policy.clone();
        assert_eq!(cloned.initial_delay(), policy.initial_delay());
        assert!(format!("{:?}", policy).contains("Policy"));
    }

    #[test]
    fn test_builder_accepts_ready_made_loggers() {
        let quiet = Policy::<(), TestError>::by_attempts(10, backoff::fixed(), 3)
            .unwrap()
            .logger(crate::silent_logger())
            .exceptions([Kind::Network], true)
            .unwrap()
            .exceptions([Kind::Auth], true)
            .unwrap()
            .build();
        assert!(quiet.should_retry(0, ZERO, &err(Kind::Auth)));

        let lines = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = Arc::clone(&lines);
        let shared = Logger::new(move |line: &str| sink.lock().unwrap().push(line.to_string()));
        let _ = Policy::<(), TestError>::custom(|_: u32, _: Duration, _: &Result<(), TestError>| {
            false
        })
        .logger(shared.clone())
        .exceptions([Kind::Network], true)
        .unwrap()
        .build();
        assert_eq!(lines.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_policy_is_send_and_sync() {
        fn assert_send_sync<P: Send + Sync>() {}
        assert_send_sync::<Policy<String, TestError>>();
    }
}

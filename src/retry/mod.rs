//! Retry policies and the synchronous loop that applies them.
//!
//! This module follows the "pure core, imperative shell" philosophy:
//!
//! - **Pure Core**: conditions and backoff calculators are plain functions
//!   of their inputs; a [`Policy`] is immutable data around them
//! - **Composable**: bounds stack with logical AND, conditions combine with
//!   `and` / `or` / `not`
//! - **Imperative Shell**: [`RetryExecutor`] is the only place that invokes
//!   the operation, reads the clock and blocks
//!
//! # Quick Start
//!
//! ```rust
//! use stillwater_retry::{backoff, Policy};
//! use std::time::Duration;
//!
//! let policy = Policy::<u32, String>::by_attempts(
//!     Duration::from_millis(1),
//!     backoff::exponential(),
//!     3,
//! )?
//! .logger(|_: &str| {})
//! .build();
//!
//! let mut calls = 0;
//! let value = policy.retry(|| {
//!     calls += 1;
//!     if calls < 3 { Err("not yet".to_string()) } else { Ok(calls) }
//! });
//! assert_eq!(value, Ok(3));
//! # Ok::<(), stillwater_retry::ConfigError>(())
//! ```
//!
//! # Bounds
//!
//! Every built-in entry point names a mandatory bound:
//!
//! - [`Policy::by_attempts`]: at most N retries (N + 1 invocations)
//! - [`Policy::by_duration`]: retry while less than D has elapsed
//! - [`Policy::by_attempts_and_duration`]: both
//! - [`Policy::custom`]: no built-in bounds, the condition decides alone
//!
//! [`PolicyBuilder::exceptions`] adds a third, kind-based bound.
//!
//! # Error Types
//!
//! - [`ConfigError`]: invalid builder arguments, raised at the call site
//! - [`RetryExhausted`]: opt-in wrapper for a final failure with metadata
//! - [`Interrupted`]: reported by a [`Sleeper`] whose wait was cut short

pub mod backoff;
mod classify;
mod clock;
mod condition;
mod convert;
mod error;
mod executor;
mod logger;
mod policy;
mod resettable;

pub use backoff::{BackoffCalculator, DelayClamp};
pub use classify::{Classify, ErrorKind};
pub use clock::{Clock, FnSleeper, MonotonicClock, Sleeper, ThreadSleeper};
pub use condition::{
    And, Bound, Bounds, ExceptionFilter, MaxAttempts, MaxDuration, Not, Or, Outcome,
    RetryCondition, RetryConditionExt,
};
pub use convert::{IntoAttempts, IntoDelay};
pub use error::{ConfigError, Interrupted, RetryExhausted};
pub use executor::RetryExecutor;
pub use logger::{silent_logger, stdout_logger, write_log_line, Logger, LOG_PREFIX};
pub use policy::{Policy, PolicyBuilder};
pub use resettable::ResettablePolicy;

//! # Stillwater Retry
//!
//! > *"Still waters run pure"*
//!
//! A synchronous retry and backoff decision engine.
//!
//! ## Philosophy
//!
//! Retrying is split the stillwater way, **pure core, imperative shell**:
//! - **Still** = the [`Policy`]: immutable, shareable, built once. Its
//!   conditions and backoff calculators are pure functions.
//! - **Water** = the [`RetryExecutor`]: invokes the operation, reads the
//!   clock, waits, and returns a single final outcome.
//!
//! ## Quick Example
//!
//! ```rust
//! use stillwater_retry::{backoff, Classify, ErrorKind, Policy};
//! use std::time::Duration;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! enum Kind { Unavailable, Rejected }
//! impl ErrorKind for Kind {}
//!
//! #[derive(Debug, PartialEq)]
//! struct ApiError(Kind);
//! impl Classify for ApiError {
//!     type Kind = Kind;
//!     fn kind(&self) -> Kind { self.0 }
//! }
//!
//! let policy = Policy::<&str, ApiError>::by_attempts(
//!     Duration::from_millis(1),
//!     backoff::multiplier(1.5)?,
//!     3,
//! )?
//! .exceptions([Kind::Unavailable], true)?
//! .logger(|line: &str| println!("{}", line))
//! .build();
//!
//! // Rejections are not retried and come back exactly as produced.
//! let mut calls = 0;
//! let result = policy.retry(|| {
//!     calls += 1;
//!     Err(ApiError(Kind::Rejected))
//! });
//! assert_eq!(result, Err(ApiError(Kind::Rejected)));
//! assert_eq!(calls, 1);
//! # Ok::<(), stillwater_retry::ConfigError>(())
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod retry;
pub mod testing;

// Re-exports
pub use retry::backoff;
pub use retry::{
    BackoffCalculator, Bound, Bounds, Classify, Clock, ConfigError, DelayClamp, ErrorKind,
    ExceptionFilter, FnSleeper, Interrupted, IntoAttempts, IntoDelay, Logger, MaxAttempts,
    MaxDuration, MonotonicClock, Outcome, Policy, PolicyBuilder, ResettablePolicy, RetryCondition,
    RetryConditionExt, RetryExecutor, RetryExhausted, Sleeper, ThreadSleeper,
};
pub use retry::{silent_logger, stdout_logger, write_log_line, LOG_PREFIX};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::retry::backoff::{self, BackoffCalculator};
    pub use crate::retry::{
        Classify, ConfigError, ErrorKind, Policy, PolicyBuilder, RetryCondition,
        RetryConditionExt, RetryExecutor,
    };
}

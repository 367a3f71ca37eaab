//! Log sink used by retry policies.

use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

/// Prefix written by [`stdout_logger`] in front of every line.
pub const LOG_PREFIX: &str = "[stillwater-retry]";

/// A shared `&str` sink receiving one line per retry.
///
/// Any `Fn(&str) + Send + Sync` closure converts into a `Logger`, so both
/// closures and the ready-made loggers below can be handed to
/// [`PolicyBuilder::logger`](crate::PolicyBuilder::logger).
///
/// ```rust
/// use stillwater_retry::{backoff, silent_logger, Logger, Policy};
///
/// let _quiet = Policy::<(), String>::by_attempts(0, backoff::fixed(), 1)?
///     .logger(silent_logger())
///     .build();
///
/// let logger = Logger::from(|line: &str| eprintln!("{}", line));
/// logger.log("retrying soon");
/// # Ok::<(), stillwater_retry::ConfigError>(())
/// ```
#[derive(Clone)]
pub struct Logger(Arc<dyn Fn(&str) + Send + Sync>);

impl Logger {
    /// Wrap `sink` as a logger.
    pub fn new<F>(sink: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        Self(Arc::new(sink))
    }

    /// Send one line to the sink.
    pub fn log(&self, message: &str) {
        (self.0)(message)
    }
}

impl<F> From<F> for Logger
where
    F: Fn(&str) + Send + Sync + 'static,
{
    fn from(sink: F) -> Self {
        Self::new(sink)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Logger")
    }
}

/// Write `message` to `out` as one prefixed line: `[stillwater-retry] <message>`.
pub fn write_log_line<W: Write>(mut out: W, message: &str) -> io::Result<()> {
    writeln!(out, "{} {}", LOG_PREFIX, message)
}

/// The default logger: writes `[stillwater-retry] <message>` to stdout.
///
/// Write failures are ignored; logging must never affect the retry outcome.
pub fn stdout_logger() -> Logger {
    Logger::new(|message: &str| {
        let _ = write_log_line(io::stdout().lock(), message);
    })
}

/// A logger that discards everything.
pub fn silent_logger() -> Logger {
    Logger::new(|_: &str| {})
}

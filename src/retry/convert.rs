//! Conversions accepted by the policy entry points.
//!
//! Delays and durations can be given either as a [`Duration`] or as a plain
//! integer number of milliseconds. Attempt counts accept any integer. Signed
//! integers let a negative value reach the builder, where it is rejected with
//! a [`ConfigError`](crate::ConfigError) instead of being silently wrapped.

use std::time::Duration;

/// A value that can be read as a non-negative delay.
///
/// `Err` carries the offending negative value in milliseconds.
pub trait IntoDelay {
    /// Convert into a [`Duration`], or return the negative millisecond value.
    fn into_delay(self) -> Result<Duration, i64>;
}

impl IntoDelay for Duration {
    #[inline]
    fn into_delay(self) -> Result<Duration, i64> {
        Ok(self)
    }
}

impl IntoDelay for u32 {
    #[inline]
    fn into_delay(self) -> Result<Duration, i64> {
        Ok(Duration::from_millis(u64::from(self)))
    }
}

impl IntoDelay for u64 {
    #[inline]
    fn into_delay(self) -> Result<Duration, i64> {
        Ok(Duration::from_millis(self))
    }
}

impl IntoDelay for i32 {
    #[inline]
    fn into_delay(self) -> Result<Duration, i64> {
        i64::from(self).into_delay()
    }
}

impl IntoDelay for i64 {
    #[inline]
    fn into_delay(self) -> Result<Duration, i64> {
        u64::try_from(self).map(Duration::from_millis).map_err(|_| self)
    }
}

/// A value that can be read as a non-negative attempt count.
///
/// `Err` carries the offending negative value.
pub trait IntoAttempts {
    /// Convert into a retry count, or return the negative value.
    fn into_attempts(self) -> Result<u32, i64>;
}

impl IntoAttempts for u32 {
    #[inline]
    fn into_attempts(self) -> Result<u32, i64> {
        Ok(self)
    }
}

impl IntoAttempts for u64 {
    #[inline]
    fn into_attempts(self) -> Result<u32, i64> {
        Ok(u32::try_from(self).unwrap_or(u32::MAX))
    }
}

impl IntoAttempts for usize {
    #[inline]
    fn into_attempts(self) -> Result<u32, i64> {
        Ok(u32::try_from(self).unwrap_or(u32::MAX))
    }
}

impl IntoAttempts for i32 {
    #[inline]
    fn into_attempts(self) -> Result<u32, i64> {
        i64::from(self).into_attempts()
    }
}

impl IntoAttempts for i64 {
    #[inline]
    fn into_attempts(self) -> Result<u32, i64> {
        if self < 0 {
            Err(self)
        } else {
            Ok(u32::try_from(self).unwrap_or(u32::MAX))
        }
    }
}

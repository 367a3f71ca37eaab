//! Property-based tests for retry policies

use proptest::prelude::*;
use std::time::Duration;
use stillwater_retry::testing::{ManualClock, RecordingLogger};
use stillwater_retry::{backoff, BackoffCalculator, Classify, ErrorKind, Policy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Root,
    Child,
    Grandchild,
    Unrelated,
}

impl ErrorKind for Kind {
    fn parent(&self) -> Option<Self> {
        match self {
            Kind::Grandchild => Some(Kind::Child),
            Kind::Child => Some(Kind::Root),
            Kind::Root | Kind::Unrelated => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Failure(Kind, u32);

impl Classify for Failure {
    type Kind = Kind;
    fn kind(&self) -> Kind {
        self.0
    }
}

fn any_kind() -> impl Strategy<Value = Kind> {
    prop_oneof![
        Just(Kind::Root),
        Just(Kind::Child),
        Just(Kind::Grandchild),
        Just(Kind::Unrelated),
    ]
}

proptest! {
    #[test]
    fn prop_always_failing_invokes_n_plus_one_times(
        max_attempts in 0u32..20,
        delay_ms in 0u64..1_000,
    ) {
        let clock = ManualClock::new();
        let logger = RecordingLogger::new();
        let policy = Policy::<(), Failure>::by_attempts(delay_ms, backoff::exponential(), max_attempts)
            .unwrap()
            .clock(clock.clone())
            .sleeper(clock.clone())
            .logger(logger.sink())
            .build();

        let mut calls = 0u32;
        let result = policy.retry(|| {
            calls += 1;
            Err(Failure(Kind::Root, calls))
        });

        prop_assert_eq!(calls, max_attempts + 1);
        prop_assert_eq!(result, Err(Failure(Kind::Root, max_attempts + 1)));
        prop_assert_eq!(logger.lines().len() as u32, max_attempts);
        prop_assert_eq!(clock.sleeps().len() as u32, max_attempts);
    }

    #[test]
    fn prop_duration_bound_never_overruns(
        budget_ms in 0u64..5_000,
        delay_ms in 0u64..2_000,
        attempt_ms in 0u64..300,
    ) {
        let clock = ManualClock::new();
        let budget = Duration::from_millis(budget_ms);
        let attempt_cost = Duration::from_millis(attempt_ms);
        let policy = Policy::<(), Failure>::by_duration(delay_ms, backoff::multiplier(1.5).unwrap(), budget)
            .unwrap()
            .clock(clock.clone())
            .sleeper(clock.clone())
            .logger(|_: &str| {})
            .build();

        let start = clock.elapsed();
        let mut calls = 0u32;
        let _ = policy.retry(|| {
            calls += 1;
            clock.advance(attempt_cost);
            // zero-cost attempts with zero delay never move the clock
            if attempt_ms == 0 && delay_ms == 0 && calls > 50 {
                clock.advance(budget);
            }
            Err(Failure(Kind::Root, calls))
        });

        prop_assert!(clock.elapsed() - start <= budget + attempt_cost);
    }

    #[test]
    fn prop_inclusive_filter_retries_iff_is_a(
        listed in any_kind(),
        thrown in any_kind(),
    ) {
        let clock = ManualClock::new();
        let policy = Policy::<(), Failure>::by_attempts(1, backoff::fixed(), 1)
            .unwrap()
            .exceptions([listed], true)
            .unwrap()
            .clock(clock.clone())
            .sleeper(clock.clone())
            .logger(|_: &str| {})
            .build();

        let mut calls = 0u32;
        let _ = policy.retry(|| {
            calls += 1;
            Err(Failure(thrown, calls))
        });

        let retried = calls > 1;
        prop_assert_eq!(retried, thrown.is_a(&listed));
    }

    #[test]
    fn prop_exclusive_filter_retries_iff_not_is_a(
        listed in any_kind(),
        thrown in any_kind(),
    ) {
        let clock = ManualClock::new();
        let policy = Policy::<(), Failure>::by_attempts(1, backoff::fixed(), 1)
            .unwrap()
            .exceptions([listed], false)
            .unwrap()
            .clock(clock.clone())
            .sleeper(clock.clone())
            .logger(|_: &str| {})
            .build();

        let mut calls = 0u32;
        let _ = policy.retry(|| {
            calls += 1;
            Err(Failure(thrown, calls))
        });

        let retried = calls > 1;
        prop_assert_eq!(retried, !thrown.is_a(&listed));
    }

    #[test]
    fn prop_waits_follow_the_calculator(
        initial_ms in 1u64..10_000,
        retries in 1u32..8,
    ) {
        let clock = ManualClock::new();
        let calc = backoff::multiplier(1.5).unwrap();
        let policy = Policy::<(), Failure>::by_attempts(initial_ms, calc, retries)
            .unwrap()
            .clock(clock.clone())
            .sleeper(clock.clone())
            .logger(|_: &str| {})
            .build();

        let _ = policy.retry(|| Err(Failure(Kind::Root, 0)));

        let mut expected = Vec::new();
        let mut d = Duration::from_millis(initial_ms);
        for _ in 0..retries {
            expected.push(d);
            d = calc.next_delay(d);
        }
        prop_assert_eq!(clock.sleeps(), expected);
    }

    #[test]
    fn prop_reset_applied_once_between_attempts(
        start in 0u64..1_000,
        retries in 0u32..10,
    ) {
        let clock = ManualClock::new();
        let resettable = Policy::<(), u64>::by_attempts(0, backoff::fixed(), retries)
            .unwrap()
            .clock(clock.clone())
            .sleeper(clock)
            .logger(|_: &str| {})
            .build()
            .with_reset(|n: u64| n * 3 + 1);

        let mut observed = Vec::new();
        let _ = resettable.retry(start, |n| {
            observed.push(*n);
            Err(*n)
        });

        prop_assert_eq!(observed.len() as u32, retries + 1);
        prop_assert_eq!(observed[0], start);
        for pair in observed.windows(2) {
            prop_assert_eq!(pair[1], pair[0] * 3 + 1);
        }
    }
}

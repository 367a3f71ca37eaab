//! Retry Patterns Example
//!
//! Demonstrates the synchronous retry engine.
//! Shows practical patterns including:
//! - Basic retry with multiplicative backoff
//! - Duration-bounded retry
//! - Kind-based exception filters
//! - Pre-retry hooks and a custom logger
//! - Resetting a partially consumed input between attempts
//!
//! Run with: cargo run --example retry_patterns

use std::io::{Cursor, Read};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use stillwater_retry::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HttpKind {
    Transport,
    Timeout,
    ServerError,
    ClientError,
}

impl ErrorKind for HttpKind {
    fn parent(&self) -> Option<Self> {
        match self {
            HttpKind::Timeout => Some(HttpKind::Transport),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct HttpError {
    kind: HttpKind,
    status: Option<u16>,
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{:?} ({})", self.kind, status),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

impl Classify for HttpError {
    type Kind = HttpKind;
    fn kind(&self) -> HttpKind {
        self.kind
    }
}

// ==================== Basic Retry ====================

/// Example 1: fail three times, succeed on the fourth call.
fn example_basic_retry() -> Result<(), ConfigError> {
    println!("\n=== Example 1: Basic Retry ===");

    let policy = Policy::<&str, String>::by_attempts(100, backoff::multiplier(1.5)?, 3)?.build();

    let mut calls = 0;
    let result = policy.retry(|| {
        calls += 1;
        println!("  Attempt {}", calls);
        if calls < 4 {
            Err(format!("transient failure {}", calls))
        } else {
            Ok("connected")
        }
    });

    println!("Result: {:?} after {} calls", result, calls);
    Ok(())
}

// ==================== Duration Bound ====================

/// Example 2: keep trying for at most half a second.
fn example_duration_bound() -> Result<(), ConfigError> {
    println!("\n=== Example 2: Duration Bound ===");

    let policy = Policy::<(), &str>::by_duration(
        Duration::from_millis(50),
        backoff::exponential(),
        Duration::from_millis(500),
    )?
    .max_delay(Duration::from_millis(200))?
    .build();

    let start = Instant::now();
    let result = policy.retry_with_metadata(|| Err("service unavailable"));

    if let Err(exhausted) = result {
        println!("Gave up: {} (wall clock {:?})", exhausted, start.elapsed());
    }
    Ok(())
}

// ==================== Exception Filters ====================

/// Example 3: retry transport problems, fail fast on client errors.
fn example_exception_filter() -> Result<(), ConfigError> {
    println!("\n=== Example 3: Exception Filter ===");

    let policy = Policy::<String, HttpError>::by_attempts(20, backoff::fixed(), 5)?
        .exceptions([HttpKind::Transport, HttpKind::ServerError], true)?
        .name_errors_by_kind()
        .build();

    let attempts = AtomicU32::new(0);
    let result = policy.retry(|| {
        let n = attempts.fetch_add(1, Ordering::SeqCst);
        match n {
            0 => Err(HttpError {
                kind: HttpKind::Timeout,
                status: None,
            }),
            1 => Err(HttpError {
                kind: HttpKind::ServerError,
                status: Some(503),
            }),
            _ => Err(HttpError {
                kind: HttpKind::ClientError,
                status: Some(404),
            }),
        }
    });

    match result {
        Ok(body) => println!("Response: {}", body),
        Err(e) => println!("Request failed (client errors are not retried): {}", e),
    }
    println!("Total attempts: {}", attempts.load(Ordering::SeqCst));
    Ok(())
}

// ==================== Hooks ====================

/// Example 4: count retries in a hook and route log lines to stderr.
fn example_hooks() -> Result<(), ConfigError> {
    println!("\n=== Example 4: Hooks and Logging ===");

    let retries = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&retries);

    let step = Duration::from_millis(10);
    let policy = Policy::<u32, &str>::by_attempts(10, backoff::linear(step), 4)?
        .register_pre_retry_hook(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .logger(|line: &str| eprintln!("[demo] {}", line))
        .build();

    let mut calls = 0;
    let _ = policy.retry(|| {
        calls += 1;
        if calls < 3 {
            Err("flaky")
        } else {
            Ok(calls)
        }
    });

    println!("Hook saw {} retries", retries.load(Ordering::SeqCst));
    Ok(())
}

// ==================== Resettable Input ====================

/// Example 5: rewind a cursor that a failed attempt partially read.
fn example_resettable_input() -> Result<(), ConfigError> {
    println!("\n=== Example 5: Resettable Input ===");

    let upload = Policy::<usize, String>::by_attempts(10, backoff::fixed(), 3)?
        .build()
        .with_reset(|mut body: Cursor<Vec<u8>>| {
            println!("  Rewinding body from position {}", body.position());
            body.set_position(0);
            body
        });

    let mut attempt = 0;
    let sent = upload.retry(Cursor::new(b"hello, stillwater".to_vec()), |body| {
        attempt += 1;
        let mut chunk = [0u8; 5];
        body.read_exact(&mut chunk).map_err(|e| e.to_string())?;
        if attempt < 2 {
            return Err("connection reset mid-upload".to_string());
        }
        let mut rest = Vec::new();
        body.read_to_end(&mut rest).map_err(|e| e.to_string())?;
        Ok(chunk.len() + rest.len())
    });

    println!("Uploaded {:?} bytes", sent);
    Ok(())
}

fn main() -> Result<(), ConfigError> {
    // Structured retry events are emitted alongside the log lines
    tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .init();

    println!("======================================");
    println!("       Retry Patterns Example         ");
    println!("======================================");

    example_basic_retry()?;
    example_duration_bound()?;
    example_exception_filter()?;
    example_hooks()?;
    example_resettable_input()?;

    println!("\n======================================");
    println!("           Examples Complete           ");
    println!("======================================");
    Ok(())
}

//! Exponential backoff with jitter.

use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::debug;

/// Retry policy: capped exponential backoff with millisecond jitter.
///
/// Delays double from one second, plus up to a second of jitter, capped
/// at `max_delay`.
#[derive(Clone, Copy, Debug)]
pub struct ExponentialBackoff {
    /// Maximum number of attempts before giving up.
    pub max_retries: u32,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        ExponentialBackoff {
            max_retries: 10,
            max_delay: Duration::from_secs(64),
        }
    }
}

impl ExponentialBackoff {
    /// Run `operation` until it succeeds, attempts run out, or
    /// `should_retry` declines the error. Returns the last error on
    /// failure.
    pub fn perform<T, E, F, P>(&self, mut operation: F, mut should_retry: P) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        P: FnMut(&E) -> bool,
    {
        let mut attempt = 0;
        loop {
            match operation() {
                Ok(value) => return Ok(value),
                Err(err) => {
                    attempt += 1;
                    if attempt >= self.max_retries || !should_retry(&err) {
                        return Err(err);
                    }
                    let delay = self.delay_for(attempt);
                    debug!(attempt, delay_ms = delay.as_millis() as u64, "retrying after backoff");
                    thread::sleep(delay);
                }
            }
        }
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        let exp = (attempt - 1).min(31);
        let base = Duration::from_secs(1u64 << exp);
        (base + jitter()).min(self.max_delay)
    }
}

/// Sub-second clock noise, spread over a full second.
fn jitter() -> Duration {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    Duration::from_millis(u64::from(nanos % 1000))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_backoff() -> ExponentialBackoff {
        ExponentialBackoff {
            max_retries: 4,
            max_delay: Duration::from_millis(1),
        }
    }

    #[test]
    fn first_success_returns_immediately() {
        let mut calls = 0;
        let out: Result<i32, &str> = fast_backoff().perform(
            || {
                calls += 1;
                Ok(7)
            },
            |_| true,
        );
        assert_eq!(out, Ok(7));
        assert_eq!(calls, 1);
    }

    #[test]
    fn retries_until_success() {
        let mut calls = 0;
        let out: Result<i32, &str> = fast_backoff().perform(
            || {
                calls += 1;
                if calls < 3 {
                    Err("not yet")
                } else {
                    Ok(calls)
                }
            },
            |_| true,
        );
        assert_eq!(out, Ok(3));
    }

    #[test]
    fn exhaustion_returns_the_last_error() {
        let mut calls = 0;
        let out: Result<(), i32> = fast_backoff().perform(
            || {
                calls += 1;
                Err(calls)
            },
            |_| true,
        );
        assert_eq!(out, Err(4));
        assert_eq!(calls, 4);
    }

    #[test]
    fn declined_error_stops_retrying() {
        let mut calls = 0;
        let out: Result<(), &str> = fast_backoff().perform(
            || {
                calls += 1;
                Err("fatal")
            },
            |err| *err != "fatal",
        );
        assert_eq!(out, Err("fatal"));
        assert_eq!(calls, 1);
    }

    #[test]
    fn delays_never_exceed_the_cap() {
        let backoff = ExponentialBackoff {
            max_retries: 10,
            max_delay: Duration::from_millis(5),
        };
        for attempt in 1..10 {
            assert!(backoff.delay_for(attempt) <= Duration::from_millis(5));
        }
    }
}

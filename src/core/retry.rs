//! Composable retry policies.
//!
//! A [`RetryPolicy`] starts out unlimited and can be bounded by a maximum
//! number of attempts, a total time budget, or both, with optional
//! exponential backoff between attempts. Iterating a policy yields the
//! remaining time budget before each attempt (`None` when unbounded); the
//! first attempt is always immediate and later attempts sleep their
//! backoff delay first.

use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{debug, error};

/// Bounds and pacing for a sequence of retry attempts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: Option<u32>,
    max_elapsed: Option<Duration>,
    backoff: Option<Duration>,
}

impl RetryPolicy {
    /// A policy that retries forever with no delay between attempts.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// A policy bounded by a fixed number of attempts.
    ///
    /// # Panics
    ///
    /// Panics if `max_attempts` is zero.
    pub fn attempts(max_attempts: u32) -> Self {
        Self::default().with_attempts(max_attempts)
    }

    /// A policy bounded by a total time budget.
    ///
    /// # Panics
    ///
    /// Panics if `max_elapsed` is zero.
    pub fn timed(max_elapsed: Duration) -> Self {
        Self::default().with_max_elapsed(max_elapsed)
    }

    /// Caps the number of attempts.
    ///
    /// # Panics
    ///
    /// Panics if `max_attempts` is zero.
    pub fn with_attempts(mut self, max_attempts: u32) -> Self {
        assert!(max_attempts > 0, "max_attempts must be greater than zero");
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Caps the total time spent across all attempts, measured from the
    /// first attempt.
    ///
    /// # Panics
    ///
    /// Panics if `max_elapsed` is zero.
    pub fn with_max_elapsed(mut self, max_elapsed: Duration) -> Self {
        assert!(!max_elapsed.is_zero(), "max_elapsed must be greater than zero");
        self.max_elapsed = Some(max_elapsed);
        self
    }

    /// Sleeps before every attempt after the first. The delay before the
    /// n-th retry is `backoff * 2^(n-1)`, capped by the remaining time
    /// budget when one is set.
    ///
    /// # Panics
    ///
    /// Panics if `backoff` is zero.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        assert!(!backoff.is_zero(), "backoff must be greater than zero");
        self.backoff = Some(backoff);
        self
    }

    /// The configured attempt cap, if any.
    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    /// The configured time budget, if any.
    pub fn max_elapsed(&self) -> Option<Duration> {
        self.max_elapsed
    }

    /// The configured base backoff delay, if any.
    pub fn backoff(&self) -> Option<Duration> {
        self.backoff
    }

    /// Returns a blocking iterator over the attempts this policy allows.
    pub fn iter(&self) -> Attempts {
        Attempts {
            schedule: self.schedule(),
        }
    }

    fn schedule(&self) -> Schedule {
        Schedule {
            max_attempts: self.max_attempts,
            max_elapsed: self.max_elapsed,
            backoff: self.backoff,
            attempt: 0,
            started: None,
        }
    }

    /// Runs a fallible operation under this policy, sleeping between
    /// attempts on the current thread. Returns the last error once the
    /// policy is exhausted.
    pub fn run<T, E, F>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
        E: std::fmt::Debug,
    {
        let mut attempts = self.iter();
        attempts.next();
        let mut error = match operation() {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };

        let mut attempt: u32 = 1;
        while let Some(remaining) = attempts.next() {
            debug!(attempt, remaining = ?remaining, "operation failed, retrying: {:?}", error);
            match operation() {
                Ok(value) => {
                    debug!(attempts = attempt + 1, "operation succeeded after retries");
                    return Ok(value);
                }
                Err(next_error) => error = next_error,
            }
            attempt += 1;
        }

        error!(attempts = attempt, "operation failed after all attempts: {:?}", error);
        Err(error)
    }

    /// Async counterpart of [`run`](Self::run); backoff delays use the
    /// tokio timer instead of blocking the thread.
    pub async fn run_async<T, E, F, Fut>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Debug,
    {
        let mut schedule = self.schedule();
        schedule.next_step();
        let mut error = match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };

        let mut attempt: u32 = 1;
        while let Some((delay, remaining)) = schedule.next_step() {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            debug!(attempt, remaining = ?remaining, "operation failed, retrying: {:?}", error);
            match operation().await {
                Ok(value) => {
                    debug!(attempts = attempt + 1, "operation succeeded after retries");
                    return Ok(value);
                }
                Err(next_error) => error = next_error,
            }
            attempt += 1;
        }

        error!(attempts = attempt, "operation failed after all attempts: {:?}", error);
        Err(error)
    }
}

impl IntoIterator for &RetryPolicy {
    type Item = Option<Duration>;
    type IntoIter = Attempts;

    fn into_iter(self) -> Attempts {
        self.iter()
    }
}

/// Attempt pacing shared by the blocking iterator and the async executor.
#[derive(Debug)]
struct Schedule {
    max_attempts: Option<u32>,
    max_elapsed: Option<Duration>,
    backoff: Option<Duration>,
    attempt: u32,
    started: Option<Instant>,
}

impl Schedule {
    /// Advances to the next attempt without sleeping. Returns the delay to
    /// wait before the attempt and the time budget left after that delay,
    /// or `None` once the policy is exhausted.
    fn next_step(&mut self) -> Option<(Duration, Option<Duration>)> {
        if let Some(max) = self.max_attempts {
            if self.attempt >= max {
                return None;
            }
        }

        let started = *self.started.get_or_insert_with(Instant::now);
        if self.attempt == 0 {
            self.attempt = 1;
            return Some((Duration::ZERO, self.max_elapsed));
        }

        let mut remaining = None;
        if let Some(budget) = self.max_elapsed {
            let left = budget.saturating_sub(started.elapsed());
            if left.is_zero() {
                return None;
            }
            remaining = Some(left);
        }

        let mut delay = Duration::ZERO;
        if let Some(base) = self.backoff {
            delay = base.saturating_mul(2u32.saturating_pow(self.attempt - 1));
            if let Some(left) = remaining {
                delay = delay.min(left);
                remaining = Some(left - delay);
            }
        }

        self.attempt += 1;
        Some((delay, remaining))
    }
}

/// Blocking iterator over the attempts a [`RetryPolicy`] allows.
///
/// Each `next` call sleeps the backoff delay for that attempt and yields
/// the remaining time budget, or `None` when the policy is unbounded.
#[derive(Debug)]
pub struct Attempts {
    schedule: Schedule,
}

impl Iterator for Attempts {
    type Item = Option<Duration>;

    fn next(&mut self) -> Option<Self::Item> {
        let (delay, remaining) = self.schedule.next_step()?;
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        Some(remaining)
    }
}

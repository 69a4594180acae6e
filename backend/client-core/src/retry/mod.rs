//! Bounded exponential backoff around a fallible async operation.
//!
//! The first attempt runs immediately. Attempt `n` (n >= 2) waits
//! `base_delay * 2^(n-2)` first, with no jitter. What happens once every
//! attempt has failed is chosen per call site through [`OnExhausted`].

use crate::{DEFAULT_BASE_RETRY_DELAY, DEFAULT_MAX_ATTEMPTS};

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use backoff::backoff::Backoff;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use log::{debug, error, info, warn};
use tokio::time::sleep as TokioSleep;

const BACKOFF_MULTIPLIER: f64 = 2.0;
const MAX_BACKOFF_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Behaviour once the last attempt has failed.
#[derive(Debug, Clone, PartialEq)]
pub enum OnExhausted<T> {
    /// Swallow the failure and hand this value to the caller.
    DefaultValue(T),
    /// Return the error from the last attempt.
    Rethrow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_RETRY_DELAY)
    }
}

impl RetryPolicy {
    /// `max_attempts` counts the first attempt; zero is treated as one.
    pub const fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
            base_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.base_delay)
            .with_multiplier(BACKOFF_MULTIPLIER)
            .with_randomization_factor(0.0)
            .with_max_interval(MAX_BACKOFF_INTERVAL)
            .with_max_elapsed_time(None)
            .build()
    }

    /// Run `op` until it succeeds or `max_attempts` is reached.
    ///
    /// `operation` only labels log lines.
    ///
    /// # Errors
    ///
    /// Returns the last attempt's error when every attempt failed and
    /// `on_exhausted` is [`OnExhausted::Rethrow`].
    pub async fn run<T, E, F, Fut>(
        &self,
        operation: &str,
        on_exhausted: OnExhausted<T>,
        op: F,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.run_if(operation, on_exhausted, |_| true, op).await
    }

    /// Like [`run`](Self::run), but stops at the first error for which
    /// `is_retryable` is false. That error is handled as if the attempts had
    /// run out, so `on_exhausted` still decides the outcome.
    ///
    /// # Errors
    ///
    /// Returns the last attempt's error when `on_exhausted` is
    /// [`OnExhausted::Rethrow`] and either every attempt failed or the error
    /// was not retryable.
    pub async fn run_if<T, E, F, Fut, R>(
        &self,
        operation: &str,
        on_exhausted: OnExhausted<T>,
        is_retryable: R,
        mut op: F,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
        R: Fn(&E) -> bool,
    {
        let mut backoff = self.backoff();
        let mut attempt: u32 = 1;

        loop {
            debug!("{operation}: attempt {attempt}/{}", self.max_attempts);

            let err = match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        info!("{operation}: succeeded on attempt {attempt}");
                    }
                    return Ok(value);
                }
                Err(err) => err,
            };

            warn!(
                "{operation}: attempt {attempt}/{} failed: {err}",
                self.max_attempts
            );

            if !is_retryable(&err) {
                warn!("{operation}: error is not retryable, stopping early");
                return exhaust(operation, attempt, on_exhausted, err);
            }

            if attempt >= self.max_attempts {
                return exhaust(operation, attempt, on_exhausted, err);
            }

            let Some(delay) = backoff.next_backoff() else {
                return exhaust(operation, attempt, on_exhausted, err);
            };

            debug!("{operation}: retrying in {delay:?}");
            if !delay.is_zero() {
                TokioSleep(delay).await;
            }

            attempt += 1;
        }
    }
}

fn exhaust<T, E: Display>(
    operation: &str,
    attempts: u32,
    on_exhausted: OnExhausted<T>,
    last_error: E,
) -> Result<T, E> {
    match on_exhausted {
        OnExhausted::DefaultValue(value) => {
            warn!("{operation}: giving up after {attempts} attempts, using default value");
            Ok(value)
        }
        OnExhausted::Rethrow => {
            error!("{operation}: giving up after {attempts} attempts: {last_error}");
            Err(last_error)
        }
    }
}

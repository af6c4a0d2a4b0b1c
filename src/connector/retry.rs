//! Bounded retry with a pluggable backoff.
//!
//! `retry` drives one logical operation (an endpoint lookup, a push) through at
//! most `max_attempts` tries. It sleeps between attempts, never after the last
//! one, and gives up early when the error says another try is pointless or
//! the cancellation token fires.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::utils::error::{PushError, ResolveError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same pause after every failed attempt.
    Fixed(Duration),
    /// `initial * factor^(attempt - 1)`, capped at `max`.
    Exponential {
        initial: Duration,
        max: Duration,
        factor: u32,
    },
}

impl Backoff {
    /// Pause after the `attempt`-th failure (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        match *self {
            Backoff::Fixed(delay) => delay,
            Backoff::Exponential {
                initial,
                max,
                factor,
            } => {
                let scale = factor
                    .checked_pow(attempt.saturating_sub(1))
                    .unwrap_or(u32::MAX);
                initial.checked_mul(scale).unwrap_or(max).min(max)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub fn fixed(max_attempts: u32, idle: Duration) -> Self {
        Self::new(max_attempts, Backoff::Fixed(idle))
    }
}

/// Whether an error is worth another attempt.
pub trait Retryable {
    fn is_retryable(&self) -> bool {
        true
    }
}

impl Retryable for ResolveError {}

impl Retryable for PushError {
    fn is_retryable(&self) -> bool {
        !matches!(self, PushError::NameTooLong(_))
    }
}

#[derive(Debug)]
pub enum RetryError<E> {
    /// Every attempt failed; `last` is the final error.
    Exhausted { attempts: u32, last: E },
    /// Attempt `attempt` failed with an error that rules out retrying.
    Aborted { attempt: u32, error: E },
    Cancelled,
}

/// Run `op` until it succeeds, returning its value and the attempt number
/// that produced it.
pub async fn retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut op: F,
) -> Result<(T, u32), RetryError<E>>
where
    E: Retryable + Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;

    loop {
        if cancel.is_cancelled() {
            return Err(RetryError::Cancelled);
        }
        attempt += 1;

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(RetryError::Cancelled),
            result = op(attempt) => result,
        };

        let error = match result {
            Ok(value) => return Ok((value, attempt)),
            Err(error) => error,
        };

        if !error.is_retryable() {
            return Err(RetryError::Aborted { attempt, error });
        }
        if attempt >= policy.max_attempts {
            return Err(RetryError::Exhausted {
                attempts: attempt,
                last: error,
            });
        }

        let delay = policy.backoff.delay(attempt);
        warn!(
            attempt,
            max_attempts = policy.max_attempts,
            error = %error,
            delay_ms = delay.as_millis() as u64,
            "attempt failed, retrying"
        );

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(RetryError::Cancelled),
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

//! Bounded retry with exponential backoff.
//!
//! The policy is explicit data (attempt count, delay schedule) so callers
//! can test dispatch behavior without a live network dependency. Errors are
//! split into transient and fatal by a caller-supplied classifier; fatal
//! errors stop the loop on the first attempt.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Retry schedule: total attempts and the delay curve between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the original (1 means no retries).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Delay cap, in milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Exponential multiplier applied per retry.
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    30_000
}

fn default_multiplier() -> f64 {
    2.0
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            multiplier: default_multiplier(),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (0 is the first retry).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let ms = self.initial_delay_ms as f64 * self.multiplier.powi(retry as i32);
        Duration::from_millis(ms.min(self.max_delay_ms as f64) as u64)
    }
}

/// Cooperative cancellation flag, checked at attempt and backoff boundaries.
///
/// Clones share the same flag; any holder can cancel.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Why a retried operation did not produce a value.
#[derive(Debug, Clone, PartialEq)]
pub enum RetryError<E> {
    /// The operation failed with a fatal error, or exhausted the policy.
    Operation { error: E, attempts: u32 },
    /// Cancellation was observed before a value was produced.
    Cancelled { attempts: u32 },
}

/// Run `op` under `policy`, sleeping between attempts.
///
/// Each attempt is a fresh invocation; nothing is carried over from a
/// failed attempt. `is_transient` decides whether a failure is worth
/// retrying. The token is consulted before every attempt and before every
/// backoff sleep.
pub fn run<T, E, F, C>(
    policy: &RetryPolicy,
    cancel: &CancelToken,
    mut is_transient: C,
    mut op: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Result<T, E>,
    C: FnMut(&E) -> bool,
{
    let mut attempts = 0;

    loop {
        if cancel.is_cancelled() {
            return Err(RetryError::Cancelled { attempts });
        }

        attempts += 1;

        match op() {
            Ok(value) => return Ok(value),
            Err(error) if attempts >= policy.max_attempts || !is_transient(&error) => {
                return Err(RetryError::Operation { error, attempts });
            }
            Err(_) => {
                let delay = policy.delay_for(attempts - 1);
                if cancel.is_cancelled() {
                    return Err(RetryError::Cancelled { attempts });
                }
                std::thread::sleep(delay);
            }
        }
    }
}

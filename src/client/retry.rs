// ABOUTME: Exponential backoff retry wrapper for caller-side save requests
// ABOUTME: One initial attempt plus a bounded number of retries with doubling delays
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

/// Retry configuration for save requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the initial attempt
    pub max_retries: u32,
    /// Delay before the first retry in milliseconds
    pub initial_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 1000,
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries
    #[must_use]
    pub const fn no_retry() -> Self {
        Self {
            max_retries: 0,
            initial_backoff_ms: 0,
        }
    }

    /// Delay before retry number `retry` (1-based)
    #[must_use]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let factor = 2_u64.saturating_pow(retry.saturating_sub(1));
        Duration::from_millis(self.initial_backoff_ms.saturating_mul(factor))
    }

    /// Total attempts including the first
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Run `operation` until it succeeds or the policy is exhausted
///
/// # Errors
///
/// Returns the error from the last attempt once every retry has failed
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: &RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut retry = 0;
    loop {
        match operation().await {
            Ok(value) => {
                if retry > 0 {
                    debug!(operation = operation_name, retries = retry, "Succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) if retry < policy.max_retries => {
                retry += 1;
                let backoff = policy.delay_for_retry(retry);
                warn!(
                    operation = operation_name,
                    error = %e,
                    "Attempt failed, retry {}/{} after {}ms",
                    retry,
                    policy.max_retries,
                    backoff.as_millis()
                );
                tokio::time::sleep(backoff).await;
            }
            Err(e) => {
                warn!(
                    operation = operation_name,
                    error = %e,
                    attempts = policy.max_attempts(),
                    "Retries exhausted"
                );
                return Err(e);
            }
        }
    }
}

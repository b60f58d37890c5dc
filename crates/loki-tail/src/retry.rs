// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;
use std::time::Duration;

/// Default number of retries after the first push attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Default base delay between attempts, in milliseconds.
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 100;

/// How failed push attempts are retried.
///
/// The first field of every variant is the number of retries after the
/// initial attempt, so a request is sent at most `max_retries + 1` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryStrategy {
    /// Retry right away.
    Immediate(u32),
    /// Wait `base_ms * retry` before each retry.
    LinearBackoff(u32, u64),
    /// Wait `base_ms * 2^(retry - 1)` before each retry.
    ExponentialBackoff(u32, u64),
}

impl Default for RetryStrategy {
    fn default() -> Self {
        RetryStrategy::ExponentialBackoff(DEFAULT_MAX_RETRIES, DEFAULT_BACKOFF_BASE_MS)
    }
}

impl RetryStrategy {
    /// Builds a strategy from its short name (`immediate`, `linear`, `exponential`).
    pub fn from_parts(kind: &str, max_retries: u32, base_ms: u64) -> Option<Self> {
        match kind.parse::<BackoffKind>().ok()? {
            BackoffKind::Immediate => Some(RetryStrategy::Immediate(max_retries)),
            BackoffKind::Linear => Some(RetryStrategy::LinearBackoff(max_retries, base_ms)),
            BackoffKind::Exponential => {
                Some(RetryStrategy::ExponentialBackoff(max_retries, base_ms))
            }
        }
    }

    #[must_use]
    pub fn max_retries(&self) -> u32 {
        match *self {
            RetryStrategy::Immediate(retries)
            | RetryStrategy::LinearBackoff(retries, _)
            | RetryStrategy::ExponentialBackoff(retries, _) => retries,
        }
    }

    /// Upper bound on the number of requests sent for one payload.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_retries().saturating_add(1)
    }

    /// Delay before retry number `retry` (1-based).
    #[must_use]
    pub fn delay(&self, retry: u32) -> Duration {
        match *self {
            RetryStrategy::Immediate(_) => Duration::ZERO,
            RetryStrategy::LinearBackoff(_, base_ms) => {
                Duration::from_millis(base_ms.saturating_mul(u64::from(retry)))
            }
            RetryStrategy::ExponentialBackoff(_, base_ms) => {
                let factor = 2_u64.checked_pow(retry.saturating_sub(1)).unwrap_or(u64::MAX);
                Duration::from_millis(base_ms.saturating_mul(factor))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackoffKind {
    Immediate,
    Linear,
    Exponential,
}

impl FromStr for BackoffKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "immediate" | "none" => Ok(BackoffKind::Immediate),
            "linear" => Ok(BackoffKind::Linear),
            "exponential" => Ok(BackoffKind::Exponential),
            _ => Err(()),
        }
    }
}

//! Retry for provider requests with capped exponential backoff.
//!
//! Transient failures are retried:
//! - timeouts and connection errors
//! - 5xx responses
//! - 408 Request Timeout and 429 Too Many Requests
//!
//! Everything else, including other 4xx statuses, is returned immediately.

use std::{future::Future, time::Duration};

use reqwest::{Response, StatusCode};
use serde::Deserialize;

pub const DEFAULT_MAX_RETRIES: u32 = 5;
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 200;
pub const DEFAULT_MAX_DELAY_MS: u64 = 5000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
  /// Attempts after the first one.
  pub max_retries:      u32,
  /// Delay before the first retry; doubles on each further attempt.
  pub initial_delay_ms: u64,
  pub max_delay_ms:     u64,
}

impl Default for RetryConfig {
  fn default() -> Self {
    Self {
      max_retries:      DEFAULT_MAX_RETRIES,
      initial_delay_ms: DEFAULT_INITIAL_DELAY_MS,
      max_delay_ms:     DEFAULT_MAX_DELAY_MS,
    }
  }
}

impl RetryConfig {
  pub fn new(max_retries: u32, initial_delay_ms: u64, max_delay_ms: u64) -> Self {
    Self { max_retries, initial_delay_ms, max_delay_ms }
  }

  /// Delay before retry number `attempt + 1`: `initial * 2^attempt`, capped.
  pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
    let factor = 2u64.saturating_pow(attempt);
    let delay_ms = self.initial_delay_ms.saturating_mul(factor);
    Duration::from_millis(delay_ms.min(self.max_delay_ms))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
  Retry,
  NoRetry,
}

pub fn is_retryable_error(error: &reqwest::Error) -> RetryDecision {
  if error.is_timeout() || error.is_connect() {
    return RetryDecision::Retry;
  }
  if error.is_request() {
    return RetryDecision::NoRetry;
  }
  match error.status() {
    Some(status) => is_retryable_status(status),
    None => RetryDecision::NoRetry,
  }
}

pub fn is_retryable_status(status: StatusCode) -> RetryDecision {
  if status.is_server_error()
    || status == StatusCode::TOO_MANY_REQUESTS
    || status == StatusCode::REQUEST_TIMEOUT
  {
    RetryDecision::Retry
  } else {
    RetryDecision::NoRetry
  }
}

/// Run `operation` until it yields a non-retryable outcome or the retry
/// budget is spent, then return that last outcome as-is.
///
/// A response with a retryable status on the final attempt is returned as a
/// response, not an error; the caller decides what a bad status means.
pub async fn with_retry<F, Fut>(config: &RetryConfig, operation: F) -> Result<Response, reqwest::Error>
where
  F: Fn() -> Fut,
  Fut: Future<Output = Result<Response, reqwest::Error>>,
{
  let mut attempt = 0;
  loop {
    let outcome = operation().await;
    let decision = match &outcome {
      Ok(response) => is_retryable_status(response.status()),
      Err(e) => is_retryable_error(e),
    };

    if decision == RetryDecision::NoRetry || attempt >= config.max_retries {
      if attempt > 0 && decision == RetryDecision::NoRetry && outcome.is_ok() {
        tracing::info!(retries = attempt, "request succeeded after retrying");
      } else if decision == RetryDecision::Retry {
        tracing::error!(attempts = attempt + 1, "retry budget exhausted");
      }
      return outcome;
    }

    let delay = config.delay_for_attempt(attempt);
    match &outcome {
      Ok(response) => tracing::warn!(
        status = %response.status(),
        attempt = attempt + 1,
        ?delay,
        "retryable status, backing off"
      ),
      Err(e) => tracing::warn!(error = %e, attempt = attempt + 1, ?delay, "retryable error, backing off"),
    }
    tokio::time::sleep(delay).await;
    attempt += 1;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults() {
    let config = RetryConfig::default();
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.delay_for_attempt(0), Duration::from_millis(200));
  }

  #[test]
  fn delay_doubles_then_caps() {
    let config = RetryConfig::new(10, 200, 5000);
    assert_eq!(config.delay_for_attempt(1), Duration::from_millis(400));
    assert_eq!(config.delay_for_attempt(3), Duration::from_millis(1600));
    assert_eq!(config.delay_for_attempt(5), Duration::from_millis(5000));
    assert_eq!(config.delay_for_attempt(64), Duration::from_millis(5000));
  }

  #[test]
  fn retryable_statuses() {
    for status in [
      StatusCode::INTERNAL_SERVER_ERROR,
      StatusCode::BAD_GATEWAY,
      StatusCode::SERVICE_UNAVAILABLE,
      StatusCode::TOO_MANY_REQUESTS,
      StatusCode::REQUEST_TIMEOUT,
    ] {
      assert_eq!(is_retryable_status(status), RetryDecision::Retry, "{status}");
    }
    for status in [
      StatusCode::OK,
      StatusCode::BAD_REQUEST,
      StatusCode::UNAUTHORIZED,
      StatusCode::NOT_FOUND,
    ] {
      assert_eq!(is_retryable_status(status), RetryDecision::NoRetry, "{status}");
    }
  }
}

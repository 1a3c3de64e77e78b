//! Retry logic for HTTP requests with exponential backoff.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::{ApiError, FeedError, Result};

/// Default initial backoff duration for retries (1 second).
pub(crate) const DEFAULT_INITIAL_BACKOFF_SECS: u64 = 1;

/// Default maximum backoff duration for retries (30 seconds).
pub(crate) const DEFAULT_MAX_BACKOFF_SECS: u64 = 30;

/// Default maximum number of retry attempts.
pub(crate) const DEFAULT_MAX_RETRIES: u32 = 3;

/// Configuration for retry behavior.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts.
    pub max_retries: u32,
    /// Initial backoff duration for retries.
    pub initial_backoff: Duration,
    /// Maximum backoff duration for retries.
    pub max_backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: Duration::from_secs(DEFAULT_INITIAL_BACKOFF_SECS),
            max_backoff: Duration::from_secs(DEFAULT_MAX_BACKOFF_SECS),
        }
    }
}

impl RetryConfig {
    /// Calculates the backoff duration for a retry attempt.
    ///
    /// If `retry_after` is provided (from a `Retry-After` header), uses that value.
    /// Otherwise, uses exponential backoff: initial * 2^attempt, capped at max_backoff.
    pub fn calculate_backoff(&self, attempt: u32, retry_after: Option<u64>) -> Duration {
        if let Some(secs) = retry_after {
            return Duration::from_secs(secs).min(self.max_backoff);
        }
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.initial_backoff
            .checked_mul(factor)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }
}

/// Decision type for retry logic.
pub(crate) enum RetryDecision {
    /// Request succeeded with this response.
    Success(reqwest::Response),
    /// Request should be retried.
    Retry { retry_after: Option<u64> },
}

fn retry_after_header(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

/// Handles the HTTP response, returning a retry decision or error.
///
/// 429 and 5xx responses are retried while attempts remain.
pub(crate) async fn handle_response_with_retry(
    response: reqwest::Response,
    attempt: u32,
    max_retries: u32,
) -> Result<RetryDecision> {
    let status = response.status();

    if status.is_success() {
        return Ok(RetryDecision::Success(response));
    }

    let retryable = status.as_u16() == 429 || status.is_server_error();
    if retryable && attempt < max_retries {
        return Ok(RetryDecision::Retry {
            retry_after: retry_after_header(&response),
        });
    }

    Err(parse_error_response(response).await)
}

/// Parses an error response into our error types.
pub(crate) async fn parse_error_response(response: reqwest::Response) -> FeedError {
    let status = response.status();
    let status_code = status.as_u16();
    let url = response.url().to_string();
    let retry_after = retry_after_header(&response);

    let message = response.text().await.unwrap_or_default();
    let message = message.trim().to_string();

    let api_error = match status_code {
        401 | 403 => ApiError::Auth {
            message: if message.is_empty() {
                "Authentication failed".to_string()
            } else {
                message
            },
        },
        404 => ApiError::NotFound { resource: url },
        429 => ApiError::RateLimit { retry_after },
        400 => ApiError::Validation {
            message: if message.is_empty() {
                "Bad request".to_string()
            } else {
                message
            },
        },
        _ => ApiError::Http {
            status: status_code,
            message: if message.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                message
            },
        },
    };

    FeedError::Api(api_error)
}

/// Executes a request with retry logic and returns the successful response.
pub(crate) async fn execute_with_retry<F, Fut>(
    config: &RetryConfig,
    mut make_request: F,
) -> Result<reqwest::Response>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = std::result::Result<reqwest::Response, reqwest::Error>>,
{
    for attempt in 0..=config.max_retries {
        let response = make_request().await?;

        match handle_response_with_retry(response, attempt, config.max_retries).await? {
            RetryDecision::Success(response) => {
                debug!(attempt, status = %response.status(), "request succeeded");
                return Ok(response);
            }
            RetryDecision::Retry { retry_after } => {
                let backoff = config.calculate_backoff(attempt, retry_after);
                warn!(
                    attempt = attempt + 1,
                    max_retries = config.max_retries,
                    backoff_secs = backoff.as_secs_f64(),
                    "request failed, retrying"
                );
                sleep(backoff).await;
            }
        }
    }

    Err(FeedError::Api(ApiError::RateLimit { retry_after: None }))
}

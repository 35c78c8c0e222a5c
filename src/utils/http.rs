// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::StatusCode;

use crate::error::Result;
use crate::models::ScraperConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &ScraperConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Rate limiting and retry settings for page fetches.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Pause before every request
    pub request_delay: Duration,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Backoff before the first retry, doubled each time
    pub base_backoff: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &ScraperConfig) -> Self {
        Self {
            request_delay: Duration::from_millis(config.request_delay_ms),
            max_retries: config.max_retries,
            base_backoff: Duration::from_secs(1),
        }
    }

    /// No delay and no retries.
    pub fn none() -> Self {
        Self {
            request_delay: Duration::ZERO,
            max_retries: 0,
            base_backoff: Duration::ZERO,
        }
    }

    /// Backoff before retry number `attempt` (1-based): 1s, 2s, 4s, ...
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        self.base_backoff.saturating_mul(1 << exp)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&ScraperConfig::default())
    }
}

/// Whether a response status is worth retrying.
pub fn is_transient_status(status: StatusCode) -> bool {
    status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
}

fn is_transient_error(error: &reqwest::Error) -> bool {
    if error.is_timeout() || error.is_connect() {
        return true;
    }
    error.status().is_some_and(is_transient_status)
}

async fn fetch_once(client: &reqwest::Client, url: &str) -> reqwest::Result<String> {
    let response = client.get(url).send().await?.error_for_status()?;
    response.text().await
}

/// Fetch a page body, pausing first and retrying transient failures.
pub async fn fetch_text(
    client: &reqwest::Client,
    url: &str,
    policy: &RetryPolicy,
) -> Result<String> {
    let mut attempt = 0;
    loop {
        if !policy.request_delay.is_zero() {
            tokio::time::sleep(policy.request_delay).await;
        }

        match fetch_once(client, url).await {
            Ok(text) => return Ok(text),
            Err(error) if attempt < policy.max_retries && is_transient_error(&error) => {
                attempt += 1;
                let wait = policy.backoff(attempt);
                log::warn!(
                    "Request to {} failed ({}), retry {}/{} in {:?}",
                    url,
                    error,
                    attempt,
                    policy.max_retries,
                    wait
                );
                tokio::time::sleep(wait).await;
            }
            Err(error) => return Err(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_secs(1));
        assert_eq!(policy.backoff(2), Duration::from_secs(2));
        assert_eq!(policy.backoff(3), Duration::from_secs(4));
    }

    #[test]
    fn test_default_policy_matches_config() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.request_delay, Duration::from_millis(1000));
        assert_eq!(policy.max_retries, 3);
    }

    #[test]
    fn test_transient_statuses() {
        assert!(is_transient_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_transient_status(StatusCode::REQUEST_TIMEOUT));
        assert!(is_transient_status(StatusCode::BAD_GATEWAY));
        assert!(!is_transient_status(StatusCode::NOT_FOUND));
        assert!(!is_transient_status(StatusCode::FORBIDDEN));
    }

    #[test]
    fn test_create_client() {
        assert!(create_async_client(&ScraperConfig::default()).is_ok());
    }
}

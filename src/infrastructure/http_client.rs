//! HTTP client for the nutrition portal with rate limiting and error handling
//!
//! [`PageFetcher`] is the seam between the scrape pipeline and the network.
//! [`HttpClient`] is the production implementation; tests substitute a fake
//! that serves canned HTML.

use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, direct::NotKeyed},
};
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, USER_AGENT},
};

use crate::infrastructure::config::ScraperConfig;
use crate::infrastructure::parsing_error::FetchError;

/// Retrieves a page body as text.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

/// HTTP client configuration
#[derive(Debug, Clone, serde::Serialize)]
pub struct HttpClientConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_requests_per_second: u32,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::from(&ScraperConfig::default())
    }
}

impl From<&ScraperConfig> for HttpClientConfig {
    fn from(config: &ScraperConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout_seconds: config.request_timeout_seconds,
            max_requests_per_second: config.max_requests_per_second,
        }
    }
}

/// Rate-limited client shared by every fetch of a run
pub struct HttpClient {
    client: Client,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("Invalid user agent")?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("Failed to create HTTP client")?;

        let quota = Quota::per_second(
            NonZeroU32::new(config.max_requests_per_second)
                .context("Rate limit must be greater than 0")?,
        );
        let rate_limiter = RateLimiter::direct(quota);

        Ok(Self { client, rate_limiter })
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        self.rate_limiter.until_ready().await;

        tracing::debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let text = response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;

        tracing::debug!("Successfully fetched: {} ({} chars)", url, text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_follows_scraper_settings() {
        let scraper = ScraperConfig {
            request_timeout_seconds: 5,
            max_requests_per_second: 2,
            ..ScraperConfig::default()
        };
        let config = HttpClientConfig::from(&scraper);
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.max_requests_per_second, 2);
        assert!(HttpClient::new(config).is_ok());
    }

    #[test]
    fn test_zero_rate_limit_is_rejected() {
        let config = HttpClientConfig {
            max_requests_per_second: 0,
            ..Default::default()
        };
        assert!(HttpClient::new(config).is_err());
    }
}

//! HTTP client for public iCalendar feeds.

use std::fmt;
use std::time::Duration;

use cal_core_rs::{CalendarEvent, DateRange};
use tracing::{debug, info};

use crate::error::Result;
use crate::ics::{events_in_range, parse_calendar_str};
use crate::retry::{
    execute_with_retry, RetryConfig, DEFAULT_INITIAL_BACKOFF_SECS, DEFAULT_MAX_BACKOFF_SECS,
    DEFAULT_MAX_RETRIES,
};
use crate::source::EventSource;
use crate::zone::Zone;

/// Default request timeout (30 seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client that downloads and parses an `.ics` feed.
#[derive(Clone)]
pub struct IcsFeedClient {
    url: String,
    http_client: reqwest::Client,
    retry: RetryConfig,
    zone: Zone,
}

impl IcsFeedClient {
    /// Creates a client for `url` with default retry and timeout settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, zone: Zone) -> Result<Self> {
        Self::builder(url).zone(zone).build()
    }

    /// Returns a builder for a client reading `url`.
    pub fn builder(url: impl Into<String>) -> IcsFeedClientBuilder {
        IcsFeedClientBuilder::new(url)
    }

    /// Returns the feed URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the timezone events are resolved into.
    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// Returns the maximum number of retries.
    pub fn max_retries(&self) -> u32 {
        self.retry.max_retries
    }

    /// Returns the initial backoff duration.
    pub fn initial_backoff(&self) -> Duration {
        self.retry.initial_backoff
    }

    /// Returns the maximum backoff duration.
    pub fn max_backoff(&self) -> Duration {
        self.retry.max_backoff
    }

    /// Downloads the raw feed body.
    ///
    /// 429 and 5xx responses are retried with exponential backoff.
    pub async fn fetch_text(&self) -> Result<String> {
        debug!(url = %self.url, "downloading calendar feed");
        let response =
            execute_with_retry(&self.retry, || self.http_client.get(&self.url).send()).await?;
        Ok(response.text().await?)
    }

    /// Downloads and parses every event in the feed.
    pub async fn fetch_all(&self) -> Result<Vec<CalendarEvent>> {
        let body = self.fetch_text().await?;
        parse_calendar_str(&body, self.zone)
    }
}

impl EventSource for IcsFeedClient {
    async fn fetch(&self, range: &DateRange) -> Result<Vec<CalendarEvent>> {
        let events = self.fetch_all().await?;
        let total = events.len();
        let selected = events_in_range(events, range);
        info!(total, selected = selected.len(), "parsed calendar feed");
        Ok(selected)
    }
}

impl fmt::Debug for IcsFeedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IcsFeedClient")
            .field("url", &redact_url(&self.url))
            .field("retry", &self.retry)
            .field("zone", &self.zone)
            .finish()
    }
}

/// Keeps the scheme and host of a URL and hides the rest.
pub(crate) fn redact_url(url: &str) -> String {
    match reqwest::Url::parse(url) {
        Ok(parsed) => format!(
            "{}://{}/[REDACTED]",
            parsed.scheme(),
            parsed.host_str().unwrap_or_default()
        ),
        Err(_) => "[REDACTED]".to_string(),
    }
}

/// Builder for [`IcsFeedClient`].
#[derive(Debug, Clone)]
pub struct IcsFeedClientBuilder {
    url: String,
    zone: Zone,
    retry: RetryConfig,
    request_timeout: Duration,
}

impl IcsFeedClientBuilder {
    /// Creates a builder with default settings.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            zone: Zone::default(),
            retry: RetryConfig {
                max_retries: DEFAULT_MAX_RETRIES,
                initial_backoff: Duration::from_secs(DEFAULT_INITIAL_BACKOFF_SECS),
                max_backoff: Duration::from_secs(DEFAULT_MAX_BACKOFF_SECS),
            },
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Sets the timezone events are resolved into.
    pub fn zone(mut self, zone: Zone) -> Self {
        self.zone = zone;
        self
    }

    /// Sets the maximum number of retries.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.retry.max_retries = max_retries;
        self
    }

    /// Sets the initial backoff duration.
    pub fn initial_backoff(mut self, backoff: Duration) -> Self {
        self.retry.initial_backoff = backoff;
        self
    }

    /// Sets the maximum backoff duration.
    pub fn max_backoff(mut self, backoff: Duration) -> Self {
        self.retry.max_backoff = backoff;
        self
    }

    /// Sets the request timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn build(self) -> Result<IcsFeedClient> {
        let http_client = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()?;

        Ok(IcsFeedClient {
            url: self.url,
            http_client,
            retry: self.retry,
            zone: self.zone,
        })
    }
}

//! Google Calendar API v3 event source.
//!
//! Events are listed with `singleEvents=true` and `orderBy=startTime`, so
//! recurring events arrive expanded into instances. Pages are followed until
//! the response has no `nextPageToken`.

use std::fmt;
use std::time::Duration;

use cal_core_rs::filter::{extract_hashtags, parse_datetime_token, ParsedDateTime};
use cal_core_rs::{CalendarEvent, DateRange};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use serde::Deserialize;
use tracing::{debug, info};

use crate::client::DEFAULT_TIMEOUT_SECS;
use crate::error::{FeedError, Result};
use crate::ics::DEFAULT_SUMMARY;
use crate::retry::{execute_with_retry, RetryConfig};
use crate::source::EventSource;
use crate::zone::Zone;

/// Base URL for the Google Calendar API v3.
const BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// One page of `events.list`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsPage {
    #[serde(default)]
    pub items: Vec<GoogleEvent>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// An event resource as returned by the API. Unused fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoogleEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start: Option<EventTime>,
    #[serde(default)]
    pub end: Option<EventTime>,
}

/// Start or end of an event: `dateTime` for timed events, `date` for all-day ones.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    #[serde(default)]
    pub date_time: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl EventTime {
    /// Resolves this value. `dateTime` keeps its offset; naive values and
    /// `date` values are placed in `zone`.
    pub fn resolve(&self, zone: Zone) -> Option<DateTime<FixedOffset>> {
        if let Some(value) = self.date_time.as_deref() {
            return parse_api_datetime(value, zone);
        }
        let date = NaiveDate::parse_from_str(self.date.as_deref()?.trim(), "%Y-%m-%d").ok()?;
        Some(zone.localize(date.and_time(NaiveTime::MIN)))
    }
}

fn parse_api_datetime(value: &str, zone: Zone) -> Option<DateTime<FixedOffset>> {
    match parse_datetime_token(value)? {
        ParsedDateTime::Aware(dt) => Some(dt),
        ParsedDateTime::Naive(naive) => Some(zone.localize(naive)),
    }
}

impl GoogleEvent {
    /// Converts the API resource into a [`CalendarEvent`].
    ///
    /// Returns `None` when the event has no usable start. A missing end
    /// defaults to one hour after the start.
    pub fn into_event(self, zone: Zone) -> Option<CalendarEvent> {
        let start = self.start.as_ref()?.resolve(zone)?;
        let end = self
            .end
            .as_ref()
            .and_then(|end| end.resolve(zone))
            .unwrap_or_else(|| start + chrono::Duration::hours(1));
        let hashtags = extract_hashtags(self.description.as_deref());

        Some(CalendarEvent {
            summary: self.summary.unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
            start,
            end,
            description: self.description,
            location: self.location,
            uid: self.id,
            hashtags,
        })
    }
}

/// Reads events from a Google calendar with a bearer access token.
#[derive(Clone)]
pub struct GoogleCalendarSource {
    calendar_id: String,
    token: String,
    http_client: reqwest::Client,
    base_url: String,
    retry: RetryConfig,
    zone: Zone,
}

impl GoogleCalendarSource {
    /// Creates a source for `calendar_id` (for example `primary`).
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::MissingToken`] if `token` is empty, or an error if
    /// the HTTP client cannot be built.
    pub fn new(calendar_id: impl Into<String>, token: impl Into<String>, zone: Zone) -> Result<Self> {
        Self::with_base_url(calendar_id, token, zone, BASE_URL)
    }

    /// Creates a source that talks to `base_url` instead of the public API.
    pub fn with_base_url(
        calendar_id: impl Into<String>,
        token: impl Into<String>,
        zone: Zone,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let calendar_id = calendar_id.into();
        let token = token.into();
        if token.trim().is_empty() {
            return Err(FeedError::MissingToken { calendar_id });
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            calendar_id,
            token,
            http_client,
            base_url: base_url.into(),
            retry: RetryConfig::default(),
            zone,
        })
    }

    /// Overrides the retry settings.
    pub fn retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the calendar ID.
    pub fn calendar_id(&self) -> &str {
        &self.calendar_id
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn events_url(&self) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| FeedError::invalid_url(&self.base_url, e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| FeedError::invalid_url(&self.base_url, "cannot be a base URL"))?
            .pop_if_empty()
            .extend(["calendars", self.calendar_id.as_str(), "events"]);
        Ok(url)
    }

    /// Fetches one page of events.
    async fn fetch_page(&self, range: &DateRange, page_token: Option<&str>) -> Result<EventsPage> {
        let url = self.events_url()?;
        let time_min = range.start.to_rfc3339();
        let time_max = range.end.to_rfc3339();

        let mut query: Vec<(&str, &str)> = vec![
            ("timeMin", time_min.as_str()),
            ("timeMax", time_max.as_str()),
            ("singleEvents", "true"),
            ("orderBy", "startTime"),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let response = execute_with_retry(&self.retry, || {
            self.http_client
                .get(url.clone())
                .bearer_auth(&self.token)
                .query(&query)
                .send()
        })
        .await?;

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl EventSource for GoogleCalendarSource {
    async fn fetch(&self, range: &DateRange) -> Result<Vec<CalendarEvent>> {
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0u32;

        loop {
            let page = self.fetch_page(range, page_token.as_deref()).await?;
            pages += 1;
            debug!(page = pages, items = page.items.len(), "fetched events page");

            events.extend(page.items.into_iter().filter_map(|item| item.into_event(self.zone)));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        info!(
            calendar = %self.calendar_id,
            pages,
            events = events.len(),
            "fetched Google calendar"
        );
        Ok(events)
    }
}

impl fmt::Debug for GoogleCalendarSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleCalendarSource")
            .field("calendar_id", &self.calendar_id)
            .field("token", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("zone", &self.zone)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    const AMS: Zone = Zone::Named(chrono_tz::Europe::Amsterdam);

    #[test]
    fn test_empty_token_is_rejected() {
        let err = GoogleCalendarSource::new("primary", "  ", Zone::Local).unwrap_err();
        assert!(matches!(err, FeedError::MissingToken { ref calendar_id } if calendar_id == "primary"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let source = GoogleCalendarSource::new("primary", "ya29.secret", Zone::Local).unwrap();
        let debug_str = format!("{:?}", source);
        assert!(!debug_str.contains("ya29.secret"));
        assert!(debug_str.contains("primary"));
    }

    #[test]
    fn test_events_url_encodes_calendar_id() {
        let source = GoogleCalendarSource::with_base_url(
            "team#1@group.calendar.google.com",
            "t",
            AMS,
            "http://localhost:1234/v3/",
        )
        .unwrap();
        let url = source.events_url().unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:1234/v3/calendars/team%231@group.calendar.google.com/events"
        );
    }

    #[test]
    fn test_into_event_timed() {
        let item: GoogleEvent = serde_json::from_value(serde_json::json!({
            "id": "evt1",
            "summary": "Review",
            "description": "Sprint #review #Work",
            "start": {"dateTime": "2026-02-02T10:00:00-05:00"},
            "end": {"dateTime": "2026-02-02T11:30:00-05:00"}
        }))
        .unwrap();

        let event = item.into_event(AMS).unwrap();
        assert_eq!(event.uid.as_deref(), Some("evt1"));
        assert_eq!(event.start.hour(), 10);
        assert_eq!(event.start.offset().local_minus_utc(), -5 * 3600);
        assert_eq!(event.duration_hours(), 1.5);
        assert_eq!(event.hashtags, vec!["#review", "#Work"]);
    }

    #[test]
    fn test_into_event_all_day() {
        let item: GoogleEvent = serde_json::from_value(serde_json::json!({
            "start": {"date": "2026-02-16"},
            "end": {"date": "2026-02-17"}
        }))
        .unwrap();

        let event = item.into_event(AMS).unwrap();
        assert_eq!(event.summary, DEFAULT_SUMMARY);
        assert_eq!(event.start.hour(), 0);
        assert_eq!(event.duration_hours(), 24.0);
    }

    #[test]
    fn test_into_event_without_start_is_skipped() {
        let item: GoogleEvent = serde_json::from_value(serde_json::json!({
            "summary": "Cancelled instance",
            "end": {"dateTime": "2026-02-02T11:00:00Z"}
        }))
        .unwrap();
        assert!(item.into_event(AMS).is_none());
    }

    #[test]
    fn test_into_event_without_end_lasts_one_hour() {
        let item: GoogleEvent = serde_json::from_value(serde_json::json!({
            "start": {"dateTime": "2026-02-02T23:30:00+01:00"}
        }))
        .unwrap();
        let event = item.into_event(AMS).unwrap();
        assert_eq!(event.duration_hours(), 1.0);
        assert_eq!(event.end.hour(), 0);
    }
}

//! The [`EventSource`] trait and source selection.

use std::path::PathBuf;

use cal_core_rs::{CalendarEvent, DateRange};
use tracing::debug;

use crate::client::IcsFeedClient;
use crate::error::{FeedError, Result};
use crate::google::GoogleCalendarSource;
use crate::local::LocalIcsSource;
use crate::zone::Zone;

/// Anything that can list calendar events for a date range.
#[allow(async_fn_in_trait)]
pub trait EventSource {
    /// Returns the events overlapping `range`, sorted by start time.
    async fn fetch(&self, range: &DateRange) -> Result<Vec<CalendarEvent>>;
}

/// One of the supported event sources.
#[derive(Debug, Clone)]
pub enum CalendarSource {
    /// A public `.ics` feed over HTTP(S).
    Feed(IcsFeedClient),
    /// A Google calendar read through the API.
    Google(GoogleCalendarSource),
    /// A local `.ics` file.
    Local(LocalIcsSource),
}

impl CalendarSource {
    /// Creates a source for a local file. See [`LocalIcsSource::new`].
    pub fn local(path: impl Into<PathBuf>, zone: Zone) -> Result<Self> {
        LocalIcsSource::new(path, zone).map(CalendarSource::Local)
    }

    /// Short name of the source kind, for log messages.
    pub fn kind(&self) -> &'static str {
        match self {
            CalendarSource::Feed(_) => "ical feed",
            CalendarSource::Google(_) => "google calendar",
            CalendarSource::Local(_) => "local file",
        }
    }
}

impl EventSource for CalendarSource {
    async fn fetch(&self, range: &DateRange) -> Result<Vec<CalendarEvent>> {
        match self {
            CalendarSource::Feed(source) => source.fetch(range).await,
            CalendarSource::Google(source) => source.fetch(range).await,
            CalendarSource::Local(source) => source.fetch(range).await,
        }
    }
}

/// Returns true if `calendar` looks like an iCal feed URL: `http(s)://` and
/// containing `.ics` or `ical` (any case).
pub fn is_ics_url(calendar: &str) -> bool {
    let lower = calendar.trim().to_ascii_lowercase();
    let is_http = lower.starts_with("http://") || lower.starts_with("https://");
    is_http && (lower.contains(".ics") || lower.contains("ical"))
}

/// Picks the source for a `--calendar` value.
///
/// iCal feed URLs get an [`IcsFeedClient`]. Anything else is treated as a
/// Google Calendar ID and needs an access token.
///
/// # Errors
///
/// Returns [`FeedError::MissingToken`] for a calendar ID without a token.
pub fn source_for(calendar: &str, token: Option<&str>, zone: Zone) -> Result<CalendarSource> {
    let calendar = calendar.trim();

    if is_ics_url(calendar) {
        debug!("using iCal feed source");
        return IcsFeedClient::new(calendar, zone).map(CalendarSource::Feed);
    }

    let token = token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| FeedError::MissingToken {
            calendar_id: calendar.to_string(),
        })?;
    debug!(calendar_id = calendar, "using Google Calendar API source");
    GoogleCalendarSource::new(calendar, token, zone).map(CalendarSource::Google)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ics_url() {
        assert!(is_ics_url("https://calendar.google.com/calendar/ical/x/basic.ics"));
        assert!(is_ics_url("http://example.com/feed.ICS"));
        assert!(is_ics_url("https://example.com/webcal/iCal?id=1"));
        assert!(!is_ics_url("primary"));
        assert!(!is_ics_url("user@example.com"));
        assert!(!is_ics_url("https://example.com/calendar"));
        assert!(!is_ics_url("webcal://example.com/feed.ics"));
    }

    #[test]
    fn test_source_for_feed_url() {
        let source = source_for("https://example.com/feed.ics", None, Zone::Local).unwrap();
        assert!(matches!(source, CalendarSource::Feed(_)));
        assert_eq!(source.kind(), "ical feed");
    }

    #[test]
    fn test_source_for_calendar_id_with_token() {
        let source = source_for("primary", Some("ya29.token"), Zone::Local).unwrap();
        match source {
            CalendarSource::Google(google) => assert_eq!(google.calendar_id(), "primary"),
            other => panic!("Expected Google source, got {:?}", other),
        }
    }

    #[test]
    fn test_source_for_calendar_id_without_token() {
        let err = source_for("primary", None, Zone::Local).unwrap_err();
        assert!(matches!(err, FeedError::MissingToken { .. }));

        let err = source_for("primary", Some("   "), Zone::Local).unwrap_err();
        assert!(matches!(err, FeedError::MissingToken { .. }));
    }

    #[test]
    fn test_local_source_missing_file() {
        let err = CalendarSource::local("/nonexistent/cal.ics", Zone::Local).unwrap_err();
        assert!(matches!(err, FeedError::NotFound { .. }));
    }
}

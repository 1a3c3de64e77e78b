//! iCalendar (`.ics`) parsing into [`CalendarEvent`]s.
//!
//! Only `VEVENT` components are read. For each event:
//!
//! - `SUMMARY` (defaults to `No Title`), `DESCRIPTION`, `LOCATION` and `UID`
//!   are copied with text escapes removed
//! - `DTSTART` is required; events without a usable start are skipped
//! - `DTEND` defaults to one hour after the start
//! - hashtags are extracted from the description
//!
//! Date values (`VALUE=DATE`) start at midnight. UTC values and values with a
//! `TZID` are converted into the target [`Zone`]; floating values are placed
//! in it as-is.

use std::io::BufRead;

use cal_core_rs::filter::{extract_hashtags, localize};
use cal_core_rs::{CalendarEvent, DateRange};
use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use chrono_tz::Tz;
use ical::parser::ical::component::IcalEvent;
use ical::property::Property;
use tracing::{debug, trace};

use crate::error::{FeedError, Result};
use crate::zone::Zone;

/// Summary used for events without a `SUMMARY` property.
pub const DEFAULT_SUMMARY: &str = "No Title";

const ICS_DATETIME_FORMATS: &[&str] = &["%Y%m%dT%H%M%S", "%Y%m%dT%H%M"];

/// Parses every `VEVENT` in an iCalendar stream.
///
/// Events are returned sorted by start time. Malformed events are skipped.
///
/// # Errors
///
/// Returns [`FeedError::Parse`] if the stream is not valid iCalendar or
/// holds no `VCALENDAR` at all.
pub fn parse_calendar<R: BufRead>(reader: R, zone: Zone) -> Result<Vec<CalendarEvent>> {
    let mut events = Vec::new();
    let mut skipped = 0usize;
    let mut calendars = 0usize;

    for calendar in ical::IcalParser::new(reader) {
        let calendar = calendar.map_err(|e| FeedError::parse(e.to_string()))?;
        calendars += 1;

        for component in &calendar.events {
            match parse_event(component, zone) {
                Some(event) => events.push(event),
                None => skipped += 1,
            }
        }
    }

    if calendars == 0 {
        return Err(FeedError::parse("no VCALENDAR found"));
    }
    if skipped > 0 {
        debug!(skipped, "skipped events without a usable DTSTART");
    }

    events.sort_by_key(|e| e.start);
    Ok(events)
}

/// Parses iCalendar text. See [`parse_calendar`].
///
/// Blank text is an empty calendar.
pub fn parse_calendar_str(text: &str, zone: Zone) -> Result<Vec<CalendarEvent>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    parse_calendar(text.as_bytes(), zone)
}

/// Keeps the events overlapping `range`, sorted by start time.
pub fn events_in_range(events: Vec<CalendarEvent>, range: &DateRange) -> Vec<CalendarEvent> {
    let mut selected: Vec<CalendarEvent> =
        events.into_iter().filter(|e| range.overlaps(e)).collect();
    selected.sort_by_key(|e| e.start);
    selected
}

fn parse_event(component: &IcalEvent, zone: Zone) -> Option<CalendarEvent> {
    let mut summary = None;
    let mut description = None;
    let mut location = None;
    let mut uid = None;
    let mut start = None;
    let mut end = None;

    for property in &component.properties {
        match property.name.to_ascii_uppercase().as_str() {
            "SUMMARY" => summary = text_value(property),
            "DESCRIPTION" => description = text_value(property),
            "LOCATION" => location = text_value(property),
            "UID" => uid = property.value.clone(),
            "DTSTART" => start = datetime_value(property, zone),
            "DTEND" => end = datetime_value(property, zone),
            _ => {}
        }
    }

    let Some(start) = start else {
        trace!(uid = ?uid, "event has no parsable DTSTART");
        return None;
    };
    let end = end.unwrap_or_else(|| start + Duration::hours(1));

    let hashtags = extract_hashtags(description.as_deref());
    Some(CalendarEvent {
        summary: summary.unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
        start,
        end,
        description,
        location,
        uid,
        hashtags,
    })
}

fn text_value(property: &Property) -> Option<String> {
    property.value.as_deref().map(unescape_text)
}

fn param<'a>(property: &'a Property, name: &str) -> Option<&'a str> {
    property
        .params
        .as_ref()?
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .and_then(|(_, values)| values.first())
        .map(String::as_str)
}

fn datetime_value(property: &Property, zone: Zone) -> Option<DateTime<FixedOffset>> {
    let value = property.value.as_deref()?;
    let is_date = param(property, "VALUE").is_some_and(|v| v.eq_ignore_ascii_case("DATE"));
    if is_date {
        return NaiveDate::parse_from_str(value.trim(), "%Y%m%d")
            .ok()
            .map(|date| zone.localize(date.and_time(NaiveTime::MIN)));
    }
    parse_ics_datetime(value, param(property, "TZID"), zone)
}

/// Parses an iCalendar `DATE` or `DATE-TIME` value.
///
/// - `20260201` - midnight in `zone`
/// - `20260201T090000Z` - UTC, converted into `zone`
/// - `20260201T090000` with `tzid` - resolved in that IANA zone, converted into `zone`
/// - `20260201T090000` - floating, placed in `zone`
///
/// Unknown `TZID`s are treated as floating.
pub fn parse_ics_datetime(
    value: &str,
    tzid: Option<&str>,
    zone: Zone,
) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();

    if value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit()) {
        let date = NaiveDate::parse_from_str(value, "%Y%m%d").ok()?;
        return Some(zone.localize(date.and_time(NaiveTime::MIN)));
    }

    if let Some(utc) = value.strip_suffix('Z').or_else(|| value.strip_suffix('z')) {
        let naive = parse_naive(utc)?;
        return Some(zone.convert(&Utc.from_utc_datetime(&naive)));
    }

    let naive = parse_naive(value)?;
    match tzid.map(|id| id.trim().trim_matches('"')) {
        Some(id) => match id.parse::<Tz>() {
            Ok(tz) => Some(zone.convert(&localize(&tz, naive))),
            Err(_) => {
                debug!(tzid = id, "unknown TZID, treating time as floating");
                Some(zone.localize(naive))
            }
        },
        None => Some(zone.localize(naive)),
    }
}

fn parse_naive(value: &str) -> Option<NaiveDateTime> {
    ICS_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// Removes iCalendar text escapes (`\n`, `\N`, `\,`, `\;`, `\\`).
///
/// Unknown escapes are kept verbatim.
pub fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(',') => out.push(','),
            Some(';') => out.push(';'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

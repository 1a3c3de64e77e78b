//! Date-range parsing for the `--date` option.
//!
//! # Supported forms
//!
//! - `today` - the current day, `00:00:00` to `23:59:59`
//! - `YYYY-MM-DD` - a single day, `00:00:00` to `23:59:59`
//! - `YYYY-MM-DD:YYYY-MM-DD` - an inclusive range of days
//! - `YYYY-MM-DDTHH:MM:YYYY-MM-DDTHH:MM` - a datetime range
//! - `YYYY-MM-DDTHH:MM` - from that time to the end of the same day
//! - any single date or datetime understood by [`parse_datetime_token`]
//!
//! Naive values are placed in the parser's timezone. Explicit offsets in the
//! input are kept as written.

use std::fmt;
use std::sync::OnceLock;

use chrono::{
    DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use regex::Regex;
use tracing::trace;

use super::error::{DateRangeError, DateRangeResult};
use crate::event::CalendarEvent;

/// Naive datetime layouts, tried in order.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Datetime layouts carrying a numeric UTC offset.
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%d %H:%M%z",
];

/// Date-only layouts.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y%m%d"];

fn range_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{4}-\d{2}-\d{2}(?:T\d{2}:\d{2})?):(\d{4}-\d{2}-\d{2}(?:T\d{2}:\d{2})?)$")
            .expect("range pattern is valid")
    })
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

/// A datetime token, before a timezone has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedDateTime {
    /// The token carried its own UTC offset.
    Aware(DateTime<FixedOffset>),
    /// The token had no offset information.
    Naive(NaiveDateTime),
}

/// Parses a single date or datetime token.
///
/// Accepts RFC 3339, ISO-8601 datetimes with `T` or space separators (with or
/// without seconds, fractions and offsets, `Z` meaning UTC) and the date
/// layouts `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYY.MM.DD` and `YYYYMMDD`. Date-only tokens become
/// midnight. Returns `None` for anything else.
pub fn parse_datetime_token(token: &str) -> Option<ParsedDateTime> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(token) {
        return Some(ParsedDateTime::Aware(dt));
    }

    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(token, format) {
            return Some(ParsedDateTime::Aware(dt));
        }
    }

    if let Some(utc) = token.strip_suffix('Z').or_else(|| token.strip_suffix('z')) {
        if let Some(naive) = parse_naive_datetime(utc) {
            return Some(ParsedDateTime::Aware(
                Utc.from_utc_datetime(&naive).fixed_offset(),
            ));
        }
    }

    if let Some(naive) = parse_naive_datetime(token) {
        return Some(ParsedDateTime::Naive(naive));
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(token, format).ok())
        .map(|date| ParsedDateTime::Naive(date.and_time(NaiveTime::MIN)))
}

fn parse_naive_datetime(token: &str) -> Option<NaiveDateTime> {
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(token, format).ok())
}

/// Attaches a fixed offset to a wall-clock time without shifting it.
fn with_offset(naive: NaiveDateTime, offset: FixedOffset) -> DateTime<FixedOffset> {
    let utc = naive - chrono::Duration::seconds(i64::from(offset.local_minus_utc()));
    DateTime::from_naive_utc_and_offset(utc, offset)
}

/// Places a wall-clock time in `tz`.
///
/// Ambiguous times (DST fall-back) take the earlier instant. Times that do not
/// exist (DST spring-forward) keep their wall-clock value with the offset in
/// effect at that UTC instant.
pub fn localize<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<FixedOffset> {
    match tz.from_local_datetime(&naive).earliest() {
        Some(dt) => dt.fixed_offset(),
        None => with_offset(naive, tz.offset_from_utc_datetime(&naive).fix()),
    }
}

/// An inclusive `[start, end]` time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First instant of the range.
    pub start: DateTime<FixedOffset>,
    /// Last instant of the range.
    pub end: DateTime<FixedOffset>,
}

impl DateRange {
    /// Creates a range. Bounds are not reordered or validated.
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Self { start, end }
    }

    /// Returns true if the event's span intersects this range.
    ///
    /// Both ends are inclusive: `event.start <= end && event.end >= start`.
    /// An inverted range matches nothing.
    pub fn overlaps(&self, event: &CalendarEvent) -> bool {
        event.start <= self.end && event.end >= self.start
    }

    /// Returns the bounds as a tuple.
    pub fn bounds(&self) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
        (self.start, self.end)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%Y-%m-%d %H:%M:%S%:z"),
            self.end.format("%Y-%m-%d %H:%M:%S%:z")
        )
    }
}

/// Parser for date-range strings in a given timezone.
///
/// The timezone and the current time are explicit so that results do not
/// depend on the machine running the code.
#[derive(Debug, Clone)]
pub struct DateRangeParser<Tz: TimeZone> {
    now: DateTime<Tz>,
}

impl DateRangeParser<Local> {
    /// Creates a parser for the system timezone at the current time.
    pub fn local() -> Self {
        Self::at(Local::now())
    }
}

impl<Tz: TimeZone> DateRangeParser<Tz> {
    /// Creates a parser whose timezone and "today" come from `now`.
    pub fn at(now: DateTime<Tz>) -> Self {
        Self { now }
    }

    /// Creates a parser for `tz` at the current time.
    pub fn now_in(tz: &Tz) -> Self {
        Self::at(Utc::now().with_timezone(tz))
    }

    /// Returns the timezone naive values are placed in.
    pub fn timezone(&self) -> Tz {
        self.now.timezone()
    }

    /// Parses a date-range string.
    ///
    /// # Errors
    ///
    /// Returns [`DateRangeError::InvalidDateFormat`] carrying the token that
    /// could not be parsed.
    pub fn parse(&self, input: &str) -> DateRangeResult<DateRange> {
        let input = input.trim();

        if input.eq_ignore_ascii_case("today") {
            let today = self.now.date_naive();
            let tz = self.timezone();
            return Ok(DateRange::new(
                localize(&tz, today.and_time(NaiveTime::MIN)),
                localize(&tz, today.and_time(end_of_day())),
            ));
        }

        if input.contains(':') {
            if let Some(caps) = range_regex().captures(input) {
                trace!(start = &caps[1], end = &caps[2], "parsed explicit date range");
                let start = self.parse_single(&caps[1], true)?;
                let end = self.parse_single(&caps[2], false)?;
                return Ok(DateRange::new(start, end));
            }
        }

        // A single value runs to the end of its own day, in its own offset.
        let start = self.parse_single(input, true)?;
        let end = with_offset(start.date_naive().and_time(end_of_day()), *start.offset());
        Ok(DateRange::new(start, end))
    }

    /// Parses one date or datetime token.
    ///
    /// When the token has no time-of-day (no `T` and no space), the time is
    /// set to `00:00:00` for a range start and `23:59:59` for a range end.
    pub fn parse_single(&self, token: &str, is_start: bool) -> DateRangeResult<DateTime<FixedOffset>> {
        let parsed =
            parse_datetime_token(token).ok_or_else(|| DateRangeError::invalid_date_format(token))?;

        let date_only = !token.contains('T') && !token.contains(' ');
        let time = if is_start { NaiveTime::MIN } else { end_of_day() };

        let dt = match parsed {
            ParsedDateTime::Aware(dt) if date_only => {
                with_offset(dt.date_naive().and_time(time), *dt.offset())
            }
            ParsedDateTime::Aware(dt) => dt,
            ParsedDateTime::Naive(naive) if date_only => {
                localize(&self.timezone(), naive.date().and_time(time))
            }
            ParsedDateTime::Naive(naive) => localize(&self.timezone(), naive),
        };

        Ok(dt)
    }
}

/// Parses a date-range string in the system timezone.
///
/// See [`DateRangeParser::parse`].
///
/// # Example
///
/// ```
/// use cal_core_rs::filter::parse_date_range;
///
/// let range = parse_date_range("2026-02-01:2026-02-28").unwrap();
/// assert_eq!(range.start.format("%d").to_string(), "01");
/// assert_eq!(range.end.format("%d %H:%M:%S").to_string(), "28 23:59:59");
/// ```
pub fn parse_date_range(input: &str) -> DateRangeResult<DateRange> {
    DateRangeParser::local().parse(input)
}

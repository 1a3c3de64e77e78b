//! The timezone events are resolved into.

use std::fmt;
use std::str::FromStr;

use cal_core_rs::filter::{localize, DateRangeParser, DateRangeResult};
use cal_core_rs::DateRange;
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// Either the system timezone or a named IANA zone.
///
/// Floating times (no offset, no `TZID`) are placed in this zone and
/// UTC or `TZID` times are converted into it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Zone {
    /// The system timezone.
    #[default]
    Local,
    /// A named IANA timezone such as `Europe/Amsterdam`.
    Named(Tz),
}

impl Zone {
    /// Places a wall-clock time in this zone.
    pub fn localize(&self, naive: NaiveDateTime) -> DateTime<FixedOffset> {
        match self {
            Zone::Local => localize(&Local, naive),
            Zone::Named(tz) => localize(tz, naive),
        }
    }

    /// Converts an instant into this zone.
    pub fn convert<T: TimeZone>(&self, dt: &DateTime<T>) -> DateTime<FixedOffset> {
        match self {
            Zone::Local => dt.with_timezone(&Local).fixed_offset(),
            Zone::Named(tz) => dt.with_timezone(tz).fixed_offset(),
        }
    }

    /// Parses a `--date` expression with "today" taken in this zone.
    pub fn parse_date_range(&self, input: &str) -> DateRangeResult<DateRange> {
        match self {
            Zone::Local => DateRangeParser::local().parse(input),
            Zone::Named(tz) => DateRangeParser::now_in(tz).parse(input),
        }
    }
}

impl FromStr for Zone {
    type Err = String;

    /// Parses `local` or an IANA timezone name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("local") {
            return Ok(Zone::Local);
        }
        s.parse::<Tz>()
            .map(Zone::Named)
            .map_err(|_| format!("Unknown timezone: {s}"))
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Local => write!(f, "local"),
            Zone::Named(tz) => write!(f, "{}", tz.name()),
        }
    }
}

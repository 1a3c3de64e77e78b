//! Date-range parsing and hashtag filtering for calendar events.
//!
//! # Date ranges
//!
//! - `today` - the current day
//! - `2026-02-15` - a single day
//! - `2026-02-01:2026-02-28` - a range of days
//! - `2026-02-01T09:00:2026-02-01T17:00` - a datetime range
//!
//! # Hashtag terms
//!
//! - Commas inside one term - AND (all tags must be present)
//! - Several terms - OR (any term may match)
//! - Matching is case-insensitive and the leading `#` is optional
//!
//! # Example
//!
//! ```
//! use cal_core_rs::filter::{filter_events, parse_hashtag_groups};
//!
//! let groups = parse_hashtag_groups(&["zzp, Work", "#meeting"]);
//! assert_eq!(groups.len(), 2);
//! assert!(groups[0].contains("#zzp") && groups[0].contains("#work"));
//!
//! let events: Vec<cal_core_rs::CalendarEvent> = vec![];
//! let matched = filter_events(&events, &["#billable"]);
//! assert!(matched.is_empty());
//! ```

mod date_range;
mod error;
mod evaluator;
mod hashtag;

pub use date_range::{
    localize, parse_date_range, parse_datetime_token, DateRange, DateRangeParser, ParsedDateTime,
};
pub use error::{DateRangeError, DateRangeResult};
pub use evaluator::{filter_by_date_range, filter_events, HashtagFilter};
pub use hashtag::{
    extract_hashtags, normalize_hashtag, parse_hashtag_groups, HashtagGroup, HashtagQuery,
};

#[cfg(test)]
mod tests;

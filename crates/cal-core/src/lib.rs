//! Calendar event model and filtering.
//!
//! This crate holds the [`CalendarEvent`] record shared by event sources and
//! exporters, plus the [`filter`] module: date-range parsing and the hashtag
//! AND/OR filter.

pub mod event;
pub mod filter;

pub use event::{round_hours, total_hours, CalendarEvent, EventRecord};
pub use filter::{DateRange, DateRangeError, DateRangeParser, HashtagFilter};

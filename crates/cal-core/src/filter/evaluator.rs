//! Filter evaluation against calendar events.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeZone};

use super::hashtag::{extract_hashtags, HashtagQuery};
use crate::event::CalendarEvent;

/// A compiled hashtag filter.
///
/// Events are matched against the hashtags found in their description at
/// evaluation time, not against their stored `hashtags` field.
///
/// # Example
///
/// ```
/// use cal_core_rs::filter::HashtagFilter;
///
/// let filter = HashtagFilter::new(&["#zzp, #work", "#meeting"]);
/// assert_eq!(filter.query().groups().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HashtagFilter {
    query: HashtagQuery,
}

impl HashtagFilter {
    /// Creates a filter from raw search terms.
    pub fn new<S: AsRef<str>>(terms: &[S]) -> Self {
        Self {
            query: HashtagQuery::parse(terms),
        }
    }

    /// Returns the parsed query.
    pub fn query(&self) -> &HashtagQuery {
        &self.query
    }

    /// Returns true if the filter has no terms.
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    /// Returns true if the event's description satisfies any AND-group.
    ///
    /// An empty filter matches every event.
    pub fn matches(&self, event: &CalendarEvent) -> bool {
        if self.is_empty() {
            return true;
        }
        let tags = extract_hashtags(event.description.as_deref());
        self.query.matches_tags(&lowercase_set(&tags))
    }

    /// Returns the matching events, in input order.
    ///
    /// Each returned event has `hashtags` replaced by the tags freshly
    /// extracted from its description (original case). The input is not
    /// modified. An empty filter returns the events unchanged.
    pub fn apply(&self, events: &[CalendarEvent]) -> Vec<CalendarEvent> {
        if self.is_empty() {
            return events.to_vec();
        }

        events
            .iter()
            .filter_map(|event| {
                let tags = extract_hashtags(event.description.as_deref());
                if !self.query.matches_tags(&lowercase_set(&tags)) {
                    return None;
                }
                let mut matched = event.clone();
                matched.hashtags = tags;
                Some(matched)
            })
            .collect()
    }
}

fn lowercase_set(tags: &[String]) -> BTreeSet<String> {
    tags.iter().map(|t| t.to_lowercase()).collect()
}

/// Filters events by hashtag search terms.
///
/// Commas within a term mean AND, separate terms mean OR. With no terms the
/// events are returned unchanged.
pub fn filter_events<S: AsRef<str>>(events: &[CalendarEvent], terms: &[S]) -> Vec<CalendarEvent> {
    HashtagFilter::new(terms).apply(events)
}

/// Keeps events whose span overlaps `[start, end]` (both inclusive).
///
/// Order is preserved and events are not modified. If `start > end` nothing
/// matches.
pub fn filter_by_date_range<Tz: TimeZone>(
    events: &[CalendarEvent],
    start: &DateTime<Tz>,
    end: &DateTime<Tz>,
) -> Vec<CalendarEvent> {
    events
        .iter()
        .filter(|event| event.start <= *end && event.end >= *start)
        .cloned()
        .collect()
}

//! Tests for the filter module.

use super::*;
use crate::event::CalendarEvent;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeZone, Timelike};
use chrono_tz::Europe::Amsterdam;
use std::collections::BTreeSet;

fn set(tags: &[&str]) -> BTreeSet<String> {
    tags.iter().map(|t| t.to_string()).collect()
}

fn amsterdam(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
    Amsterdam
        .with_ymd_and_hms(y, m, d, h, min, 0)
        .unwrap()
        .fixed_offset()
}

/// Parser pinned to 2026-02-10 14:30 in Amsterdam (UTC+1 in winter).
fn parser() -> DateRangeParser<chrono_tz::Tz> {
    DateRangeParser::at(Amsterdam.with_ymd_and_hms(2026, 2, 10, 14, 30, 0).unwrap())
}

fn sample_events() -> Vec<CalendarEvent> {
    vec![
        CalendarEvent::new("Event 1", amsterdam(2026, 2, 1, 9, 0), amsterdam(2026, 2, 1, 10, 0))
            .with_description("Task with #billable #client"),
        CalendarEvent::new("Event 2", amsterdam(2026, 2, 1, 11, 0), amsterdam(2026, 2, 1, 12, 0))
            .with_description("Task with #zzp #hosintra #billable"),
        CalendarEvent::new("Event 3", amsterdam(2026, 2, 1, 14, 0), amsterdam(2026, 2, 1, 15, 0))
            .with_description("Task with #meeting"),
        CalendarEvent::new("Event 4", amsterdam(2026, 2, 1, 16, 0), amsterdam(2026, 2, 1, 17, 0))
            .with_description("No hashtags here"),
    ]
}

fn summaries(events: &[CalendarEvent]) -> Vec<&str> {
    events.iter().map(|e| e.summary.as_str()).collect()
}

// ==================== Hashtag Extraction Tests ====================

#[test]
fn test_extract_single_hashtag() {
    assert_eq!(extract_hashtags(Some("This is a #test description")), vec!["#test"]);
}

#[test]
fn test_extract_multiple_hashtags() {
    let result = extract_hashtags(Some("Meeting about #project and #client #billable"));
    assert_eq!(result, vec!["#project", "#client", "#billable"]);
}

#[test]
fn test_extract_no_hashtags() {
    assert!(extract_hashtags(Some("This has no hashtags")).is_empty());
}

#[test]
fn test_extract_from_none() {
    assert!(extract_hashtags(None).is_empty());
}

#[test]
fn test_extract_from_empty_string() {
    assert!(extract_hashtags(Some("")).is_empty());
}

#[test]
fn test_extract_preserves_case_and_duplicates() {
    let result = extract_hashtags(Some("#Work then #work again, #WORK"));
    assert_eq!(result, vec!["#Work", "#work", "#WORK"]);
}

#[test]
fn test_extract_stops_at_non_word_characters() {
    let result = extract_hashtags(Some("#zzp-work #a_b1, (#x) # lonely ##double"));
    assert_eq!(result, vec!["#zzp", "#a_b1", "#x", "#double"]);
}

#[test]
fn test_extract_unicode_word_characters() {
    let result = extract_hashtags(Some("Overleg #vergadering #café"));
    assert_eq!(result, vec!["#vergadering", "#café"]);
}

// ==================== Normalization Tests ====================

#[test]
fn test_normalize_with_hash() {
    assert_eq!(normalize_hashtag("#Test"), "#test");
}

#[test]
fn test_normalize_without_hash() {
    assert_eq!(normalize_hashtag("test"), "#test");
}

#[test]
fn test_normalize_with_whitespace() {
    assert_eq!(normalize_hashtag("  #test  "), "#test");
}

#[test]
fn test_normalize_empty_is_bare_hash() {
    assert_eq!(normalize_hashtag(""), "#");
    assert_eq!(normalize_hashtag("   "), "#");
}

// ==================== Group Parsing Tests ====================

#[test]
fn test_single_hashtag() {
    assert_eq!(parse_hashtag_groups(&["#billable"]), vec![set(&["#billable"])]);
}

#[test]
fn test_single_hashtag_mixed_case() {
    assert_eq!(parse_hashtag_groups(&["#Test"]), vec![set(&["#test"])]);
}

#[test]
fn test_multiple_or_groups() {
    assert_eq!(
        parse_hashtag_groups(&["#billable", "#meeting"]),
        vec![set(&["#billable"]), set(&["#meeting"])]
    );
}

#[test]
fn test_comma_separated_and_group() {
    assert_eq!(
        parse_hashtag_groups(&["#zzp, #hosintra"]),
        vec![set(&["#zzp", "#hosintra"])]
    );
}

#[test]
fn test_comma_group_without_hash_prefix() {
    assert_eq!(parse_hashtag_groups(&["zzp, Work"]), vec![set(&["#zzp", "#work"])]);
}

#[test]
fn test_combined_and_or() {
    assert_eq!(
        parse_hashtag_groups(&["#zzp, #work", "#meeting"]),
        vec![set(&["#zzp", "#work"]), set(&["#meeting"])]
    );
}

#[test]
fn test_duplicate_tags_in_group_collapse() {
    assert_eq!(parse_hashtag_groups(&["#a, #A, a"]), vec![set(&["#a"])]);
}

#[test]
fn test_trailing_comma_yields_degenerate_tag() {
    assert_eq!(parse_hashtag_groups(&["#a,"]), vec![set(&["#a", "#"])]);
}

#[test]
fn test_no_terms_no_groups() {
    let terms: [&str; 0] = [];
    assert!(parse_hashtag_groups(&terms).is_empty());
    assert!(HashtagQuery::parse(&terms).is_empty());
}

// ==================== Date Range Tests ====================

#[test]
fn test_parse_today() {
    let range = parser().parse("today").unwrap();
    let expected_date = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();

    assert_eq!(range.start.date_naive(), expected_date);
    assert_eq!((range.start.hour(), range.start.minute(), range.start.second()), (0, 0, 0));
    assert_eq!(range.end.date_naive(), expected_date);
    assert_eq!((range.end.hour(), range.end.minute(), range.end.second()), (23, 59, 59));
    assert_eq!(range.end.nanosecond(), 0);
}

#[test]
fn test_parse_today_case_insensitive_and_trimmed() {
    let p = parser();
    assert_eq!(p.parse("TODAY").unwrap(), p.parse("today").unwrap());
    assert_eq!(p.parse("  Today \n").unwrap(), p.parse("today").unwrap());
}

#[test]
fn test_parse_today_with_system_timezone() {
    let range = parse_date_range("today").unwrap();
    assert_eq!(range.start.hour(), 0);
    assert_eq!(range.start.minute(), 0);
    assert_eq!(range.end.hour(), 23);
    assert_eq!(range.end.minute(), 59);
    assert_eq!(range.start.date_naive(), range.end.date_naive());
}

#[test]
fn test_parse_single_date() {
    let range = parser().parse("2026-02-15").unwrap();

    assert_eq!(range.start, amsterdam(2026, 2, 15, 0, 0));
    assert_eq!(range.end, amsterdam(2026, 2, 15, 23, 59) + chrono::Duration::seconds(59));
    assert_eq!(range.start.offset().local_minus_utc(), 3600);
}

#[test]
fn test_parse_single_date_in_summer_time() {
    let range = parser().parse("2026-07-01").unwrap();
    assert_eq!(range.start.offset().local_minus_utc(), 7200);
    assert_eq!(range.start.hour(), 0);
    assert_eq!(range.end.hour(), 23);
}

#[test]
fn test_parse_date_range() {
    let range = parser().parse("2026-02-01:2026-02-28").unwrap();

    assert_eq!(range.start.day(), 1);
    assert_eq!(range.end.day(), 28);
    assert_eq!(range.start.month(), range.end.month());
    assert_eq!(range.start.year(), range.end.year());
    assert_eq!(range.start.hour(), 0);
    assert_eq!((range.end.hour(), range.end.minute(), range.end.second()), (23, 59, 59));
}

#[test]
fn test_parse_datetime_range_keeps_times() {
    let range = parser().parse("2026-02-01T09:00:2026-02-01T17:00").unwrap();

    assert_eq!(range.start, amsterdam(2026, 2, 1, 9, 0));
    assert_eq!(range.end, amsterdam(2026, 2, 1, 17, 0));
}

#[test]
fn test_parse_mixed_date_and_datetime_range() {
    let range = parser().parse("2026-02-01T09:00:2026-02-03").unwrap();

    assert_eq!(range.start, amsterdam(2026, 2, 1, 9, 0));
    assert_eq!(range.end.day(), 3);
    assert_eq!(range.end.hour(), 23);
}

#[test]
fn test_single_datetime_with_colon_is_not_a_range() {
    let range = parser().parse("2026-02-01T09:00").unwrap();

    assert_eq!(range.start, amsterdam(2026, 2, 1, 9, 0));
    assert_eq!(range.end, amsterdam(2026, 2, 1, 23, 59) + chrono::Duration::seconds(59));
}

#[test]
fn test_single_datetime_with_offset_ends_in_same_offset() {
    let range = parser().parse("2026-02-01T09:00:00-05:00").unwrap();

    assert_eq!(range.end.date_naive(), range.start.date_naive());
    assert_eq!((range.end.hour(), range.end.minute(), range.end.second()), (23, 59, 59));
    assert_eq!(range.end.offset().local_minus_utc(), -5 * 3600);
}

#[test]
fn test_single_datetime_with_space_keeps_time() {
    let range = parser().parse("2026-02-01 13:45").unwrap();
    assert_eq!(range.start, amsterdam(2026, 2, 1, 13, 45));
}

#[test]
fn test_explicit_offset_is_not_converted() {
    let range = parser().parse("2026-02-01T09:00:00-05:00").unwrap();

    assert_eq!(range.start.hour(), 9);
    assert_eq!(range.start.offset().local_minus_utc(), -5 * 3600);
}

#[test]
fn test_utc_suffix_is_kept_as_utc() {
    let range = parser().parse("2026-02-01T09:00:00Z").unwrap();
    assert_eq!(range.start.hour(), 9);
    assert_eq!(range.start.offset().local_minus_utc(), 0);
}

#[test]
fn test_alternative_date_layouts() {
    let p = parser();
    assert_eq!(p.parse("2026/02/15").unwrap(), p.parse("2026-02-15").unwrap());
    assert_eq!(p.parse("2026.02.15").unwrap(), p.parse("2026-02-15").unwrap());
}

#[test]
fn test_compact_date_layout() {
    let p = parser();
    let range = p.parse("20260215").unwrap();

    assert_eq!(range, p.parse("2026-02-15").unwrap());
    assert_eq!(range.start, amsterdam(2026, 2, 15, 0, 0));
}

#[test]
fn test_range_with_extra_colon_falls_back_and_fails() {
    let err = parser().parse("2026-02-01:2026-02-28:2026-03-01").unwrap_err();
    assert!(matches!(err, DateRangeError::InvalidDateFormat { .. }));
}

#[test]
fn test_invalid_date_raises_error() {
    let err = parser().parse("not-a-date").unwrap_err();
    assert_eq!(err, DateRangeError::invalid_date_format("not-a-date"));
    assert_eq!(err.input(), "not-a-date");
    assert!(err.to_string().contains("Invalid date format: not-a-date"));
}

#[test]
fn test_invalid_calendar_date_raises_error() {
    assert!(parser().parse("2026-02-30").is_err());
}

#[test]
fn test_invalid_range_token_reports_offending_token() {
    let err = parser().parse("2026-02-01:2026-13-01").unwrap_err();
    assert_eq!(err.input(), "2026-13-01");
}

#[test]
fn test_inverted_range_is_not_reordered() {
    let range = parser().parse("2026-02-28:2026-02-01").unwrap();
    assert!(range.start > range.end);
    assert!(!range.overlaps(&sample_events()[0]));
}

#[test]
fn test_localize_ambiguous_time_takes_earliest() {
    // 2026-10-25 02:30 occurs twice in Amsterdam.
    let naive = NaiveDate::from_ymd_opt(2026, 10, 25)
        .unwrap()
        .and_hms_opt(2, 30, 0)
        .unwrap();
    let dt = localize(&Amsterdam, naive);
    assert_eq!(dt.offset().local_minus_utc(), 7200);
    assert_eq!(dt.hour(), 2);
}

#[test]
fn test_localize_nonexistent_time_keeps_wall_clock() {
    // 2026-03-29 02:30 does not exist in Amsterdam.
    let naive = NaiveDate::from_ymd_opt(2026, 3, 29)
        .unwrap()
        .and_hms_opt(2, 30, 0)
        .unwrap();
    let dt = localize(&Amsterdam, naive);
    assert_eq!(dt.hour(), 2);
    assert_eq!(dt.minute(), 30);
}

#[test]
fn test_date_range_display() {
    let range = parser().parse("2026-02-15").unwrap();
    assert_eq!(
        range.to_string(),
        "2026-02-15 00:00:00+01:00 to 2026-02-15 23:59:59+01:00"
    );
}

// ==================== Event Filter Tests ====================

#[test]
fn test_filter_no_hashtags_returns_all() {
    let events = sample_events();
    let terms: [&str; 0] = [];
    let result = filter_events(&events, &terms);
    assert_eq!(result, events);
}

#[test]
fn test_filter_single_hashtag_or() {
    let result = filter_events(&sample_events(), &["#billable"]);
    assert_eq!(summaries(&result), vec!["Event 1", "Event 2"]);
}

#[test]
fn test_filter_multiple_hashtags_or() {
    let result = filter_events(&sample_events(), &["#meeting", "#client"]);
    assert_eq!(summaries(&result), vec!["Event 1", "Event 3"]);
}

#[test]
fn test_filter_comma_separated_and() {
    let result = filter_events(&sample_events(), &["#zzp, #hosintra"]);
    assert_eq!(summaries(&result), vec!["Event 2"]);
}

#[test]
fn test_filter_and_no_match() {
    let result = filter_events(&sample_events(), &["#billable, #meeting"]);
    assert!(result.is_empty());
}

#[test]
fn test_filter_combined_and_or() {
    let result = filter_events(&sample_events(), &["#zzp, #hosintra", "#meeting"]);
    assert_eq!(summaries(&result), vec!["Event 2", "Event 3"]);
}

#[test]
fn test_filter_case_insensitive() {
    let result = filter_events(&sample_events(), &["#BILLABLE"]);
    assert_eq!(summaries(&result), vec!["Event 1", "Event 2"]);
}

#[test]
fn test_filter_without_hash_prefix() {
    let result = filter_events(&sample_events(), &["BILLABLE"]);
    assert_eq!(summaries(&result), vec!["Event 1", "Event 2"]);
}

#[test]
fn test_filter_none_description_has_no_tags() {
    let mut events = sample_events();
    events[0].description = None;
    let result = filter_events(&events, &["#client"]);
    assert!(result.is_empty());
}

#[test]
fn test_filter_empty_term_matches_nothing() {
    let result = filter_events(&sample_events(), &[""]);
    assert!(result.is_empty());
}

#[test]
fn test_filter_replaces_hashtags_from_description() {
    let mut events = sample_events();
    events[0].hashtags = vec!["#stale".to_string()];
    events[0].description = Some("Now with #Billable and #NEW".to_string());

    let result = filter_events(&events, &["#billable"]);

    assert_eq!(result[0].hashtags, vec!["#Billable", "#NEW"]);
    // The input is left untouched.
    assert_eq!(events[0].hashtags, vec!["#stale"]);
}

#[test]
fn test_filter_is_idempotent() {
    let terms = ["#zzp, #hosintra", "#meeting"];
    let first = filter_events(&sample_events(), &terms);
    let second = filter_events(&first, &terms);
    assert_eq!(first, second);
}

#[test]
fn test_hashtag_filter_matches_single_event() {
    let filter = HashtagFilter::new(&["#meeting"]);
    let events = sample_events();
    assert!(!filter.matches(&events[0]));
    assert!(filter.matches(&events[2]));
    assert!(HashtagFilter::default().matches(&events[3]));
}

// ==================== Date Overlap Tests ====================

#[test]
fn test_filter_by_date_range_overlap() {
    let events = sample_events();
    let start = amsterdam(2026, 2, 1, 9, 30);
    let end = amsterdam(2026, 2, 1, 14, 0);

    let result = filter_by_date_range(&events, &start, &end);
    assert_eq!(summaries(&result), vec!["Event 1", "Event 2", "Event 3"]);
}

#[test]
fn test_filter_by_date_range_touching_bounds_are_inclusive() {
    let events = sample_events();
    let start = amsterdam(2026, 2, 1, 17, 0);
    let end = amsterdam(2026, 2, 1, 18, 0);

    let result = filter_by_date_range(&events, &start, &end);
    assert_eq!(summaries(&result), vec!["Event 4"]);
}

#[test]
fn test_filter_by_date_range_inverted_matches_nothing() {
    let events = sample_events();
    let start = amsterdam(2026, 2, 1, 18, 0);
    let end = amsterdam(2026, 2, 1, 8, 0);

    assert!(filter_by_date_range(&events, &start, &end).is_empty());
}

#[test]
fn test_filter_by_date_range_compares_instants_across_offsets() {
    let events = sample_events();
    // 08:30-09:30 UTC is 09:30-10:30 in Amsterdam.
    let start = chrono::Utc.with_ymd_and_hms(2026, 2, 1, 8, 30, 0).unwrap();
    let end = chrono::Utc.with_ymd_and_hms(2026, 2, 1, 9, 30, 0).unwrap();

    let result = filter_by_date_range(&events, &start, &end);
    assert_eq!(summaries(&result), vec!["Event 1"]);
}

#[test]
fn test_date_range_overlaps_matches_filter() {
    let range = parser().parse("2026-02-01").unwrap();
    let events = sample_events();
    assert!(events.iter().all(|e| range.overlaps(e)));

    let next_day = parser().parse("2026-02-02").unwrap();
    assert!(events.iter().all(|e| !next_day.overlaps(e)));
}

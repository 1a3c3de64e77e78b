//! Terminal table output.

use cal_core_rs::{total_hours, CalendarEvent};
use owo_colors::OwoColorize;

use super::helpers::{format_date, format_end, format_start, truncate_str};
use super::{Exporter, Result};

/// Widest summary shown before truncation.
const SUMMARY_WIDTH: usize = 40;

/// Formats events as a table followed by event and hour totals.
pub fn format_events_table(events: &[CalendarEvent], use_colors: bool) -> String {
    if events.is_empty() {
        let message = "No events to display.";
        return if use_colors {
            format!("{}\n", message.yellow())
        } else {
            format!("{message}\n")
        };
    }

    let mut output = String::new();

    let title = "Calendar Events";
    if use_colors {
        output.push_str(&format!("{}\n", title.bold()));
    } else {
        output.push_str(title);
        output.push('\n');
    }

    let header = format!(
        "{:<10} {:<13} {:>8} {:<40} {}",
        "Date", "Time", "Duration", "Summary", "Hashtags"
    );
    if use_colors {
        output.push_str(&format!("{}\n", header.cyan().bold()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for event in events {
        let date = format!("{:<10}", format_date(event));
        let time = format!("{:<13}", format!("{} - {}", format_start(event), format_end(event)));
        let duration = format!("{:>8}", event.duration_formatted());
        let summary = format!("{:<40}", truncate_str(&event.summary, SUMMARY_WIDTH));
        let hashtags = event.hashtags_joined();

        let line = if use_colors {
            format!(
                "{} {} {} {} {}",
                date.green(),
                time.green(),
                duration.yellow(),
                summary,
                hashtags.magenta()
            )
        } else {
            format!("{} {} {} {} {}", date, time, duration, summary, hashtags)
        };
        output.push_str(line.trim_end());
        output.push('\n');
    }

    output.push('\n');
    let events_label = "Total events:";
    let hours_label = "Total hours:";
    let hours = format!("{:.2}", total_hours(events));
    if use_colors {
        output.push_str(&format!("{} {}\n", events_label.bold(), events.len()));
        output.push_str(&format!("{} {}\n", hours_label.bold(), hours));
    } else {
        output.push_str(&format!("{} {}\n", events_label, events.len()));
        output.push_str(&format!("{} {}\n", hours_label, hours));
    }

    output
}

/// Prints the events table to stdout.
pub struct TerminalExporter {
    use_colors: bool,
}

impl TerminalExporter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }
}

impl Exporter for TerminalExporter {
    fn export(&self, events: &[CalendarEvent]) -> Result<()> {
        print!("{}", format_events_table(events, self.use_colors));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::helpers::test_support::*;
    use super::*;

    #[test]
    fn test_empty_list() {
        assert_eq!(format_events_table(&[], false), "No events to display.\n");
    }

    #[test]
    fn test_table_without_colors() {
        let output = format_events_table(&sample_events(), false);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "Calendar Events");
        assert!(lines[1].starts_with("Date       Time          Duration Summary"));
        assert!(lines[1].ends_with("Hashtags"));
        assert!(lines[2].starts_with("2026-02-02 09:00 - 10:30     1:30 Client workshop"));
        assert!(lines[2].ends_with("#billable, #client"));
        assert!(lines[3].starts_with("2026-02-03 10:00 - 12:00     2:00 Hosintra build"));
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "Total events: 2");
        assert_eq!(lines[6], "Total hours: 3.50");
        assert!(!output.contains('\u{1b}'));
    }

    #[test]
    fn test_long_summary_is_truncated() {
        let mut events = sample_events();
        events[0].summary = "A very long meeting title that keeps going and going".to_string();
        let output = format_events_table(&events, false);
        assert!(output.contains("A very long meeting title that keeps ..."));
        assert!(!output.contains("going and going"));
    }

    #[test]
    fn test_event_without_hashtags_has_no_trailing_space() {
        let mut events = sample_events();
        events[1].hashtags.clear();
        let output = format_events_table(&events, false);
        let row = output.lines().nth(3).unwrap();
        assert_eq!(row, row.trim_end());
    }

    #[test]
    fn test_table_with_colors() {
        let output = format_events_table(&sample_events(), true);
        assert!(output.contains('\u{1b}'));
        assert!(output.contains("Client workshop"));
        assert!(output.contains("3.50"));
    }
}

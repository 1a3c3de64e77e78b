//! CSV export.

use std::path::PathBuf;

use cal_core_rs::{round_hours, CalendarEvent};
use tracing::debug;

use super::helpers::{create_file, format_date, format_end, format_start};
use super::{Exporter, Result};

/// CSV header row.
pub const CSV_HEADERS: [&str; 9] = [
    "date",
    "start_time",
    "end_time",
    "duration_hours",
    "duration_formatted",
    "summary",
    "description",
    "location",
    "hashtags",
];

/// Writes one row per event. An empty event list writes no file.
pub struct CsvExporter {
    path: PathBuf,
}

impl CsvExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Exporter for CsvExporter {
    fn export(&self, events: &[CalendarEvent]) -> Result<()> {
        if events.is_empty() {
            debug!(path = %self.path.display(), "no events, skipping CSV file");
            return Ok(());
        }

        let file = create_file(&self.path)?;
        let mut writer = ::csv::Writer::from_writer(file);
        writer.write_record(CSV_HEADERS)?;

        for event in events {
            writer.write_record([
                format_date(event),
                format_start(event),
                format_end(event),
                round_hours(event.duration_hours()).to_string(),
                event.duration_formatted(),
                event.summary.clone(),
                event.description.clone().unwrap_or_default(),
                event.location.clone().unwrap_or_default(),
                event.hashtags_joined(),
            ])?;
        }

        writer.flush()?;
        Ok(())
    }
}

//! JSON export.

use std::io::Write;
use std::path::PathBuf;

use cal_core_rs::{CalendarEvent, EventRecord};
use serde::Serialize;

use super::helpers::{create_file, rounded_total_hours};
use super::{Exporter, Result};

/// Top-level JSON document.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub events: Vec<EventRecord>,
    pub summary: JsonSummary,
}

/// Totals block of the JSON document.
#[derive(Debug, Serialize)]
pub struct JsonSummary {
    pub total_events: usize,
    pub total_hours: f64,
}

impl JsonReport {
    pub fn new(events: &[CalendarEvent]) -> Self {
        Self {
            events: events.iter().map(CalendarEvent::to_record).collect(),
            summary: JsonSummary {
                total_events: events.len(),
                total_hours: rounded_total_hours(events),
            },
        }
    }
}

/// Writes a pretty-printed report. Written even when there are no events.
pub struct JsonExporter {
    path: PathBuf,
}

impl JsonExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Exporter for JsonExporter {
    fn export(&self, events: &[CalendarEvent]) -> Result<()> {
        let report = JsonReport::new(events);
        let mut file = create_file(&self.path)?;
        serde_json::to_writer_pretty(&mut file, &report)?;
        file.write_all(b"\n")?;
        Ok(())
    }
}

//! Common helpers shared by the exporters.

use std::fs::{self, File};
use std::path::Path;

use cal_core_rs::{round_hours, total_hours, CalendarEvent};

use super::{ExportError, Result};

/// Column headers of the spreadsheet exports.
pub const SHEET_HEADERS: [&str; 9] = [
    "Date",
    "Start Time",
    "End Time",
    "Duration (h)",
    "Duration",
    "Summary",
    "Description",
    "Location",
    "Hashtags",
];

/// Name of the single worksheet in spreadsheet exports.
pub const SHEET_NAME: &str = "Calendar Events";

/// Truncates a string to at most `max_len` characters, ending in `...`.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Start date as `YYYY-MM-DD`.
pub fn format_date(event: &CalendarEvent) -> String {
    event.start.format("%Y-%m-%d").to_string()
}

/// Start time as `HH:MM`.
pub fn format_start(event: &CalendarEvent) -> String {
    event.start.format("%H:%M").to_string()
}

/// End time as `HH:MM`.
pub fn format_end(event: &CalendarEvent) -> String {
    event.end.format("%H:%M").to_string()
}

/// Total duration of `events`, rounded to two decimals.
pub fn rounded_total_hours(events: &[CalendarEvent]) -> f64 {
    round_hours(total_hours(events))
}

/// Creates missing parent directories of `path`.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| ExportError::Create {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

/// Creates (or truncates) `path`, creating parent directories first.
pub fn create_file(path: &Path) -> Result<File> {
    ensure_parent_dir(path)?;
    File::create(path).map_err(|source| ExportError::Create {
        path: path.to_path_buf(),
        source,
    })
}

/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }
}

/// What a spreadsheet row holds; drives styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Header,
    Event,
    Blank,
    Total,
}

/// A spreadsheet row.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub kind: RowKind,
    pub cells: Vec<Cell>,
}

/// Rows shared by the XLSX and ODS exports: header, one row per event, a
/// blank row, then `Total Events:` and `Total Hours:`.
pub fn sheet_rows(events: &[CalendarEvent]) -> Vec<SheetRow> {
    let mut rows = Vec::with_capacity(events.len() + 4);

    rows.push(SheetRow {
        kind: RowKind::Header,
        cells: SHEET_HEADERS.iter().map(|h| Cell::text(*h)).collect(),
    });

    for event in events {
        rows.push(SheetRow {
            kind: RowKind::Event,
            cells: vec![
                Cell::text(format_date(event)),
                Cell::text(format_start(event)),
                Cell::text(format_end(event)),
                Cell::Number(round_hours(event.duration_hours())),
                Cell::text(event.duration_formatted()),
                Cell::text(event.summary.as_str()),
                Cell::text(event.description.clone().unwrap_or_default()),
                Cell::text(event.location.clone().unwrap_or_default()),
                Cell::text(event.hashtags_joined()),
            ],
        });
    }

    rows.push(SheetRow {
        kind: RowKind::Blank,
        cells: Vec::new(),
    });
    rows.push(SheetRow {
        kind: RowKind::Total,
        cells: vec![Cell::text("Total Events:"), Cell::Number(events.len() as f64)],
    });
    rows.push(SheetRow {
        kind: RowKind::Total,
        cells: vec![
            Cell::text("Total Hours:"),
            Cell::Number(rounded_total_hours(events)),
        ],
    });

    rows
}

//! Event source backed by a local `.ics` file.

use std::path::{Path, PathBuf};

use cal_core_rs::{CalendarEvent, DateRange};
use tracing::info;

use crate::error::{FeedError, Result};
use crate::ics::{events_in_range, parse_calendar_str};
use crate::source::EventSource;
use crate::zone::Zone;

/// Reads events from an iCalendar file on disk.
#[derive(Debug, Clone)]
pub struct LocalIcsSource {
    path: PathBuf,
    zone: Zone,
}

impl LocalIcsSource {
    /// Creates a source for `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::NotFound`] if the file does not exist and
    /// [`FeedError::InvalidExtension`] if it does not end in `.ics`
    /// (any case).
    pub fn new(path: impl Into<PathBuf>, zone: Zone) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            return Err(FeedError::NotFound { path });
        }
        if !has_ics_extension(&path) {
            return Err(FeedError::InvalidExtension { path });
        }

        Ok(Self { path, zone })
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses every event in the file.
    pub async fn fetch_all(&self) -> Result<Vec<CalendarEvent>> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FeedError::Io {
                path: self.path.clone(),
                source,
            })?;
        parse_calendar_str(&text, self.zone)
    }
}

impl EventSource for LocalIcsSource {
    async fn fetch(&self, range: &DateRange) -> Result<Vec<CalendarEvent>> {
        let events = self.fetch_all().await?;
        let total = events.len();
        let selected = events_in_range(events, range);
        info!(
            path = %self.path.display(),
            total,
            selected = selected.len(),
            "parsed local calendar"
        );
        Ok(selected)
    }
}

fn has_ics_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ics"))
}

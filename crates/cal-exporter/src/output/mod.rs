//! Export formats for the cal-exporter CLI.
//!
//! Every format implements [`Exporter`]:
//!
//! - [`terminal`] - Table printed to stdout
//! - [`csv`] - Flat CSV, one row per event
//! - [`json`] - Event list plus totals
//! - [`xlsx`] - Office Open XML spreadsheet
//! - [`ods`] - OpenDocument spreadsheet
//! - [`pdf`] - Paginated landscape report
//! - [`helpers`] - Shared cell formatting and file creation

pub mod csv;
pub mod helpers;
pub mod json;
pub mod ods;
pub mod pdf;
pub mod terminal;
pub mod xlsx;

use std::io;
use std::path::{Path, PathBuf};

use cal_core_rs::CalendarEvent;
use thiserror::Error;

use crate::cli::ExportFormat;
pub use terminal::TerminalExporter;

/// Errors raised while writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The output file or its directory could not be created.
    #[error("cannot create {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing to an already open output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for exporters.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Writes a list of events somewhere.
pub trait Exporter {
    /// Exports `events` in the order given.
    fn export(&self, events: &[CalendarEvent]) -> Result<()>;
}

impl ExportFormat {
    /// Every format, in `--export` help order.
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Pdf,
        ExportFormat::Xlsx,
        ExportFormat::Ods,
        ExportFormat::Csv,
        ExportFormat::Json,
    ];

    /// File extension without the dot, also the format's name.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Ods => "ods",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// Parses a format name, ignoring case and a leading dot.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        let name = name.strip_prefix('.').unwrap_or(name);
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(name))
    }

    /// Infers the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_name)
    }
}

/// Builds the file exporter for `format` writing to `path`.
pub fn file_exporter(format: ExportFormat, path: impl Into<PathBuf>) -> Box<dyn Exporter> {
    let path = path.into();
    match format {
        ExportFormat::Pdf => Box::new(pdf::PdfExporter::new(path)),
        ExportFormat::Xlsx => Box::new(xlsx::XlsxExporter::new(path)),
        ExportFormat::Ods => Box::new(ods::OdsExporter::new(path)),
        ExportFormat::Csv => Box::new(csv::CsvExporter::new(path)),
        ExportFormat::Json => Box::new(json::JsonExporter::new(path)),
    }
}

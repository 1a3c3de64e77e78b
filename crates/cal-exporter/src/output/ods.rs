//! OpenDocument spreadsheet export.

use std::io::Write;
use std::path::PathBuf;

use cal_core_rs::CalendarEvent;
use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::helpers::{create_file, sheet_rows, Cell, SheetRow, SHEET_NAME};
use super::{Exporter, Result};

const MIME_TYPE: &str = "application/vnd.oasis.opendocument.spreadsheet";

const MANIFEST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<manifest:manifest xmlns:manifest="urn:oasis:names:tc:opendocument:xmlns:manifest:1.0" manifest:version="1.2"><manifest:file-entry manifest:full-path="/" manifest:version="1.2" manifest:media-type="application/vnd.oasis.opendocument.spreadsheet"/><manifest:file-entry manifest:full-path="content.xml" manifest:media-type="text/xml"/></manifest:manifest>"#;

/// Writes a single-table `.ods` document.
pub struct OdsExporter {
    path: PathBuf,
}

impl OdsExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Exporter for OdsExporter {
    fn export(&self, events: &[CalendarEvent]) -> Result<()> {
        let file = create_file(&self.path)?;
        let mut zip = ZipWriter::new(file);

        // `mimetype` must be the first entry and stored uncompressed.
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        zip.start_file("mimetype", stored)?;
        zip.write_all(MIME_TYPE.as_bytes())?;

        let options = SimpleFileOptions::default();
        zip.start_file("META-INF/manifest.xml", options)?;
        zip.write_all(MANIFEST.as_bytes())?;

        zip.start_file("content.xml", options)?;
        zip.write_all(content_xml(&sheet_rows(events)).as_bytes())?;

        zip.finish()?;
        Ok(())
    }
}

fn content_xml(rows: &[SheetRow]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" office:version="1.2"><office:body><office:spreadsheet>"#,
    );
    xml.push_str(&format!(
        r#"<table:table table:name="{}">"#,
        escape(SHEET_NAME)
    ));

    for row in rows {
        xml.push_str("<table:table-row>");
        if row.cells.is_empty() {
            xml.push_str("<table:table-cell/>");
        }
        for cell in &row.cells {
            match cell {
                Cell::Text(text) => xml.push_str(&format!(
                    r#"<table:table-cell office:value-type="string"><text:p>{}</text:p></table:table-cell>"#,
                    escape(text.as_str())
                )),
                Cell::Number(value) => xml.push_str(&format!(
                    r#"<table:table-cell office:value-type="float" office:value="{value}"><text:p>{value}</text:p></table:table-cell>"#
                )),
            }
        }
        xml.push_str("</table:table-row>");
    }

    xml.push_str("</table:table></office:spreadsheet></office:body></office:document-content>");
    xml
}

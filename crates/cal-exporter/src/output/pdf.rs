//! PDF report export.
//!
//! Landscape Letter pages drawn with the standard Helvetica fonts: a title,
//! a table whose header repeats on every page, then the event and hour
//! totals. Text outside Latin-1 is replaced with `?`.

use std::mem;
use std::path::PathBuf;

use cal_core_rs::{total_hours, CalendarEvent};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use super::helpers::{create_file, format_date, format_end, format_start, truncate_str};
use super::{Exporter, Result};

const PAGE_WIDTH: i64 = 792;
const PAGE_HEIGHT: i64 = 612;
const MARGIN: i64 = 36;
const ROW_HEIGHT: i64 = 18;
const CELL_PADDING: i64 = 4;
const TITLE_SIZE: i64 = 16;
const HEADER_SIZE: i64 = 10;
const BODY_SIZE: i64 = 9;
const TOTALS_SIZE: i64 = 11;
const TOTALS_LINE: i64 = 16;

/// Top of the table on the first page, below the title.
const FIRST_TABLE_TOP: i64 = PAGE_HEIGHT - MARGIN - 46;
/// Top of the table on continuation pages.
const TABLE_TOP: i64 = PAGE_HEIGHT - MARGIN;

/// Report title.
pub const TITLE: &str = "Calendar Events Report";

/// Table columns and their widths in points.
pub const COLUMNS: [(&str, i64); 6] = [
    ("Date", 72),
    ("Start", 50),
    ("End", 50),
    ("Hours", 50),
    ("Summary", 288),
    ("Hashtags", 144),
];

const SUMMARY_MAX_CHARS: usize = 50;
const HASHTAGS_MAX_CHARS: usize = 30;

const HEADER_FILL: (f32, f32, f32) = (0.267, 0.447, 0.769);
const STRIPE_FILL: (f32, f32, f32) = (0.949, 0.949, 0.949);
const GRID_GRAY: f32 = 0.5;

/// Regular and bold font resource names.
const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";

/// Writes a paginated landscape report.
pub struct PdfExporter {
    path: PathBuf,
}

impl PdfExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Exporter for PdfExporter {
    fn export(&self, events: &[CalendarEvent]) -> Result<()> {
        let pages = layout_pages(events);
        let mut doc = build_document(pages)?;
        let mut file = create_file(&self.path)?;
        doc.save_to(&mut file)?;
        Ok(())
    }
}

/// Cell texts of one table row.
fn row_cells(event: &CalendarEvent) -> [String; 6] {
    [
        format_date(event),
        format_start(event),
        format_end(event),
        format!("{:.2}", event.duration_hours()),
        truncate_str(&event.summary, SUMMARY_MAX_CHARS),
        truncate_str(&event.hashtags_joined(), HASHTAGS_MAX_CHARS),
    ]
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum RowStyle {
    Header,
    Plain,
    Striped,
}

/// Lays out all pages and returns the drawing operations of each.
fn layout_pages(events: &[CalendarEvent]) -> Vec<Vec<Operation>> {
    let mut pages = Vec::new();
    let mut ops = Vec::new();

    draw_text(
        &mut ops,
        FONT_BOLD,
        TITLE_SIZE,
        MARGIN,
        PAGE_HEIGHT - MARGIN - TITLE_SIZE,
        TITLE,
    );

    let headers = COLUMNS.map(|(name, _)| name.to_string());
    let mut y = FIRST_TABLE_TOP;
    draw_row(&mut ops, y, &headers, RowStyle::Header);
    y -= ROW_HEIGHT;

    for (i, event) in events.iter().enumerate() {
        if y - ROW_HEIGHT < MARGIN {
            pages.push(mem::take(&mut ops));
            y = TABLE_TOP;
            draw_row(&mut ops, y, &headers, RowStyle::Header);
            y -= ROW_HEIGHT;
        }
        let style = if i % 2 == 1 {
            RowStyle::Striped
        } else {
            RowStyle::Plain
        };
        draw_row(&mut ops, y, &row_cells(event), style);
        y -= ROW_HEIGHT;
    }

    if y - ROW_HEIGHT - 2 * TOTALS_LINE < MARGIN {
        pages.push(mem::take(&mut ops));
        y = TABLE_TOP;
    }
    y -= ROW_HEIGHT;
    let totals = [
        format!("Total Events: {}", events.len()),
        format!("Total Hours: {:.2}", total_hours(events)),
    ];
    for line in &totals {
        y -= TOTALS_LINE;
        draw_text(&mut ops, FONT_BOLD, TOTALS_SIZE, MARGIN, y, line);
    }

    pages.push(ops);
    pages
}

fn draw_row(ops: &mut Vec<Operation>, top: i64, cells: &[String], style: RowStyle) {
    let bottom = top - ROW_HEIGHT;
    let width: i64 = COLUMNS.iter().map(|(_, w)| w).sum();

    let fill = match style {
        RowStyle::Header => Some(HEADER_FILL),
        RowStyle::Striped => Some(STRIPE_FILL),
        RowStyle::Plain => None,
    };
    if let Some((r, g, b)) = fill {
        ops.push(Operation::new("rg", vec![real(r), real(g), real(b)]));
        ops.push(Operation::new("re", rect(MARGIN, bottom, width, ROW_HEIGHT)));
        ops.push(Operation::new("f", vec![]));
    }

    ops.push(Operation::new("G", vec![real(GRID_GRAY)]));
    ops.push(Operation::new("w", vec![real(0.5)]));
    let (font, size) = match style {
        RowStyle::Header => (FONT_BOLD, HEADER_SIZE),
        _ => (FONT_REGULAR, BODY_SIZE),
    };

    let mut x = MARGIN;
    for ((_, column_width), text) in COLUMNS.iter().zip(cells) {
        ops.push(Operation::new("re", rect(x, bottom, *column_width, ROW_HEIGHT)));
        ops.push(Operation::new("S", vec![]));

        if style == RowStyle::Header {
            ops.push(Operation::new("g", vec![real(1.0)]));
        } else {
            ops.push(Operation::new("g", vec![real(0.0)]));
        }
        draw_text(ops, font, size, x + CELL_PADDING, bottom + 5, text);
        x += column_width;
    }
}

fn draw_text(ops: &mut Vec<Operation>, font: &str, size: i64, x: i64, y: i64, text: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![font.into(), Object::Integer(size)]));
    ops.push(Operation::new("Td", vec![Object::Integer(x), Object::Integer(y)]));
    ops.push(Operation::new("Tj", vec![Object::string_literal(latin1(text))]));
    ops.push(Operation::new("ET", vec![]));
}

fn rect(x: i64, y: i64, width: i64, height: i64) -> Vec<Object> {
    vec![
        Object::Integer(x),
        Object::Integer(y),
        Object::Integer(width),
        Object::Integer(height),
    ]
}

fn real(value: f32) -> Object {
    Object::Real(value.into())
}

/// Encodes text for the WinAnsi standard fonts.
fn latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

/// Assembles the page tree around the laid out content streams.
fn build_document(pages: Vec<Vec<Operation>>) -> Result<Document> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FONT_REGULAR => regular_id,
            FONT_BOLD => bold_id,
        },
    });

    let mut kids = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => rect(0, 0, PAGE_WIDTH, PAGE_HEIGHT),
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    Ok(doc)
}

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::io::Cursor;
use tracing::{debug, info};

use crate::common::error::{ImportError, Result};

/// A raw cell value as read from the workbook. Spreadsheets are duck-typed;
/// representing the possibilities up front lets the normalizers pattern-match
/// instead of probing.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    DateTime(NaiveDateTime),
    Bool(bool),
    Empty,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

/// One spreadsheet row: header label -> raw cell value.
pub type RawRow = HashMap<String, Cell>;

/// A named sheet with its header row already folded into each row map.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<RawRow>,
}

/// Sheet-name fragments used to locate the tabs we care about. Matching is
/// case-insensitive substring, so "Shows", "show list" and "SHOWS 2025" all
/// qualify.
pub const SHOWS_NEEDLE: &str = "show";
pub const COMPANIES_NEEDLE: &str = "compan";

/// Decode a binary workbook (xlsx/xls/ods) into named sheets of rows.
///
/// The first non-empty row of each sheet is treated as the header row.
pub fn read_workbook(bytes: &[u8]) -> Result<Vec<Sheet>> {
    let cursor = Cursor::new(bytes);
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|e| ImportError::UnreadableFile(e.to_string()))?;

    let sheet_names = workbook.sheet_names().to_vec();
    debug!(sheets = ?sheet_names, "decoded workbook");

    let mut sheets = Vec::with_capacity(sheet_names.len());
    for name in sheet_names {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| ImportError::UnreadableFile(e.to_string()))?;
        let rows = range_to_rows(range.rows());
        info!(sheet = %name, rows = rows.len(), "read sheet");
        sheets.push(Sheet { name, rows });
    }
    Ok(sheets)
}

/// Find the first sheet whose name contains `needle`, case-insensitively.
pub fn find_sheet<'a>(sheets: &'a [Sheet], needle: &str) -> Option<&'a Sheet> {
    sheets
        .iter()
        .find(|s| s.name.to_lowercase().contains(needle))
}

pub fn sheet_names(sheets: &[Sheet]) -> Vec<String> {
    sheets.iter().map(|s| s.name.clone()).collect()
}

fn range_to_rows<'a>(mut rows: impl Iterator<Item = &'a [Data]>) -> Vec<RawRow> {
    // Header row: first row with at least one usable label.
    let headers: Vec<Option<String>> = loop {
        match rows.next() {
            Some(row) => {
                let labels: Vec<Option<String>> = row.iter().map(header_label).collect();
                if labels.iter().any(|l| l.is_some()) {
                    break labels;
                }
            }
            None => return Vec::new(),
        }
    };

    let mut out = Vec::new();
    for row in rows {
        let mut raw = RawRow::new();
        for (label, data) in headers.iter().zip(row.iter()) {
            if let Some(label) = label {
                let cell = convert_cell(data);
                if !cell.is_empty() {
                    raw.insert(label.clone(), cell);
                }
            }
        }
        if !raw.is_empty() {
            out.push(raw);
        }
    }
    out
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => Cell::DateTime(naive),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) => Cell::Empty,
    }
}

fn header_label(data: &Data) -> Option<String> {
    let label = match data {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        _ => return None,
    };
    if label.is_empty() {
        None
    } else {
        Some(label)
    }
}

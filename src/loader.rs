//! Reads a spreadsheet or delimited-text export into a typed [`RowSet`].
//!
//! Workbooks (`xlsx`, `xlsm`, `xlsb`, `xls`, `ods`) go through `calamine`;
//! `.csv`, `.tsv` and `.txt` files go through the `csv` reader. The first row
//! is the header row. Header names are made unique the way spreadsheet tools
//! usually do it: the second `코드` becomes `코드.1`, the third `코드.2`, and
//! blank headers become `Unnamed: <column index>`.

use std::{collections::HashSet, path::Path};

use calamine::{Data, Reader, open_workbook_auto};
use encoding_rs::{Encoding, UTF_8};
use log::{debug, info};

use crate::{
    data::{Row, RowSet, Value, infer_text_value, parse_naive_date},
    error::ConvertError,
    io_utils,
};

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Worksheet to read; the first sheet when `None`.
    pub sheet: Option<String>,
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            sheet: None,
            delimiter: None,
            encoding: UTF_8,
        }
    }
}

pub fn ensure_source_exists(path: &Path) -> Result<(), ConvertError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ConvertError::SourceNotFound(path.to_path_buf()))
    }
}

/// Loads the whole source into memory.
pub fn load(path: &Path, options: &LoadOptions) -> Result<RowSet, ConvertError> {
    ensure_source_exists(path)?;
    let rows = if io_utils::is_delimited_text(path) {
        load_delimited(path, options)?
    } else {
        load_workbook(path, options.sheet.as_deref())?
    };
    info!(
        "Read {} record(s) across {} column(s) from {:?}",
        rows.len(),
        rows.headers.len(),
        path
    );
    Ok(rows)
}

/// Sheet names in workbook order; empty for delimited text.
pub fn sheet_names(path: &Path) -> Result<Vec<String>, ConvertError> {
    ensure_source_exists(path)?;
    if io_utils::is_delimited_text(path) {
        return Ok(Vec::new());
    }
    let workbook = open_workbook_auto(path).map_err(|err| ConvertError::unreadable(path, err))?;
    Ok(workbook.sheet_names())
}

fn load_workbook(path: &Path, sheet: Option<&str>) -> Result<RowSet, ConvertError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|err| ConvertError::unreadable(path, err))?;
    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ConvertError::unreadable(path, "workbook has no sheets"))?,
    };
    debug!("Reading sheet '{sheet_name}' from {path:?}");
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|err| ConvertError::unreadable(path, format!("sheet '{sheet_name}': {err}")))?;

    let mut source_rows = range.rows();
    let header_cells = source_rows
        .next()
        .ok_or_else(|| ConvertError::unreadable(path, format!("sheet '{sheet_name}' is empty")))?;
    let headers = unique_headers(header_cells.iter().map(header_text));
    let width = headers.len();

    let rows = source_rows
        .map(|cells| {
            let mut row: Row = cells.iter().take(width).map(cell_to_value).collect();
            row.resize(width, Value::Null);
            row
        })
        .filter(|row| !row.iter().all(Value::is_null))
        .collect();
    Ok(RowSet::new(headers, rows))
}

fn load_delimited(path: &Path, options: &LoadOptions) -> Result<RowSet, ConvertError> {
    let delimiter = io_utils::resolve_input_delimiter(path, options.delimiter);
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
    let header_record = reader
        .byte_headers()
        .map_err(|err| ConvertError::unreadable(path, err))?
        .clone();
    let decoded = io_utils::decode_record(&header_record, options.encoding)
        .map_err(|err| ConvertError::unreadable(path, err))?;
    let headers = unique_headers(
        decoded
            .into_iter()
            .map(|name| (!name.is_empty()).then_some(name)),
    );
    let width = headers.len();

    let mut rows = Vec::new();
    for (idx, record) in reader.byte_records().enumerate() {
        let line = idx + 2;
        let record = record.map_err(|err| ConvertError::unreadable(path, err))?;
        if record.len() > width {
            return Err(ConvertError::unreadable(
                path,
                format!("line {line} has {} field(s) but the header has {width}", record.len()),
            ));
        }
        let fields = io_utils::decode_record(&record, options.encoding)
            .map_err(|err| ConvertError::unreadable(path, format!("line {line}: {err}")))?;
        let mut row: Row = fields.iter().map(|field| infer_text_value(field)).collect();
        row.resize(width, Value::Null);
        if !row.iter().all(Value::is_null) {
            rows.push(row);
        }
    }
    Ok(RowSet::new(headers, rows))
}

fn header_text(cell: &Data) -> Option<String> {
    match cell_to_value(cell) {
        Value::Null => None,
        Value::String(s) => Some(s).filter(|s| !s.is_empty()),
        other => Some(other.as_display()),
    }
}

/// Disambiguates repeated header names with `.N` suffixes and names blank
/// headers after their position.
pub fn unique_headers<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    let mut seen = HashSet::new();
    let mut headers = Vec::new();
    for (idx, name) in names.into_iter().enumerate() {
        let base = name.unwrap_or_else(|| format!("Unnamed: {idx}"));
        let mut candidate = base.clone();
        let mut suffix = 0;
        while seen.contains(&candidate) {
            suffix += 1;
            candidate = format!("{base}.{suffix}");
        }
        seen.insert(candidate.clone());
        headers.push(candidate);
    }
    headers
}

/// Converts a workbook cell into the closed [`Value`] type.
pub fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::String(s) if s.is_empty() => Value::Null,
        Data::String(s) => Value::String(s.clone()),
        Data::Int(i) => Value::Integer(*i),
        Data::Float(f) => float_to_value(*f),
        Data::Bool(b) => Value::Boolean(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) if !dt.is_duration() => Value::Date(datetime.date()),
            _ => float_to_value(dt.as_f64()),
        },
        Data::DateTimeIso(s) => parse_naive_date(s)
            .map(Value::Date)
            .unwrap_or_else(|| Value::String(s.clone())),
        Data::DurationIso(s) => Value::String(s.clone()),
    }
}

// Whole numbers become integers so identifiers render without a fraction.
fn float_to_value(f: f64) -> Value {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Value::Integer(f as i64)
    } else {
        Value::Float(f)
    }
}

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("write temp file contents");
        path
    }

    /// Writes an xlsx workbook with one worksheet per `(name, rows)` entry.
    pub fn write_workbook(&self, name: &str, sheets: &[(&str, Vec<Vec<Cell>>)]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        write_workbook(&path, sheets);
        path
    }

    pub fn read(&self, relative: impl AsRef<Path>) -> String {
        fs::read_to_string(self.temp_dir.path().join(relative)).expect("read output file")
    }
}

/// A cell written into a test workbook.
#[derive(Debug, Clone)]
pub enum Cell {
    Text(String),
    Number(f64),
    Date(u16, u8, u8),
    Blank,
}

pub fn text(value: &str) -> Cell {
    Cell::Text(value.to_string())
}

pub fn number(value: f64) -> Cell {
    Cell::Number(value)
}

pub fn headers(names: &[&str]) -> Vec<Cell> {
    names.iter().map(|name| text(name)).collect()
}

pub fn write_workbook(path: &Path, sheets: &[(&str, Vec<Vec<Cell>>)]) {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    for (sheet_name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*sheet_name).expect("sheet name");
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let (r, c) = (r as u32, c as u16);
                match cell {
                    Cell::Text(value) => {
                        worksheet.write_string(r, c, value).expect("write string");
                    }
                    Cell::Number(value) => {
                        worksheet.write_number(r, c, *value).expect("write number");
                    }
                    Cell::Date(y, m, d) => {
                        let date = ExcelDateTime::from_ymd(*y, *m, *d).expect("valid date");
                        worksheet
                            .write_datetime_with_format(r, c, &date, &date_format)
                            .expect("write date");
                    }
                    Cell::Blank => {}
                }
            }
        }
    }
    workbook.save(path).expect("save workbook");
}

/// Header row of the partner export, including the duplicated code column.
pub const PARTNER_HEADERS: &[&str] = &[
    "거래처코드",
    "거래처명",
    "현재 담당 사번",
    "이전 담당 사번",
    "담당변경일",
    "위도",
    "거래처코드",
];

/// One partner export row; `idx` drives every value. Every fifth row has no
/// previous manager.
pub fn partner_row(idx: usize) -> Vec<Cell> {
    let previous_manager = if idx % 5 == 0 {
        Cell::Blank
    } else {
        number((10_000 + idx) as f64)
    };
    vec![
        text(&format!("P{idx:05}")),
        text(&format!("상점 {idx}")),
        number(12345.0),
        previous_manager,
        Cell::Date(2024, 7, 1),
        number(37.5),
        text(&format!("P{idx:05}")),
    ]
}

pub fn partner_sheet(rows: usize) -> Vec<Vec<Cell>> {
    let mut sheet = vec![headers(PARTNER_HEADERS)];
    sheet.extend((0..rows).map(partner_row));
    sheet
}

#![allow(dead_code)]

pub mod file_server;

use sheetdl_core::sheet::template::{write_workbook, TemplateSheet};
use std::path::Path;

/// Write a single-sheet workbook with the given rows (first row is the header).
pub fn workbook(path: &Path, sheet: &str, rows: &[Vec<&str>]) {
    write_workbook(path, &[TemplateSheet::new(sheet, rows)]).expect("write workbook");
}

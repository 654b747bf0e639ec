//! Spreadsheet input: read one worksheet and turn it into row records.
//!
//! The first row of the selected sheet is the header. Everything below it is
//! data; a data row becomes a [`RowRecord`] only when its URL cell holds
//! non-blank text.

mod cell;
pub mod template;

pub use cell::cell_text;

use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Sheet to read: by position (`"0"` = first) or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    Index(usize),
    Name(String),
}

impl SheetSelector {
    /// All-digit input selects by index; anything else by name.
    pub fn parse(s: &str) -> Self {
        let t = s.trim();
        if !t.is_empty() && t.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(i) = t.parse::<usize>() {
                return SheetSelector::Index(i);
            }
        }
        SheetSelector::Name(t.to_string())
    }
}

impl Default for SheetSelector {
    fn default() -> Self {
        SheetSelector::Index(0)
    }
}

/// Spreadsheet-level failures. Any of these aborts the run before the first fetch.
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("failed to open workbook {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    #[error("sheet index {index} out of range (workbook has {count} sheet(s))")]
    IndexOutOfRange { index: usize, count: usize },
    #[error("sheet '{name}' not found; available sheets: {}", .available.join(", "))]
    SheetNotFound { name: String, available: Vec<String> },
    #[error("failed to read sheet '{sheet}': {source}")]
    Read {
        sheet: String,
        #[source]
        source: calamine::Error,
    },
    #[error("Column '{column}' not found in the workbook. Available columns: {}", .available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },
}

/// One URL to fetch, with an optional custom filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRecord {
    /// Trimmed, never empty.
    pub url: String,
    pub filename: Option<String>,
}

/// A worksheet read into memory: header names plus data rows of optional cell text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub sheet_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Build from a calamine range: first row is the header.
    /// Blank header cells are named `Unnamed: <index>`.
    pub fn from_range(sheet_name: &str, range: &Range<Data>) -> Self {
        let mut iter = range.rows();
        let columns: Vec<String> = match iter.next() {
            Some(header) => header
                .iter()
                .enumerate()
                .map(|(i, c)| {
                    cell_text(c)
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .unwrap_or_else(|| format!("Unnamed: {i}"))
                })
                .collect(),
            None => Vec::new(),
        };
        let rows = iter
            .map(|r| r.iter().map(cell_text).collect::<Vec<_>>())
            .collect();
        Self {
            sheet_name: sheet_name.to_string(),
            columns,
            rows,
        }
    }

    /// Build directly from header names and rows (tests, non-workbook input).
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self {
            sheet_name: String::new(),
            columns,
            rows,
        }
    }

    /// `(data rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// First `n` data rows.
    pub fn preview(&self, n: usize) -> &[Vec<Option<String>>] {
        &self.rows[..n.min(self.rows.len())]
    }

    fn cell(&self, row: &[Option<String>], col: usize) -> Option<String> {
        row.get(col).cloned().flatten()
    }

    /// Rows with a non-blank URL, in sheet order.
    ///
    /// Fails if `url_column` is not a header. A `filename_column` that is blank
    /// or not a header is ignored. URLs are trimmed; filenames are taken as-is
    /// whenever the cell is not missing.
    pub fn extract_rows(
        &self,
        url_column: &str,
        filename_column: Option<&str>,
    ) -> Result<Vec<RowRecord>, SheetError> {
        let url_idx = self
            .column_index(url_column)
            .ok_or_else(|| SheetError::MissingColumn {
                column: url_column.to_string(),
                available: self.columns.clone(),
            })?;
        let name_idx = filename_column
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .and_then(|c| {
                let idx = self.column_index(c);
                if idx.is_none() {
                    tracing::warn!(column = c, "filename column not found; using URL names");
                }
                idx
            });

        let mut records = Vec::new();
        for (i, row) in self.rows.iter().enumerate() {
            let url = match self.cell(row, url_idx) {
                Some(u) if !u.trim().is_empty() => u.trim().to_string(),
                _ => {
                    tracing::debug!(row = i + 1, "skipping row without URL");
                    continue;
                }
            };
            let filename = name_idx.and_then(|idx| self.cell(row, idx));
            records.push(RowRecord { url, filename });
        }
        Ok(records)
    }
}

/// Read the selected sheet of the workbook at `path` (xlsx, xlsm, xls, xlsb, ods).
pub fn read_table(path: &Path, selector: &SheetSelector) -> Result<Table, SheetError> {
    let mut workbook = open_workbook_auto(path).map_err(|source| SheetError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let names = workbook.sheet_names();
    let sheet_name = match selector {
        SheetSelector::Index(index) => {
            names
                .get(*index)
                .cloned()
                .ok_or(SheetError::IndexOutOfRange {
                    index: *index,
                    count: names.len(),
                })?
        }
        SheetSelector::Name(name) => {
            if !names.iter().any(|n| n == name) {
                return Err(SheetError::SheetNotFound {
                    name: name.clone(),
                    available: names,
                });
            }
            name.clone()
        }
    };
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|source| SheetError::Read {
            sheet: sheet_name.clone(),
            source,
        })?;
    let table = Table::from_range(&sheet_name, &range);
    tracing::debug!(
        sheet = %sheet_name,
        rows = table.rows.len(),
        columns = table.columns.len(),
        "read worksheet"
    );
    Ok(table)
}

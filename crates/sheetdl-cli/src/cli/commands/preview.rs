//! `sheetdl preview` – show what a workbook looks like before downloading.

use anyhow::Result;
use sheetdl_core::config::SheetdlConfig;
use sheetdl_core::sheet::{read_table, SheetSelector};
use std::path::Path;

use crate::cli::SheetArgs;

const MAX_CELL_WIDTH: usize = 40;

pub fn run_preview(
    cfg: &SheetdlConfig,
    workbook: &Path,
    sheet: &SheetArgs,
    rows: usize,
) -> Result<()> {
    let selector = SheetSelector::parse(sheet.sheet.as_deref().unwrap_or(&cfg.sheet));
    let table = read_table(workbook, &selector)?;
    let (n_rows, n_cols) = table.shape();
    println!("Sheet: {}", table.sheet_name);
    println!("Shape: {} rows x {} columns", n_rows, n_cols);
    println!("Columns: {}", table.columns.join(", "));
    println!();
    print!("{}", render_rows(&table.columns, table.preview(rows)));

    let url_column = sheet.url_column.as_deref().unwrap_or(&cfg.url_column);
    let filename_column = sheet
        .filename_column
        .as_deref()
        .or_else(|| cfg.filename_column());
    println!();
    match table.extract_rows(url_column, filename_column) {
        Ok(records) => println!("Valid URLs in '{}': {}", url_column, records.len()),
        Err(e) => println!("{}", e),
    }
    Ok(())
}

fn clip(s: &str) -> String {
    if s.chars().count() <= MAX_CELL_WIDTH {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(MAX_CELL_WIDTH - 3).collect();
        out.push_str("...");
        out
    }
}

/// Plain-text table: header, separator, one line per row; missing cells blank.
fn render_rows(columns: &[String], rows: &[Vec<Option<String>>]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            (0..columns.len())
                .map(|i| clip(r.get(i).cloned().flatten().as_deref().unwrap_or("")))
                .collect()
        })
        .collect();
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(clip(c).chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: Vec<String>| -> String {
        let padded: Vec<String> = values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<width$}", v, width = *w))
            .collect();
        format!("{}\n", padded.join(" | ").trim_end())
    };

    let mut out = line(columns.iter().map(|c| clip(c)).collect());
    out.push_str(&format!(
        "{}\n",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-")
    ));
    for row in cells {
        out.push_str(&line(row));
    }
    out
}

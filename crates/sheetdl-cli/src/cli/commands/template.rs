//! `sheetdl template` – write the expected-format example workbook.

use anyhow::Result;
use sheetdl_core::sheet::template::{example_sheet, write_workbook, EXAMPLE_ROWS};
use std::path::Path;

pub fn run_template(path: &Path) -> Result<()> {
    write_workbook(path, &[example_sheet()])?;
    println!("Template written to {}", path.display());
    println!("Expected format:");
    for row in EXAMPLE_ROWS {
        println!("  {:<32} {}", row[0], row[1]);
    }
    Ok(())
}

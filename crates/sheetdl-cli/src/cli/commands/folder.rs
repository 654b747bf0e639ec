//! `sheetdl folder` – inspect a download folder.

use anyhow::Result;
use sheetdl_core::config::SheetdlConfig;
use std::path::PathBuf;

use crate::cli::folders::{folder_stats, human_bytes, QuickFolder};

pub fn run_folder(
    cfg: &SheetdlConfig,
    dir: Option<PathBuf>,
    quick: Option<QuickFolder>,
) -> Result<()> {
    let dir = match (dir, quick) {
        (Some(dir), _) => dir,
        (None, Some(q)) => q.path()?,
        (None, None) => cfg.download_dir.clone(),
    };
    if dir.is_dir() {
        let (files, bytes) = folder_stats(&dir);
        println!("Folder exists: {}", dir.display());
        println!("{} file(s), {} total", files, human_bytes(bytes));
    } else if dir.exists() {
        anyhow::bail!("{} exists but is not a directory", dir.display());
    } else {
        println!("Folder will be created on download: {}", dir.display());
    }
    Ok(())
}

//! Target folders: quick picks, the native picker, and folder stats.

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QuickFolder {
    Desktop,
    Documents,
    Downloads,
    /// Current working directory.
    Cwd,
}

impl QuickFolder {
    pub fn path(self) -> Result<PathBuf> {
        let dir = match self {
            QuickFolder::Desktop => dirs::desktop_dir(),
            QuickFolder::Documents => dirs::document_dir(),
            QuickFolder::Downloads => dirs::download_dir(),
            QuickFolder::Cwd => {
                return std::env::current_dir().context("failed to read current directory")
            }
        };
        dir.with_context(|| format!("no {:?} folder known for this user", self))
    }
}

/// Ask for a directory with the native folder picker.
#[cfg(feature = "dialog")]
pub fn pick_directory() -> Result<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Select download folder")
        .pick_folder()
        .context("no folder selected")
}

#[cfg(not(feature = "dialog"))]
pub fn pick_directory() -> Result<PathBuf> {
    anyhow::bail!("--pick-dir needs sheetdl built with the `dialog` feature")
}

/// Number of files beneath `dir` and their total size in bytes.
pub fn folder_stats(dir: &Path) -> (usize, u64) {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .fold((0, 0), |(files, bytes), m| (files + 1, bytes + m.len()))
}

pub fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn stats_count_nested_files() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("a/b")).unwrap();
        fs::write(tmp.path().join("one.bin"), [0u8; 100]).unwrap();
        fs::write(tmp.path().join("a/b/two.bin"), [0u8; 24]).unwrap();
        assert_eq!(folder_stats(tmp.path()), (2, 124));
    }

    #[test]
    fn stats_of_missing_dir_are_zero() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(folder_stats(&tmp.path().join("nope")), (0, 0));
    }

    #[test]
    fn human_sizes() {
        assert_eq!(human_bytes(0), "0 B");
        assert_eq!(human_bytes(1023), "1023 B");
        assert_eq!(human_bytes(1536), "1.5 KiB");
        assert_eq!(human_bytes(5 * 1024 * 1024), "5.0 MiB");
    }

    #[test]
    fn cwd_quick_folder() {
        assert_eq!(
            QuickFolder::Cwd.path().unwrap(),
            std::env::current_dir().unwrap()
        );
    }
}

//! ZIP sink: successful files are bundled into one Deflate archive.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use super::{fill_buffer, render_links_page, Delivery, Fill, Sink};
use crate::fetch::FetchError;

pub struct ZipSink {
    archive: PathBuf,
    page: Option<PathBuf>,
    entries: Vec<(String, Vec<u8>)>,
    names: HashSet<String>,
}

impl ZipSink {
    /// `page`, when set, receives an HTML page with one data-URI link to the archive.
    pub fn new(archive: impl Into<PathBuf>, page: Option<PathBuf>) -> Self {
        Self {
            archive: archive.into(),
            page,
            entries: Vec::new(),
            names: HashSet::new(),
        }
    }
}

/// Returns `name`, or `stem (n).ext` with the smallest n >= 2 not in `taken`.
pub fn unique_entry_name(name: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(name) {
        return name.to_string();
    }
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, format!(".{ext}")),
        _ => (name, String::new()),
    };
    (2..)
        .map(|n| format!("{stem} ({n}){ext}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| name.to_string())
}

/// Build a Deflate-compressed ZIP from `(entry name, bytes)` pairs, in order.
pub fn build_archive<'a, I>(entries: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    let mut output = Cursor::new(Vec::new());
    {
        let mut writer = ZipWriter::new(&mut output);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        for (name, bytes) in entries {
            writer
                .start_file(name, options)
                .with_context(|| format!("failed to start ZIP entry {name}"))?;
            writer
                .write_all(bytes)
                .with_context(|| format!("failed to write ZIP entry {name}"))?;
        }
        writer.finish().context("failed to finish ZIP archive")?;
    }
    Ok(output.into_inner())
}

fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, data).with_context(|| format!("failed to write {}", path.display()))
}

impl Sink for ZipSink {
    fn store(&mut self, filename: &str, fill: &mut Fill<'_>) -> Result<u64, FetchError> {
        let bytes = fill_buffer(fill)?;
        let size = bytes.len() as u64;
        let entry = unique_entry_name(filename, &self.names);
        if entry != filename {
            tracing::debug!(filename, entry = %entry, "renamed duplicate ZIP entry");
        }
        self.names.insert(entry.clone());
        self.entries.push((entry, bytes));
        Ok(size)
    }

    fn finish(&mut self) -> Result<Delivery> {
        let data = build_archive(
            self.entries
                .iter()
                .map(|(n, b)| (n.as_str(), b.as_slice())),
        )?;
        write_file(&self.archive, &data)?;
        tracing::info!(
            archive = %self.archive.display(),
            entries = self.entries.len(),
            bytes = data.len(),
            "wrote ZIP archive"
        );

        if let Some(page) = &self.page {
            let archive_name = self
                .archive
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "downloads.zip".to_string());
            let html = render_links_page(
                "Downloaded files (ZIP)",
                std::iter::once((archive_name.as_str(), data.as_slice())),
            );
            write_file(page, html.as_bytes())?;
        }

        Ok(Delivery::Archive {
            archive: self.archive.clone(),
            page: self.page.clone(),
            entries: self.entries.len(),
            bytes: data.len() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn ok_fill(body: &'static [u8]) -> impl FnMut(&mut dyn Write) -> Result<u64, FetchError> {
        move |w: &mut dyn Write| {
            w.write_all(body)?;
            Ok(body.len() as u64)
        }
    }

    #[test]
    fn unique_names() {
        let mut taken = HashSet::new();
        assert_eq!(unique_entry_name("a.pdf", &taken), "a.pdf");
        taken.insert("a.pdf".to_string());
        assert_eq!(unique_entry_name("a.pdf", &taken), "a (2).pdf");
        taken.insert("a (2).pdf".to_string());
        assert_eq!(unique_entry_name("a.pdf", &taken), "a (3).pdf");
        taken.insert("README".to_string());
        assert_eq!(unique_entry_name("README", &taken), "README (2)");
    }

    #[test]
    fn archive_holds_only_successes() {
        let tmp = tempfile::tempdir().unwrap();
        let zip_path = tmp.path().join("out.zip");
        let page = tmp.path().join("out.html");
        let mut sink = ZipSink::new(&zip_path, Some(page.clone()));

        sink.store("a.pdf", &mut ok_fill(b"0123456789")).unwrap();
        sink.store("b.pdf", &mut |w: &mut dyn Write| {
            w.write_all(b"junk")?;
            Err(FetchError::Other("nope".to_string()))
        })
        .unwrap_err();
        sink.store("a.pdf", &mut ok_fill(b"second")).unwrap();

        let delivery = sink.finish().unwrap();
        match delivery {
            Delivery::Archive { entries, .. } => assert_eq!(entries, 2),
            other => panic!("expected Archive, got {other:?}"),
        }

        let file = fs::File::open(&zip_path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        assert_eq!(archive.len(), 2);
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(names, vec!["a (2).pdf".to_string(), "a.pdf".to_string()]);
        let mut content = String::new();
        archive
            .by_name("a.pdf")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "0123456789");

        let html = fs::read_to_string(&page).unwrap();
        assert!(html.contains("data:application/zip;base64,"));
        assert!(html.contains("download=\"out.zip\""));
    }

    #[test]
    fn empty_archive_is_valid() {
        let data = build_archive(std::iter::empty()).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(data)).unwrap();
        assert_eq!(archive.len(), 0);
    }
}

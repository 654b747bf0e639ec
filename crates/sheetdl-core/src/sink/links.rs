//! Links sink: successful files become data-URI links on one HTML page.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use super::{fill_buffer, render_links_page, Delivery, Fill, Sink};
use crate::fetch::FetchError;

pub struct LinksSink {
    page: PathBuf,
    files: Vec<(String, Vec<u8>)>,
}

impl LinksSink {
    pub fn new(page: impl Into<PathBuf>) -> Self {
        Self {
            page: page.into(),
            files: Vec::new(),
        }
    }

    /// Files held so far, in row order.
    pub fn files(&self) -> &[(String, Vec<u8>)] {
        &self.files
    }
}

impl Sink for LinksSink {
    fn store(&mut self, filename: &str, fill: &mut Fill<'_>) -> Result<u64, FetchError> {
        let bytes = fill_buffer(fill)?;
        let size = bytes.len() as u64;
        self.files.push((filename.to_string(), bytes));
        Ok(size)
    }

    fn finish(&mut self) -> Result<Delivery> {
        let html = render_links_page(
            "Downloaded files",
            self.files.iter().map(|(n, b)| (n.as_str(), b.as_slice())),
        );
        if let Some(parent) = self.page.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.page, html)
            .with_context(|| format!("failed to write {}", self.page.display()))?;
        tracing::info!(page = %self.page.display(), links = self.files.len(), "wrote links page");
        Ok(Delivery::LinksPage {
            page: self.page.clone(),
            links: self.files.len(),
        })
    }
}

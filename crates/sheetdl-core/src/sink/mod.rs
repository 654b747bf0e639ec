//! Destinations for fetched bytes.
//!
//! - [`DirectorySink`]: stream each file to `<dir>/<name>` (via a `.part` file).
//! - [`LinksSink`]: keep files in memory, then write an HTML page of data-URI links.
//! - [`ZipSink`]: keep files in memory, then write one ZIP archive (and optionally
//!   an HTML page linking to it as a data URI).
//!
//! A sink only keeps a file when its fill closure succeeds.

mod archive;
mod directory;
mod html;
mod links;
mod mime;

pub use archive::{build_archive, unique_entry_name, ZipSink};
pub use directory::DirectorySink;
pub use html::{data_uri, render_links_page};
pub use links::LinksSink;
pub use mime::{mime_for_filename, DEFAULT_MIME};

use anyhow::Result;
use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use crate::fetch::FetchError;

/// Writes one file's bytes into the writer the sink provides; returns the byte count.
pub type Fill<'a> = dyn FnMut(&mut dyn Write) -> Result<u64, FetchError> + 'a;

pub trait Sink {
    /// Store a file named `filename`, produced by `fill`.
    /// On error nothing is kept for this file.
    fn store(&mut self, filename: &str, fill: &mut Fill<'_>) -> Result<u64, FetchError>;

    /// Flush buffered output (pages, archives) once all rows are done.
    fn finish(&mut self) -> Result<Delivery>;
}

/// Where the run's files ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Directory {
        path: PathBuf,
        files: usize,
    },
    LinksPage {
        page: PathBuf,
        links: usize,
    },
    Archive {
        archive: PathBuf,
        page: Option<PathBuf>,
        entries: usize,
        bytes: u64,
    },
}

impl fmt::Display for Delivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delivery::Directory { path, files } => {
                write!(f, "{} file(s) downloaded to: {}", files, path.display())
            }
            Delivery::LinksPage { page, links } => {
                write!(f, "{} download link(s) written to: {}", links, page.display())
            }
            Delivery::Archive {
                archive,
                page,
                entries,
                bytes,
            } => {
                write!(
                    f,
                    "{} file(s) zipped into {} ({} bytes)",
                    entries,
                    archive.display(),
                    bytes
                )?;
                if let Some(page) = page {
                    write!(f, "; download link written to: {}", page.display())?;
                }
                Ok(())
            }
        }
    }
}

/// Buffers one file in memory; used by the in-memory sinks.
pub(crate) fn fill_buffer(fill: &mut Fill<'_>) -> Result<Vec<u8>, FetchError> {
    let mut buf = Vec::new();
    fill(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_display() {
        let d = Delivery::Archive {
            archive: PathBuf::from("/tmp/out.zip"),
            page: Some(PathBuf::from("/tmp/out.html")),
            entries: 2,
            bytes: 300,
        };
        assert_eq!(
            d.to_string(),
            "2 file(s) zipped into /tmp/out.zip (300 bytes); download link written to: /tmp/out.html"
        );
        let d = Delivery::Directory {
            path: PathBuf::from("./downloads"),
            files: 0,
        };
        assert_eq!(d.to_string(), "0 file(s) downloaded to: ./downloads");
    }
}

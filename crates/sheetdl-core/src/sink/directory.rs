//! Directory sink: one file per successful row.

use anyhow::Result;
use std::fs;
use std::io;
use std::path::PathBuf;

use super::{Delivery, Fill, Sink};
use crate::fetch::FetchError;
use crate::storage::{self, PartFile};

pub struct DirectorySink {
    dir: PathBuf,
    stored: usize,
}

impl DirectorySink {
    /// The directory is created on the first download, not here.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            stored: 0,
        }
    }
}

impl Sink for DirectorySink {
    fn store(&mut self, filename: &str, fill: &mut Fill<'_>) -> Result<u64, FetchError> {
        fs::create_dir_all(&self.dir)?;
        let final_path = self.dir.join(filename);
        let mut part = PartFile::create(&final_path)?;

        let size = match fill(&mut part) {
            Ok(n) => n,
            Err(e) => {
                part.discard();
                return Err(e);
            }
        };

        if let Err(e) = part.finalize(&final_path) {
            let temp_path = storage::temp_path(&final_path);
            if let Err(rm) = fs::remove_file(&temp_path) {
                if rm.kind() != io::ErrorKind::NotFound {
                    tracing::warn!("could not remove {}: {}", temp_path.display(), rm);
                }
            }
            return Err(FetchError::Other(format!("{:#}", e)));
        }
        self.stored += 1;
        tracing::debug!(path = %final_path.display(), size, "stored file");
        Ok(size)
    }

    fn finish(&mut self) -> Result<Delivery> {
        Ok(Delivery::Directory {
            path: self.dir.clone(),
            files: self.stored,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn success_creates_dir_and_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("out");
        let mut sink = DirectorySink::new(&dir);
        let n = sink
            .store("a.pdf", &mut |w: &mut dyn Write| {
                w.write_all(b"0123456789")?;
                Ok(10)
            })
            .unwrap();
        assert_eq!(n, 10);
        assert_eq!(fs::read(dir.join("a.pdf")).unwrap(), b"0123456789");
        assert!(!dir.join("a.pdf.part").exists());
        assert_eq!(
            sink.finish().unwrap(),
            Delivery::Directory {
                path: dir.clone(),
                files: 1
            }
        );
    }

    #[test]
    fn failure_leaves_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(tmp.path());
        let err = sink
            .store("b.pdf", &mut |w: &mut dyn Write| {
                w.write_all(b"partial")?;
                Err(FetchError::Other("connection dropped".to_string()))
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "Error: connection dropped");
        assert!(!tmp.path().join("b.pdf").exists());
        assert!(!tmp.path().join("b.pdf.part").exists());
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn unwritable_target_is_other_error() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("file-not-dir");
        fs::write(&blocker, b"x").unwrap();
        let mut sink = DirectorySink::new(&blocker);
        let err = sink
            .store("c.pdf", &mut |_w: &mut dyn Write| Ok(0))
            .unwrap_err();
        assert_eq!(err.kind(), crate::fetch::ErrorKind::Other);
        assert!(err.to_string().starts_with("Error: "));
    }

    #[test]
    fn failed_rename_removes_part_file() {
        let tmp = tempfile::tempdir().unwrap();
        // A non-empty directory under the final name makes the rename fail.
        fs::create_dir_all(tmp.path().join("d.pdf").join("inner")).unwrap();
        let mut sink = DirectorySink::new(tmp.path());
        let err = sink
            .store("d.pdf", &mut |w: &mut dyn Write| {
                w.write_all(b"body")?;
                Ok(4)
            })
            .unwrap_err();
        assert_eq!(err.kind(), crate::fetch::ErrorKind::Other);
        assert!(!tmp.path().join("d.pdf.part").exists());
        assert!(tmp.path().join("d.pdf").is_dir());
    }
}

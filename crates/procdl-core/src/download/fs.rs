//! Filesystem download sink: blobs staged as temp files, saved into a download directory.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tempfile::NamedTempFile;

use super::{Download, DownloadSink, ObjectUrl};
use crate::filename::numbered_name;

/// Give up looking for a free `name (n).ext` after this many attempts.
const MAX_NAME_ATTEMPTS: u32 = 10_000;

/// Saves downloads into `dir`, never overwriting an existing file.
#[derive(Debug)]
pub struct FsDownloadSink {
    dir: PathBuf,
    staging_dir: PathBuf,
    next_id: AtomicU64,
    staged: Mutex<HashMap<u64, NamedTempFile>>,
}

impl FsDownloadSink {
    /// Sink saving into `dir`, staging blobs in the system temp directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            staging_dir: std::env::temp_dir(),
            next_id: AtomicU64::new(1),
            staged: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_staging_dir(mut self, staging_dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = staging_dir.into();
        self
    }

    /// Number of blobs staged and not yet revoked.
    pub fn staged_count(&self) -> usize {
        self.staged.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Create the first free `filename`, `filename (1)`, ... in the download dir.
    fn create_unique(&self, filename: &str) -> io::Result<(PathBuf, File)> {
        for n in 0..MAX_NAME_ATTEMPTS {
            let path = self.dir.join(numbered_name(filename, n));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e),
            }
        }
        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free name for {} in {}", filename, self.dir.display()),
        ))
    }
}

impl DownloadSink for FsDownloadSink {
    fn create_object(&self, blob: Vec<u8>) -> io::Result<ObjectUrl> {
        let mut staged = tempfile::Builder::new()
            .prefix(".procdl-")
            .suffix(".blob")
            .tempfile_in(&self.staging_dir)?;
        staged.write_all(&blob)?;
        staged.flush()?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let object = ObjectUrl {
            id,
            location: staged.path().display().to_string(),
        };
        self.staged
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, staged);
        tracing::trace!(id, location = %object.location, "staged blob");
        Ok(object)
    }

    fn trigger(&self, object: &ObjectUrl, filename: &str) -> io::Result<Download> {
        let mut source = {
            let staged = self.staged.lock().unwrap_or_else(|e| e.into_inner());
            let blob = staged.get(&object.id).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("object {} was revoked", object.location),
                )
            })?;
            blob.reopen()?
        };

        fs::create_dir_all(&self.dir)?;
        let (path, mut dest) = self.create_unique(filename)?;
        let copied = io::copy(&mut source, &mut dest).and_then(|n| dest.sync_all().map(|_| n));
        match copied {
            Ok(bytes) => {
                tracing::debug!(path = %path.display(), bytes, "saved download");
                Ok(Download {
                    filename: filename.to_string(),
                    path,
                })
            }
            Err(e) => {
                drop(dest);
                let _ = fs::remove_file(&path);
                Err(e)
            }
        }
    }

    fn revoke(&self, object: &ObjectUrl) {
        let removed = self
            .staged
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&object.id);
        if removed.is_some() {
            tracing::trace!(id = object.id, "revoked blob");
        }
    }
}

//! Delivering a processed artifact: stage the blob, save it under its name, release it.
//!
//! The lifecycle mirrors a browser download driven from script: the blob gets a
//! temporary object URL, the download is triggered against that URL, and after a short
//! delay the URL is revoked so the blob can be freed.

mod fs;

pub use fs::FsDownloadSink;

use std::io;
use std::path::PathBuf;

/// Handle to a staged blob. Valid until passed to [`DownloadSink::revoke`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectUrl {
    pub id: u64,
    /// Where the blob can be resolved from (a path or URL, depending on the sink).
    pub location: String,
}

/// A response body paired with the name it should be saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    pub blob: Vec<u8>,
}

/// A completed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Name the download was requested under.
    pub filename: String,
    /// Where it ended up; the file name may carry a ` (n)` suffix if the name was taken.
    pub path: PathBuf,
}

pub trait DownloadSink: Send + Sync {
    /// Stage `blob` and return a handle to it.
    fn create_object(&self, blob: Vec<u8>) -> io::Result<ObjectUrl>;

    /// Save the staged blob as `filename`.
    fn trigger(&self, object: &ObjectUrl, filename: &str) -> io::Result<Download>;

    /// Release the staged blob. Unknown or already revoked handles are ignored.
    fn revoke(&self, object: &ObjectUrl);
}

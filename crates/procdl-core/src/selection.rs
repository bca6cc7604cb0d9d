//! Transient selection state read at click time: chosen files and the checked process type.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Where a selected file's bytes live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// Read by the transport when the request is sent.
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// One user-chosen file: the name it is uploaded under plus its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub source: FileSource,
}

impl SelectedFile {
    /// Select a file on disk; the upload name is the path's final component.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            name,
            source: FileSource::Path(path),
        }
    }

    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            source: FileSource::Bytes(bytes.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            FileSource::Path(p) => Some(p),
            FileSource::Bytes(_) => None,
        }
    }
}

/// Error from changing the process-type selection.
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("unknown process type {value:?} (expected one of: {})", .options.join(", "))]
    UnknownProcessType { value: String, options: Vec<String> },
}

/// A set of mutually exclusive process types with at most one checked.
///
/// Checking one option unchecks the previous one, like a radio group. The group is
/// shared between the click loop and whatever changes the selection, so the checked
/// value sits behind a lock.
#[derive(Debug)]
pub struct ProcessTypeGroup {
    options: Vec<String>,
    checked: RwLock<Option<String>>,
}

impl ProcessTypeGroup {
    /// New group with nothing checked.
    pub fn new<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
            checked: RwLock::new(None),
        }
    }

    /// New group with `checked` pre-selected (if given).
    pub fn with_checked<I, S>(options: I, checked: Option<&str>) -> Result<Self, SelectionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let group = Self::new(options);
        if let Some(value) = checked {
            group.check(value)?;
        }
        Ok(group)
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Check `value`, unchecking whatever was checked before.
    pub fn check(&self, value: &str) -> Result<(), SelectionError> {
        if !self.options.iter().any(|o| o == value) {
            return Err(SelectionError::UnknownProcessType {
                value: value.to_string(),
                options: self.options.clone(),
            });
        }
        let mut checked = self.checked.write().unwrap_or_else(|e| e.into_inner());
        *checked = Some(value.to_string());
        Ok(())
    }

    pub fn clear(&self) {
        let mut checked = self.checked.write().unwrap_or_else(|e| e.into_inner());
        *checked = None;
    }

    pub fn checked(&self) -> Option<String> {
        self.checked
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

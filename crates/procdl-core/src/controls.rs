//! Controls the upload handler reads from and reports to.
//!
//! The handler never reaches for global state: the file selection, the checked
//! process type and the user notification channel are injected as trait objects.

use std::io::Write;
use std::sync::RwLock;

use crate::selection::{ProcessTypeGroup, SelectedFile};

/// Source of the current file selection.
pub trait FileInput: Send + Sync {
    /// Files selected right now, in selection order.
    fn files(&self) -> Vec<SelectedFile>;
}

/// Source of the currently checked process type.
pub trait ProcessTypeInput: Send + Sync {
    fn checked_value(&self) -> Option<String>;
}

/// Blocking user notification.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

impl ProcessTypeInput for ProcessTypeGroup {
    fn checked_value(&self) -> Option<String> {
        self.checked()
    }
}

/// File selection held in memory and replaceable between clicks.
#[derive(Debug, Default)]
pub struct SelectionInput {
    files: RwLock<Vec<SelectedFile>>,
}

impl SelectionInput {
    pub fn new(files: Vec<SelectedFile>) -> Self {
        Self {
            files: RwLock::new(files),
        }
    }

    /// Replace the whole selection.
    pub fn select(&self, files: Vec<SelectedFile>) {
        *self.files.write().unwrap_or_else(|e| e.into_inner()) = files;
    }
}

impl FileInput for SelectionInput {
    fn files(&self) -> Vec<SelectedFile> {
        self.files.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

/// Prints alerts to stderr, one line each.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn alert(&self, message: &str) {
        let mut err = std::io::stderr().lock();
        let _ = writeln!(err, "{}", message);
        let _ = err.flush();
    }
}

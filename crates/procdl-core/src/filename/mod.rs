//! Download filename resolution.
//!
//! The name of a processed artifact comes from the response's Content-Disposition
//! header when it carries one, otherwise from the first uploaded file. Either way it
//! is sanitized before it touches the filesystem.

mod content_disposition;
mod sanitize;

pub use content_disposition::extract_filename;
pub use sanitize::sanitize_filename;
use sanitize::{split_short_extension, truncate_at_char_boundary, NAME_MAX};

/// Name used when neither the header nor the fallback yields anything usable.
pub const DEFAULT_FILENAME: &str = "download.bin";

/// Where a resolved filename came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilenameSource {
    ContentDisposition,
    Fallback,
    Default,
}

/// Resolves the name a downloaded artifact is saved under.
///
/// # Examples
///
/// - `resolve_filename(Some("attachment; filename=\"report.pdf\""), "in.xlsx")` → `"report.pdf"`
/// - `resolve_filename(None, "in.xlsx")` → `"in.xlsx"`
pub fn resolve_filename(content_disposition: Option<&str>, fallback: &str) -> String {
    resolve_filename_with_source(content_disposition, fallback).0
}

/// Like [`resolve_filename`], also reporting which candidate was used.
pub fn resolve_filename_with_source(
    content_disposition: Option<&str>,
    fallback: &str,
) -> (String, FilenameSource) {
    let from_header = content_disposition
        .and_then(extract_filename)
        .map(|raw| sanitize_filename(&raw))
        .filter(|s| usable(s));
    if let Some(name) = from_header {
        return (name, FilenameSource::ContentDisposition);
    }

    let fallback = sanitize_filename(fallback);
    if usable(&fallback) {
        (fallback, FilenameSource::Fallback)
    } else {
        (DEFAULT_FILENAME.to_string(), FilenameSource::Default)
    }
}

fn usable(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".."
}

/// The `n`th alternative for a taken name: `report.pdf` → `report (n).pdf`.
///
/// `n == 0` returns the name unchanged. The stem is shortened when needed so the
/// result still fits in 255 bytes.
pub fn numbered_name(name: &str, n: u32) -> String {
    if n == 0 {
        return name.to_string();
    }
    let suffix = format!(" ({})", n);
    let (stem, ext) = match name.rfind('.') {
        Some(dot) if dot > 0 => name.split_at(dot),
        _ => (name, ""),
    };
    if stem.len() + suffix.len() + ext.len() <= NAME_MAX {
        return format!("{}{}{}", stem, suffix, ext);
    }

    let (stem, ext) = split_short_extension(name);
    let stem = truncate_at_char_boundary(stem, NAME_MAX - suffix.len() - ext.len());
    format!("{}{}{}", stem, suffix, ext)
}

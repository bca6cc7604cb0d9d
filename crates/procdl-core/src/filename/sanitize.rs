//! Filesystem-safe download names.

/// Longest file name most filesystems accept, in bytes.
pub(crate) const NAME_MAX: usize = 255;

/// Sanitizes a server- or user-supplied filename for saving in the download directory.
///
/// - Replaces path separators, NUL, control characters and `<>:"|?*` with `_`
/// - Trims leading/trailing whitespace and dots
/// - Limits length to 255 bytes, keeping the extension when there is one
///
/// Interior spaces are kept, so `sgr - stock.xlsx` stays readable.
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '<' | '>' | ':' | '"' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = replaced.trim_matches(|c: char| c.is_whitespace() || c == '.');
    truncate_keeping_extension(trimmed, NAME_MAX)
}

fn truncate_keeping_extension(name: &str, max: usize) -> String {
    if name.len() <= max {
        return name.to_string();
    }

    let (stem, ext) = split_short_extension(name);
    format!("{}{}", truncate_at_char_boundary(stem, max - ext.len()), ext)
}

/// `("report", ".pdf")`; extensions longer than 16 bytes count as part of the stem.
pub(crate) fn split_short_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(dot) if dot > 0 && name.len() - dot <= 16 => name.split_at(dot),
        _ => (name, ""),
    }
}

pub(crate) fn truncate_at_char_boundary(s: &str, max: usize) -> &str {
    let mut take = max.min(s.len());
    while take > 0 && !s.is_char_boundary(take) {
        take -= 1;
    }
    &s[..take]
}

//! Content-Disposition filename extraction (filename and filename*).

use once_cell::sync::Lazy;
use regex::Regex;

/// Lenient pattern: optional `*`, optional opening quote, optional `UTF-<n>` charset
/// prefix with its trailing quotes, then everything up to `;`, CR, LF or a quote.
static FILENAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)filename(\*)?=['"]?(?:UTF-\d['"]*)?([^;\r\n"']*)['"]?;?"#)
        .expect("filename pattern is valid")
});

/// Extracts the filename from a raw Content-Disposition header value.
///
/// Accepts quoted, bare and RFC 5987 (`filename*=UTF-8''...`) forms, and tolerates
/// headers that don't quite follow RFC 6266. Extended values are percent-decoded;
/// decoding is lossy and never fails. If both `filename` and `filename*` are present,
/// `filename*` wins. An empty value counts as absent.
pub fn extract_filename(header_value: &str) -> Option<String> {
    let mut plain: Option<String> = None;

    for caps in FILENAME_RE.captures_iter(header_value) {
        let value = match caps.get(2) {
            Some(m) if !m.as_str().is_empty() => m.as_str(),
            _ => continue,
        };

        if caps.get(1).is_some() {
            let decoded = percent_decode(value);
            if !decoded.is_empty() {
                return Some(decoded);
            }
        } else if plain.is_none() {
            plain = Some(value.to_string());
        }
    }

    plain
}

/// Percent-decode an extended parameter value. Malformed escapes are kept verbatim.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(high), Some(low)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                out.push(high << 4 | low);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

//! Collect libcurl header lines into the final response's status and headers.

use std::borrow::Cow;

/// Status and headers of the last response seen on a transfer.
///
/// libcurl reports headers for every response on the connection (interim
/// `100 Continue`, redirects); a new status line starts over.
#[derive(Debug, Default, Clone)]
pub struct ResponseHeaders {
    pub status: Option<u32>,
    pub headers: Vec<(String, String)>,
}

impl ResponseHeaders {
    /// Push a raw header line as delivered by libcurl.
    pub fn push_bytes(&mut self, data: &[u8]) {
        self.push_line(&decode_line(data));
    }

    pub fn push_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        if line.starts_with("HTTP/") {
            self.status = line
                .split_whitespace()
                .nth(1)
                .and_then(|code| code.parse::<u32>().ok());
            self.headers.clear();
            return;
        }
        if let Some((name, value)) = line.split_once(':') {
            self.headers
                .push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, Some(200..=299))
    }
}

/// Header bytes as text: UTF-8 when valid, otherwise one char per byte (ISO-8859-1).
fn decode_line(data: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(data) {
        Ok(s) => Cow::Borrowed(s),
        Err(_) => Cow::Owned(data.iter().map(|&b| char::from(b)).collect()),
    }
}

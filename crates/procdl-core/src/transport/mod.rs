//! Upload transport: POST a multipart form, get back status, headers and body.
//!
//! The handler only sees the [`Transport`] trait; [`CurlTransport`] is the libcurl
//! implementation used by the CLI.

mod easy;
mod parse;

pub use easy::CurlTransport;
pub use parse::ResponseHeaders;

use std::path::PathBuf;

use crate::form::UploadForm;

/// Failure to get an HTTP response at all.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("{0}")]
    Curl(#[from] curl::Error),
    #[error("building form: {0}")]
    Form(#[from] curl::FormError),
    #[error("invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("request task aborted: {0}")]
    Aborted(String),
}

/// A received HTTP response. `body` is left empty for non-2xx statuses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u32,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_disposition(&self) -> Option<&str> {
        self.header("content-disposition")
    }
}

/// Sends an upload form to an endpoint of the processing service.
///
/// Implementations block; the handler calls them from tokio's blocking pool.
pub trait Transport: Send + Sync {
    fn post_form(&self, endpoint: &str, form: &UploadForm) -> Result<HttpResponse, TransportError>;
}

//! libcurl (easy interface) implementation of [`Transport`].

use std::cell::RefCell;
use std::time::Duration;

use curl::easy::{Easy, Form, List};
use url::Url;

use super::{HttpResponse, ResponseHeaders, Transport, TransportError};
use crate::config::ProcdlConfig;
use crate::form::{FormPart, UploadForm};
use crate::selection::FileSource;

/// POSTs upload forms to a processing service with libcurl.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    base: Url,
    connect_timeout: Duration,
    timeout: Option<Duration>,
}

impl CurlTransport {
    pub fn new(server_url: &str) -> Result<Self, TransportError> {
        Ok(Self {
            base: Url::parse(server_url)?,
            connect_timeout: Duration::from_secs(15),
            timeout: None,
        })
    }

    pub fn from_config(cfg: &ProcdlConfig) -> Result<Self, TransportError> {
        let mut t = Self::new(&cfg.server_url)?;
        t.connect_timeout = cfg.connect_timeout();
        t.timeout = cfg.request_timeout();
        Ok(t)
    }

    /// Absolute URL for `endpoint` on this server.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url, TransportError> {
        Ok(self.base.join(endpoint)?)
    }
}

/// Translate an [`UploadForm`] into a libcurl multipart form.
fn build_form(form: &UploadForm) -> Result<Form, TransportError> {
    let mut out = Form::new();
    for part in form.parts() {
        match part {
            FormPart::File {
                field,
                filename,
                source,
            } => match source {
                FileSource::Path(path) => {
                    // Fail before connecting rather than mid-upload.
                    std::fs::metadata(path).map_err(|source| TransportError::File {
                        path: path.clone(),
                        source,
                    })?;
                    out.part(field).file(path).filename(filename.as_str()).add()?;
                }
                FileSource::Bytes(bytes) => {
                    out.part(field)
                        .buffer(filename.as_str(), bytes.clone())
                        .add()?;
                }
            },
            FormPart::Field { name, value } => {
                out.part(name).contents(value.as_bytes()).add()?;
            }
        }
    }
    Ok(out)
}

impl Transport for CurlTransport {
    fn post_form(&self, endpoint: &str, form: &UploadForm) -> Result<HttpResponse, TransportError> {
        let url = self.endpoint_url(endpoint)?;

        let mut easy = Easy::new();
        easy.url(url.as_str())?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.connect_timeout)?;
        if let Some(timeout) = self.timeout {
            easy.timeout(timeout)?;
        }

        // No `Expect: 100-continue` round trip for large uploads.
        let mut list = List::new();
        list.append("Expect:")?;
        easy.http_headers(list)?;
        easy.httppost(build_form(form)?)?;

        let head = RefCell::new(ResponseHeaders::default());
        let mut body = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                head.borrow_mut().push_bytes(data);
                true
            })?;
            transfer.write_function(|data| {
                // Error bodies are drained but never kept.
                if head.borrow().is_success() {
                    body.extend_from_slice(data);
                }
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        let head = head.into_inner();
        let response = HttpResponse {
            status,
            headers: head.headers,
            body: if (200..300).contains(&status) {
                body
            } else {
                Vec::new()
            },
        };
        tracing::debug!(
            url = %url,
            status = response.status,
            bytes = response.body.len(),
            "upload finished"
        );
        Ok(response)
    }
}

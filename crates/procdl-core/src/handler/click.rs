//! A single click: validate, upload, resolve the name, deliver.

use std::io;
use std::sync::Arc;

use super::{SubmitError, UploadHandler};
use crate::download::{Artifact, Download};
use crate::filename::{resolve_filename_with_source, FilenameSource};
use crate::form::UploadForm;
use crate::selection::SelectedFile;
use crate::transport::{HttpResponse, TransportError};

impl UploadHandler {
    /// Run one click to completion.
    ///
    /// An empty selection or an unchecked process type alerts once and returns
    /// without sending anything. A transport error or non-2xx status is logged,
    /// alerted once, and nothing is downloaded. On success the saved download is
    /// returned after its staged object has been revoked.
    pub async fn handle_click(&self) -> Result<Download, SubmitError> {
        let files = self.file_input.files();
        if files.is_empty() {
            return Err(self.reject(SubmitError::NoFilesSelected));
        }
        let process_type = match self.process_type.checked_value() {
            Some(value) => value,
            None => return Err(self.reject(SubmitError::NoProcessTypeSelected)),
        };

        match self.submit(&files, &process_type).await {
            Ok(download) => Ok(download),
            Err(err) => {
                tracing::error!(error = %err, "Error processing file");
                self.notifier
                    .alert(&format!("Error processing file: {}", err));
                Err(err)
            }
        }
    }

    fn reject(&self, err: SubmitError) -> SubmitError {
        tracing::debug!(reason = %err, "click rejected before upload");
        self.notifier.alert(&err.to_string());
        err
    }

    async fn submit(
        &self,
        files: &[SelectedFile],
        process_type: &str,
    ) -> Result<Download, SubmitError> {
        let form = UploadForm::new(files, process_type);
        let transport = Arc::clone(&self.transport);
        let endpoint = self.settings.endpoint.clone();
        tracing::info!(
            files = files.len(),
            process_type,
            endpoint = %endpoint,
            "uploading selection"
        );

        let response = tokio::task::spawn_blocking(move || transport.post_form(&endpoint, &form))
            .await
            .map_err(|e| TransportError::Aborted(e.to_string()))??;
        if !response.is_success() {
            return Err(SubmitError::Http(response.status));
        }

        let artifact = into_artifact(response, files);
        self.deliver(artifact).await
    }

    /// Stage the blob, save it, and revoke the staged object after the cleanup delay.
    ///
    /// Staging and saving touch the filesystem, so both run on the blocking pool.
    async fn deliver(&self, artifact: Artifact) -> Result<Download, SubmitError> {
        let Artifact { filename, blob } = artifact;
        let sink = Arc::clone(&self.sink);
        let object = blocking(move || sink.create_object(blob)).await?;

        let sink = Arc::clone(&self.sink);
        let staged = object.clone();
        match blocking(move || sink.trigger(&staged, &filename)).await {
            Ok(download) => {
                tokio::time::sleep(self.settings.cleanup_delay).await;
                self.sink.revoke(&object);
                tracing::info!(path = %download.path.display(), "download saved");
                Ok(download)
            }
            Err(e) => {
                self.sink.revoke(&object);
                Err(e)
            }
        }
    }
}

/// Run a blocking sink call off the async workers.
async fn blocking<T, F>(f: F) -> Result<T, SubmitError>
where
    F: FnOnce() -> io::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| SubmitError::Delivery(io::Error::new(io::ErrorKind::Other, e)))?
        .map_err(SubmitError::Delivery)
}

/// Pair the response body with its resolved filename.
///
/// `files` is non-empty; its first entry is the fallback name.
fn into_artifact(response: HttpResponse, files: &[SelectedFile]) -> Artifact {
    let fallback = files.first().map(|f| f.name.as_str()).unwrap_or_default();
    let (filename, source) = resolve_filename_with_source(response.content_disposition(), fallback);
    match source {
        FilenameSource::ContentDisposition => {
            tracing::debug!(filename = %filename, "extracted filename from Content-Disposition");
        }
        FilenameSource::Fallback | FilenameSource::Default if files.len() > 1 => {
            tracing::warn!(
                files = files.len(),
                filename = %filename,
                "no filename in response; naming the result after the first of several inputs"
            );
        }
        FilenameSource::Fallback | FilenameSource::Default => {}
    }
    Artifact {
        filename,
        blob: response.body,
    }
}

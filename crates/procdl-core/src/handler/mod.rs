//! Upload-and-download handler.
//!
//! [`UploadHandler::setup`] checks that the required controls exist and binds the
//! handler to its trigger. Every click then runs independently: read the selection,
//! POST it, resolve the output name, save the result. See [`UploadHandler::handle_click`].

mod click;
mod run;

pub use run::{BoundHandler, ClickOutcome};

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::config::ProcdlConfig;
use crate::controls::{FileInput, Notifier, ProcessTypeInput};
use crate::download::DownloadSink;
use crate::transport::{Transport, TransportError};

/// One activation of the submit trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Click;

/// Error binding the handler to its controls.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("required control not found: {0}")]
    MissingControl(&'static str),
}

/// Why a click didn't produce a download.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Please select a file.")]
    NoFilesSelected,
    #[error("Please select a process type.")]
    NoProcessTypeSelected,
    #[error("{0}")]
    Transport(#[from] TransportError),
    #[error("network response was not OK (HTTP {0})")]
    Http(u32),
    #[error("saving download: {0}")]
    Delivery(#[source] std::io::Error),
}

impl SubmitError {
    /// True if the click was refused before anything was sent.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            SubmitError::NoFilesSelected | SubmitError::NoProcessTypeSelected
        )
    }
}

/// Everything the handler reads from or acts on.
///
/// `file_input` and `trigger` are the controls that must be present for the handler
/// to bind at all; the rest are always supplied by the host.
pub struct HandlerControls {
    pub file_input: Option<Arc<dyn FileInput>>,
    pub trigger: Option<mpsc::Receiver<Click>>,
    pub process_type: Arc<dyn ProcessTypeInput>,
    pub notifier: Arc<dyn Notifier>,
    pub transport: Arc<dyn Transport>,
    pub sink: Arc<dyn DownloadSink>,
}

/// Request target and cleanup timing.
#[derive(Debug, Clone)]
pub struct HandlerSettings {
    /// Path the form is POSTed to.
    pub endpoint: String,
    /// Delay between triggering a download and revoking its object.
    pub cleanup_delay: Duration,
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            endpoint: "/process".to_string(),
            cleanup_delay: Duration::from_millis(100),
        }
    }
}

impl From<&ProcdlConfig> for HandlerSettings {
    fn from(cfg: &ProcdlConfig) -> Self {
        Self {
            endpoint: cfg.endpoint.clone(),
            cleanup_delay: cfg.cleanup_delay(),
        }
    }
}

/// Stateless per-click logic. Cheap to clone; clones share the same controls.
#[derive(Clone)]
pub struct UploadHandler {
    file_input: Arc<dyn FileInput>,
    process_type: Arc<dyn ProcessTypeInput>,
    notifier: Arc<dyn Notifier>,
    transport: Arc<dyn Transport>,
    sink: Arc<dyn DownloadSink>,
    settings: HandlerSettings,
}

impl UploadHandler {
    /// Bind a handler to `controls`.
    ///
    /// Fails without binding anything if the file input or the trigger is missing.
    pub fn setup(
        controls: HandlerControls,
        settings: HandlerSettings,
    ) -> Result<BoundHandler, SetupError> {
        let HandlerControls {
            file_input,
            trigger,
            process_type,
            notifier,
            transport,
            sink,
        } = controls;

        let (file_input, trigger) = match (file_input, trigger) {
            (Some(f), Some(t)) => (f, t),
            (None, _) => return Err(missing("file input")),
            (_, None) => return Err(missing("submit trigger")),
        };

        let handler = UploadHandler {
            file_input,
            process_type,
            notifier,
            transport,
            sink,
            settings,
        };
        tracing::debug!(endpoint = %handler.settings.endpoint, "upload handler bound");
        Ok(BoundHandler::new(handler, trigger))
    }
}

fn missing(control: &'static str) -> SetupError {
    tracing::error!(
        control,
        "required control not found; the upload handler was not bound"
    );
    SetupError::MissingControl(control)
}

//! Wire a handler from config + command-line overrides.

use anyhow::{Context, Result};
use procdl_core::config::ProcdlConfig;
use procdl_core::controls::{SelectionInput, StderrNotifier};
use procdl_core::download::FsDownloadSink;
use procdl_core::handler::{
    BoundHandler, Click, HandlerControls, HandlerSettings, UploadHandler,
};
use procdl_core::selection::{ProcessTypeGroup, SelectedFile};
use procdl_core::transport::CurlTransport;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::UploadArgs;

/// Clicks queued before the handler picks them up.
const TRIGGER_CAPACITY: usize = 32;

/// A bound handler plus the controls the caller keeps driving.
pub struct Bound {
    pub handler: BoundHandler,
    pub trigger: mpsc::Sender<Click>,
    pub files: Arc<SelectionInput>,
    pub process_types: Arc<ProcessTypeGroup>,
    pub download_dir: PathBuf,
}

pub fn download_dir(cfg: &ProcdlConfig, args: &UploadArgs) -> Result<PathBuf> {
    match args.output_dir.clone().or_else(|| cfg.download_dir.clone()) {
        Some(dir) => Ok(dir),
        None => std::env::current_dir().context("current directory"),
    }
}

pub fn bind(cfg: &ProcdlConfig, args: &UploadArgs) -> Result<Bound> {
    let checked = args
        .process_type
        .as_deref()
        .or(cfg.default_process_type.as_deref());
    let process_types = Arc::new(
        ProcessTypeGroup::with_checked(cfg.process_types.iter().cloned(), checked)
            .context("process type")?,
    );

    let mut cfg = cfg.clone();
    if let Some(server) = &args.server {
        cfg.server_url = server.clone();
    }
    let transport = CurlTransport::from_config(&cfg)
        .with_context(|| format!("server URL {}", cfg.server_url))?;

    let download_dir = download_dir(&cfg, args)?;
    let files = Arc::new(SelectionInput::new(
        args.files.iter().map(SelectedFile::from_path).collect(),
    ));
    let (trigger, rx) = mpsc::channel(TRIGGER_CAPACITY);

    let handler = UploadHandler::setup(
        HandlerControls {
            file_input: Some(files.clone()),
            trigger: Some(rx),
            process_type: process_types.clone(),
            notifier: Arc::new(StderrNotifier),
            transport: Arc::new(transport),
            sink: Arc::new(FsDownloadSink::new(&download_dir)),
        },
        HandlerSettings::from(&cfg),
    )?;
    tracing::info!(
        server = %cfg.server_url,
        download_dir = %download_dir.display(),
        "handler ready"
    );

    Ok(Bound {
        handler,
        trigger,
        files,
        process_types,
        download_dir,
    })
}

//! `procdl submit`: one upload, one result.

use anyhow::{Context, Result};
use procdl_core::config::ProcdlConfig;
use procdl_core::handler::{Click, ClickOutcome};
use std::process::ExitCode;

use crate::cli::bind::{bind, Bound};
use crate::cli::UploadArgs;

pub async fn run_submit(cfg: &ProcdlConfig, args: &UploadArgs) -> Result<ExitCode> {
    let Bound {
        handler, trigger, ..
    } = bind(cfg, args)?;

    trigger
        .send(Click)
        .await
        .context("submit trigger closed")?;
    drop(trigger);

    let mut code = ExitCode::FAILURE;
    for outcome in handler.run().await {
        match outcome {
            ClickOutcome::Downloaded(download) => {
                println!("{}", download.path.display());
                code = ExitCode::SUCCESS;
            }
            // Already alerted on stderr.
            ClickOutcome::Rejected(err) | ClickOutcome::Failed(err) => {
                tracing::debug!(error = %err, "submit did not produce a download");
            }
        }
    }
    Ok(code)
}

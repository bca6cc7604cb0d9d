//! Trigger loop: every click becomes its own task.

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};

use super::{Click, SubmitError, UploadHandler};
use crate::download::Download;
use crate::transport::TransportError;

/// How a click ended.
#[derive(Debug)]
pub enum ClickOutcome {
    Downloaded(Download),
    /// Refused before sending (nothing selected).
    Rejected(SubmitError),
    Failed(SubmitError),
}

impl ClickOutcome {
    fn from_result(result: Result<Result<Download, SubmitError>, JoinError>) -> Self {
        match result {
            Ok(Ok(download)) => ClickOutcome::Downloaded(download),
            Ok(Err(err)) if err.is_rejection() => ClickOutcome::Rejected(err),
            Ok(Err(err)) => ClickOutcome::Failed(err),
            Err(join) => {
                tracing::error!(error = %join, "click task did not complete");
                ClickOutcome::Failed(SubmitError::Transport(TransportError::Aborted(
                    join.to_string(),
                )))
            }
        }
    }

    pub fn download(&self) -> Option<&Download> {
        match self {
            ClickOutcome::Downloaded(d) => Some(d),
            _ => None,
        }
    }
}

/// A handler bound to its trigger.
pub struct BoundHandler {
    handler: UploadHandler,
    trigger: mpsc::Receiver<Click>,
}

impl BoundHandler {
    pub(super) fn new(handler: UploadHandler, trigger: mpsc::Receiver<Click>) -> Self {
        Self { handler, trigger }
    }

    pub fn handler(&self) -> &UploadHandler {
        &self.handler
    }

    /// Process clicks until the trigger closes and every started click has finished.
    ///
    /// Clicks are not serialized: a click arriving while another is in flight starts
    /// a second, independent upload. Outcomes are returned in completion order.
    pub async fn run(self) -> Vec<ClickOutcome> {
        let mut outcomes = Vec::new();
        self.run_with(|o| outcomes.push(o)).await;
        outcomes
    }

    /// Like [`run`](Self::run), handing each outcome to `on_outcome` as it completes.
    pub async fn run_with<F>(self, mut on_outcome: F)
    where
        F: FnMut(ClickOutcome),
    {
        let BoundHandler {
            handler,
            mut trigger,
        } = self;
        let mut clicks: JoinSet<Result<Download, SubmitError>> = JoinSet::new();
        let mut started = 0u64;

        loop {
            tokio::select! {
                click = trigger.recv() => match click {
                    Some(Click) => {
                        started += 1;
                        tracing::debug!(click = started, in_flight = clicks.len(), "click");
                        let h = handler.clone();
                        clicks.spawn(async move { h.handle_click().await });
                    }
                    None => break,
                },
                Some(done) = clicks.join_next(), if !clicks.is_empty() => {
                    on_outcome(ClickOutcome::from_result(done));
                }
            }
        }

        while let Some(done) = clicks.join_next().await {
            on_outcome(ClickOutcome::from_result(done));
        }
        tracing::debug!(clicks = started, "trigger closed");
    }
}

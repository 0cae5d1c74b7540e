use std::cell::Cell;
use std::panic::AssertUnwindSafe;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use futures_util::FutureExt;
use summarizer_logging::{app_debug, app_error, app_info, app_warn};
use thiserror::Error;

use crate::client::{ClientSettings, ReqwestSummaryClient, SummaryClient};
use crate::{EngineEvent, FailureKind, RequestError, SubmissionId};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to build http client: {0}")]
    Client(#[from] RequestError),
    #[error("failed to spawn engine thread: {0}")]
    Thread(String),
}

enum EngineCommand {
    Summarize {
        submission_id: SubmissionId,
        url: String,
    },
}

/// Runs summarization requests on a background tokio runtime.
///
/// Commands go in through [`EngineHandle::submit`]; completions come back
/// through [`EngineHandle::try_recv`] / [`EngineHandle::recv_timeout`] in the
/// order they resolve. Every accepted submission yields exactly one
/// `SubmissionCompleted`, even if the client panics. Dropping the handle stops
/// the worker thread and abandons requests still in flight.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    stopped: Cell<bool>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, EngineError> {
        let client = ReqwestSummaryClient::new(settings)?;
        Self::with_client(Arc::new(client))
    }

    pub fn with_client(client: Arc<dyn SummaryClient>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .thread_name("summarizer-engine")
            .build()?;

        thread::Builder::new()
            .name("summarizer-engine-cmd".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let client = client.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(client.as_ref(), command, event_tx).await;
                    });
                }
                app_debug!("Engine command channel closed");
                // The event receiver went with the handle; nobody can observe
                // in-flight completions any more.
                runtime.shutdown_background();
            })
            .map_err(|err| EngineError::Thread(err.to_string()))?;

        Ok(Self {
            cmd_tx,
            event_rx,
            stopped: Cell::new(false),
        })
    }

    pub fn submit(&self, submission_id: SubmissionId, url: impl Into<String>) {
        let url = url.into();
        if self
            .cmd_tx
            .send(EngineCommand::Summarize { submission_id, url })
            .is_err()
        {
            app_warn!("Engine stopped; submission {} was not sent", submission_id);
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        match self.event_rx.try_recv() {
            Ok(event) => Some(event),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                self.mark_stopped();
                None
            }
        }
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(mpsc::RecvTimeoutError::Timeout) => None,
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                self.mark_stopped();
                None
            }
        }
    }

    /// True once the worker thread is gone and no further events can arrive.
    ///
    /// Only detected by a receive call; a fresh handle reports `false`.
    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }

    fn mark_stopped(&self) {
        if !self.stopped.replace(true) {
            app_error!("Engine worker stopped; no more completions will arrive");
        }
    }
}

async fn handle_command(
    client: &dyn SummaryClient,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Summarize { submission_id, url } => {
            let result = match AssertUnwindSafe(client.summarize(&url)).catch_unwind().await {
                Ok(result) => result,
                Err(_) => {
                    app_error!("Submission {} request task panicked", submission_id);
                    Err(RequestError::new(FailureKind::Network, "request task failed"))
                }
            };
            match &result {
                Ok(_) => app_info!("Submission {} summarized", submission_id),
                Err(err) => app_warn!("Submission {} failed: {}", submission_id, err),
            }
            let _ = event_tx.send(EngineEvent::SubmissionCompleted {
                submission_id,
                result,
            });
        }
    }
}

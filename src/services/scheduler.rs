use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::services::completion_worker::{CompletionJob, CompletionWorker};

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("completion queue is closed, job for {0} dropped")]
    Closed(String),
}

/// Publishing side of the completion queue, held by the intake gate.
#[derive(Clone, Debug)]
pub struct CompletionScheduler {
    sender: mpsc::UnboundedSender<CompletionJob>,
}

impl CompletionScheduler {
    /// Hands the job off without waiting for it. On failure the job, and with
    /// it the registry entry, is dropped.
    pub fn schedule(&self, job: CompletionJob) -> Result<(), SchedulerError> {
        self.sender
            .send(job)
            .map_err(|mpsc::error::SendError(job)| {
                SchedulerError::Closed(job.transaction_id().to_string())
            })
    }
}

/// Drains the completion queue, giving every job its own task.
pub struct CompletionDispatcher {
    receiver: mpsc::UnboundedReceiver<CompletionJob>,
    worker: CompletionWorker,
}

pub fn completion_queue(worker: CompletionWorker) -> (CompletionScheduler, CompletionDispatcher) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (
        CompletionScheduler { sender },
        CompletionDispatcher { receiver, worker },
    )
}

impl CompletionDispatcher {
    /// Runs until every scheduler handle is dropped.
    pub async fn run(mut self) {
        info!("Completion dispatcher started");
        while let Some(job) = self.receiver.recv().await {
            let worker = self.worker.clone();
            let id = job.transaction_id().to_string();
            let handle = tokio::spawn(async move { worker.complete(job).await });
            tokio::spawn(async move {
                if let Err(e) = handle.await {
                    error!(transaction_id = %id, error = %e, "Completion task aborted");
                }
            });
        }
        info!("Completion dispatcher stopped");
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

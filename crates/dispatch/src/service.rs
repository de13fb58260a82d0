//! Detached dispatch worker.
//!
//! Business operations enqueue a request and return immediately; a single
//! worker task drains the bounded queue and runs the fan-out. `shutdown`
//! closes the queue and waits for in-flight work, so process termination
//! drains instead of dropping.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use herald_common::types::{NotificationContext, NotificationKind};

use crate::dispatcher::Dispatcher;

/// One queued notification event.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    pub kind: NotificationKind,
    pub context: NotificationContext,
    /// Bypasses the participant lookup when set; eligibility is still checked.
    pub explicit_recipients: Option<Vec<Uuid>>,
}

pub struct DispatchService {
    tx: mpsc::Sender<DispatchRequest>,
    worker: JoinHandle<()>,
}

impl DispatchService {
    /// Spawn the worker. `queue_depth` bounds how many requests may be
    /// outstanding before enqueues start dropping.
    pub fn spawn(dispatcher: Dispatcher, queue_depth: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<DispatchRequest>(queue_depth.max(1));
        let worker = tokio::spawn(async move {
            while let Some(request) = rx.recv().await {
                let result = dispatcher
                    .dispatch(
                        request.kind,
                        &request.context,
                        request.explicit_recipients.as_deref(),
                    )
                    .await;
                if let Err(e) = result {
                    tracing::warn!(kind = %request.kind, error = %e, "Dispatch failed");
                }
            }
            tracing::info!("Dispatch worker drained");
        });

        Self { tx, worker }
    }

    /// Fire-and-forget enqueue. A full or closed queue drops the request with
    /// a warning; the triggering business operation is never delayed or failed
    /// by notification problems.
    pub fn enqueue(&self, request: DispatchRequest) {
        if let Err(e) = self.tx.try_send(request) {
            tracing::warn!(error = %e, "Dispatch queue full or closed; notification dropped");
        }
    }

    /// Close the queue and wait for outstanding dispatches to finish.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(e) = self.worker.await {
            tracing::warn!(error = %e, "Dispatch worker terminated abnormally");
        }
    }
}

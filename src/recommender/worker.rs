//! Request Worker Thread
//!
//! Runs recommendation requests on a background thread with its own tokio
//! runtime so the UI never blocks on the network. Receives requests via
//! channel and sends exactly one response per request back to the UI thread.

use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle as TaskHandle;
use tokio_util::sync::CancellationToken;

use super::client::RecommendClient;
use super::recommender_state::{RecommendRequest, RecommendResponse};
use crate::error::RecommendError;

/// Spawn the request worker thread
///
/// The runtime is built before the thread starts so setup failures surface
/// to the caller. The thread exits once the request channel is closed.
pub fn spawn_worker(
    client: RecommendClient,
    request_rx: UnboundedReceiver<RecommendRequest>,
    response_tx: Sender<RecommendResponse>,
) -> std::io::Result<JoinHandle<()>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    std::thread::Builder::new()
        .name("cfrec-worker".to_string())
        .spawn(move || {
            runtime.block_on(worker_loop(client, request_rx, response_tx));
        })
}

/// The request currently owned by the worker
struct InFlight {
    request_id: u64,
    token: CancellationToken,
    task: TaskHandle<()>,
}

impl InFlight {
    /// Cancel the request if it is still running
    ///
    /// Returns the request id when there was something to cancel.
    fn cancel_if_running(&self) -> Option<u64> {
        if self.task.is_finished() || self.token.is_cancelled() {
            return None;
        }
        self.token.cancel();
        Some(self.request_id)
    }
}

/// Main worker loop - processes requests until the channel is closed
///
/// At most one request is live: a new `Fetch` cancels the previous one
/// before starting.
async fn worker_loop(
    client: RecommendClient,
    mut request_rx: UnboundedReceiver<RecommendRequest>,
    response_tx: Sender<RecommendResponse>,
) {
    let client = Arc::new(client);
    let mut in_flight: Option<InFlight> = None;

    while let Some(request) = request_rx.recv().await {
        match request {
            RecommendRequest::Fetch { handle, request_id } => {
                if let Some(previous_id) = in_flight
                    .take()
                    .and_then(|previous| previous.cancel_if_running())
                {
                    log::debug!(
                        "Request {} superseded by request {}",
                        previous_id,
                        request_id
                    );
                }

                let token = CancellationToken::new();
                let task_token = token.clone();
                let client = Arc::clone(&client);
                let response_tx = response_tx.clone();
                let task = tokio::spawn(async move {
                    let response = fetch(&client, &handle, request_id, &task_token).await;
                    // UI side gone means nobody is waiting for this
                    let _ = response_tx.send(response);
                });

                in_flight = Some(InFlight {
                    request_id,
                    token,
                    task,
                });
            }
            RecommendRequest::Cancel { request_id } => match in_flight.take() {
                Some(current) if current.request_id == request_id => {
                    // The fetch task reports Cancelled itself, or has
                    // already sent its result
                    current.cancel_if_running();
                }
                other => {
                    in_flight = other;
                    let _ = response_tx.send(RecommendResponse::Cancelled { request_id });
                    log::debug!("Cancelled request {} (no active request)", request_id);
                }
            },
        }
    }

    if let Some(current) = in_flight {
        current.cancel_if_running();
    }
    log::debug!("Request worker shutting down");
}

/// Run one request and translate the outcome into a response message
async fn fetch(
    client: &RecommendClient,
    handle: &str,
    request_id: u64,
    cancel_token: &CancellationToken,
) -> RecommendResponse {
    match client.recommend_with_cancel(handle, cancel_token).await {
        Ok(items) => RecommendResponse::Recommendations { request_id, items },
        Err(RecommendError::Cancelled) => {
            log::debug!("Request {} cancelled", request_id);
            RecommendResponse::Cancelled { request_id }
        }
        Err(e) => {
            log::debug!("Request {} failed: {}", request_id, e);
            RecommendResponse::Failed {
                request_id,
                message: e.user_message(),
            }
        }
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod worker_tests;

//! Form controller state
//!
//! Owns the recommendation list, error message and busy flag, and talks to
//! the request worker over channels. Each submission gets a fresh request id;
//! responses tagged with any other id are stale and dropped, so the latest
//! submission always wins regardless of arrival order.

use std::sync::mpsc::{Receiver, TryRecvError};

use tokio::sync::mpsc::UnboundedSender;

use crate::error::FALLBACK_ERROR_MESSAGE;

/// Request messages sent to the worker thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendRequest {
    /// Fetch recommendations for a handle
    Fetch {
        handle: String,
        /// Unique ID for this request, used to filter stale responses
        request_id: u64,
    },
    /// Abandon the request with the given ID
    Cancel { request_id: u64 },
}

/// Response messages received from the worker thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendResponse {
    /// The server returned a recommendation list
    Recommendations { request_id: u64, items: Vec<String> },
    /// The request failed; `message` is what the user should see
    Failed { request_id: u64, message: String },
    /// The request was abandoned before it resolved
    Cancelled { request_id: u64 },
}

impl RecommendResponse {
    pub fn request_id(&self) -> u64 {
        match self {
            RecommendResponse::Recommendations { request_id, .. }
            | RecommendResponse::Failed { request_id, .. }
            | RecommendResponse::Cancelled { request_id } => *request_id,
        }
    }
}

/// Where the form is in its request lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Pending,
    Success,
    Failed,
}

/// Outcome of a submit attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A request was issued with this id
    Sent(u64),
    /// Handle was empty; nothing changed
    EmptyHandle,
    /// No worker to talk to; the form shows the fallback error
    WorkerUnavailable,
}

/// Recommendation form state
pub struct RecommenderState {
    /// Recommendations from the latest successful response, in display order
    pub recommendations: Vec<String>,
    /// Message from the latest failed request
    pub error: Option<String>,
    /// True strictly while the current request is outstanding
    pub loading: bool,
    pub phase: Phase,
    /// Incremented for each new request
    pub request_id: u64,
    /// ID of the request whose response will be accepted, if any
    pub in_flight_request_id: Option<u64>,
    pub request_tx: Option<UnboundedSender<RecommendRequest>>,
    pub response_rx: Option<Receiver<RecommendResponse>>,
}

impl RecommenderState {
    pub fn new() -> Self {
        Self {
            recommendations: Vec::new(),
            error: None,
            loading: false,
            phase: Phase::Idle,
            request_id: 0,
            in_flight_request_id: None,
            request_tx: None,
            response_rx: None,
        }
    }

    /// Set the channel handles for communication with the worker thread
    pub fn set_channels(
        &mut self,
        request_tx: UnboundedSender<RecommendRequest>,
        response_rx: Receiver<RecommendResponse>,
    ) {
        self.request_tx = Some(request_tx);
        self.response_rx = Some(response_rx);
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_in_flight_request(&self) -> bool {
        self.in_flight_request_id.is_some()
    }

    /// Submit a handle
    ///
    /// An empty handle issues nothing. Any other handle, whitespace
    /// included, is sent as typed. A request still in flight is cancelled
    /// and its response will be ignored.
    pub fn submit(&mut self, handle: &str) -> SubmitOutcome {
        if handle.is_empty() {
            return SubmitOutcome::EmptyHandle;
        }

        self.cancel_in_flight_request();
        self.start_request();
        let request_id = self.request_id;

        let sent = self.request_tx.as_ref().is_some_and(|tx| {
            tx.send(RecommendRequest::Fetch {
                handle: handle.to_string(),
                request_id,
            })
            .is_ok()
        });

        if sent {
            log::debug!("Sent request {} for handle {:?}", request_id, handle);
            SubmitOutcome::Sent(request_id)
        } else {
            log::warn!("Request worker unavailable, request {} dropped", request_id);
            self.set_error(FALLBACK_ERROR_MESSAGE.to_string());
            SubmitOutcome::WorkerUnavailable
        }
    }

    /// Clear previous results and enter the pending state
    ///
    /// Increments the request_id so responses to earlier requests are
    /// filtered out.
    pub fn start_request(&mut self) {
        self.error = None;
        self.recommendations.clear();
        self.loading = true;
        self.phase = Phase::Pending;
        self.request_id = self.request_id.wrapping_add(1);
        self.in_flight_request_id = Some(self.request_id);
    }

    /// Replace the list with a successful response
    pub fn complete_request(&mut self, items: Vec<String>) {
        self.recommendations = items;
        self.error = None;
        self.loading = false;
        self.phase = Phase::Success;
        self.in_flight_request_id = None;
    }

    /// Set an error state
    pub fn set_error(&mut self, message: String) {
        self.recommendations.clear();
        self.error = Some(message);
        self.loading = false;
        self.phase = Phase::Failed;
        self.in_flight_request_id = None;
    }

    /// Cancel any in-flight request
    ///
    /// Returns true if a cancel was sent.
    pub fn cancel_in_flight_request(&mut self) -> bool {
        if let Some(request_id) = self.in_flight_request_id
            && let Some(ref tx) = self.request_tx
            && tx.send(RecommendRequest::Cancel { request_id }).is_ok()
        {
            log::debug!("Sent cancel for request {}", request_id);
            self.in_flight_request_id = None;
            return true;
        }
        false
    }

    /// Apply one response from the worker
    ///
    /// Returns true if the response belonged to the current request and
    /// changed the state.
    pub fn handle_response(&mut self, response: RecommendResponse) -> bool {
        let request_id = response.request_id();
        if self.in_flight_request_id != Some(request_id) {
            log::debug!(
                "Ignoring stale response for request {} (current: {:?})",
                request_id,
                self.in_flight_request_id
            );
            return false;
        }

        match response {
            RecommendResponse::Recommendations { items, .. } => {
                log::debug!("Request {} returned {} items", request_id, items.len());
                self.complete_request(items);
                true
            }
            RecommendResponse::Failed { message, .. } => {
                log::debug!("Request {} failed: {}", request_id, message);
                self.set_error(message);
                true
            }
            RecommendResponse::Cancelled { .. } => {
                // Only superseded requests are cancelled, and those are never current
                log::warn!("Current request {} reported cancelled", request_id);
                false
            }
        }
    }

    /// Drain pending worker responses without blocking
    ///
    /// Returns true if any response changed the state.
    pub fn poll_responses(&mut self) -> bool {
        let mut changed = false;
        let mut disconnected = false;

        if let Some(rx) = &self.response_rx {
            let mut drained = Vec::new();
            loop {
                match rx.try_recv() {
                    Ok(response) => drained.push(response),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        disconnected = true;
                        break;
                    }
                }
            }
            for response in drained {
                changed |= self.handle_response(response);
            }
        }

        if disconnected {
            self.response_rx = None;
            if self.loading {
                log::warn!("Request worker disconnected with a request in flight");
                self.set_error(FALLBACK_ERROR_MESSAGE.to_string());
                changed = true;
            }
        }

        changed
    }
}

impl Default for RecommenderState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "recommender_state_tests.rs"]
mod recommender_state_tests;

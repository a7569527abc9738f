//! Recommendation API client
//!
//! Posts a handle to the recommendation endpoint and decodes the returned
//! list. Requests race a cancellation token so a superseded submission can
//! be abandoned mid-flight.

use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::RecommendError;

/// Recommendation endpoint used when nothing else is configured
pub const DEFAULT_ENDPOINT: &str = "https://your-app.onrender.com/recommend";

#[derive(Debug, Serialize)]
struct RecommendRequestBody<'a> {
    handle: &'a str,
}

#[derive(Debug, Deserialize)]
struct RecommendResponseBody {
    recommendations: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponseBody {
    error: String,
}

/// Async client for the recommendation API
#[derive(Debug, Clone)]
pub struct RecommendClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl RecommendClient {
    /// Create a client for the given endpoint
    ///
    /// `timeout` is applied to the whole request when set; `None` waits
    /// indefinitely.
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self, RecommendError> {
        let endpoint = Url::parse(endpoint).map_err(|e| RecommendError::InvalidEndpoint {
            url: endpoint.to_string(),
            message: e.to_string(),
        })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| RecommendError::ClientSetup(e.to_string()))?;

        Ok(Self { http, endpoint })
    }

    /// The endpoint requests are posted to
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Fetch recommendations for `handle`
    pub async fn recommend(&self, handle: &str) -> Result<Vec<String>, RecommendError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&RecommendRequestBody { handle })
            .send()
            .await
            .map_err(|e| RecommendError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| RecommendError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(RecommendError::Api {
                status: status.as_u16(),
                message: parse_error_message(&body),
            });
        }

        parse_recommendations(&body)
    }

    /// Fetch recommendations, abandoning the request once `cancel_token` fires
    ///
    /// A token that is already cancelled returns `Cancelled` without touching
    /// the network.
    pub async fn recommend_with_cancel(
        &self,
        handle: &str,
        cancel_token: &CancellationToken,
    ) -> Result<Vec<String>, RecommendError> {
        if cancel_token.is_cancelled() {
            return Err(RecommendError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => Err(RecommendError::Cancelled),
            result = self.recommend(handle) => result,
        }
    }
}

/// Decode a success body into the recommendation list
pub(crate) fn parse_recommendations(body: &[u8]) -> Result<Vec<String>, RecommendError> {
    serde_json::from_slice::<RecommendResponseBody>(body)
        .map(|parsed| parsed.recommendations)
        .map_err(|e| RecommendError::Parse(e.to_string()))
}

/// Pull the server's `error` string out of a failure body, if it has one
pub(crate) fn parse_error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorResponseBody>(body)
        .ok()
        .map(|parsed| parsed.error)
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod client_tests;

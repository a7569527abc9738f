use thiserror::Error;

/// Message shown when a failed request carries no usable server message
pub const FALLBACK_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Errors that can occur while fetching recommendations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecommendError {
    /// The configured endpoint is not a valid absolute URL
    #[error("Invalid endpoint URL '{url}': {message}")]
    InvalidEndpoint { url: String, message: String },

    /// The HTTP client could not be constructed
    #[error("HTTP client setup failed: {0}")]
    ClientSetup(String),

    /// Request never produced a response (DNS, connection refused, timeout...)
    #[error("Network error: {0}")]
    Network(String),

    /// Server answered with a non-2xx status
    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("no error message"))]
    Api { status: u16, message: Option<String> },

    /// Success response body was not the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Request was superseded before it resolved
    #[error("Request cancelled")]
    Cancelled,
}

impl RecommendError {
    /// The single string shown to the user for this failure
    ///
    /// Only an API error with a non-empty server message changes what the
    /// user sees; every other failure collapses to the fallback.
    pub fn user_message(&self) -> String {
        match self {
            RecommendError::Api {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            _ => FALLBACK_ERROR_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;

//! Error types for the Google Chat webhook client.

use reqwest::StatusCode;
use thiserror::Error;

/// Convenient result alias returning [`WebhookError`] failures.
pub type WebhookResult<T> = Result<T, WebhookError>;

/// Failures that can occur while posting to the chat webhook.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// No webhook URL is configured.
    #[error("chat webhook URL not configured")]
    NotConfigured,
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build chat webhook client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// The request could not be sent or timed out.
    #[error("failed to send chat webhook request")]
    RequestSend {
        #[source]
        source: reqwest::Error,
    },
    /// The webhook answered with something other than 200 OK.
    #[error("unexpected chat webhook response status {status}")]
    RequestStatus { status: StatusCode },
}

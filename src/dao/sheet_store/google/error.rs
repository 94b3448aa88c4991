//! Error types shared by the Google Sheets storage implementation.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

use crate::dao::storage::StorageError;

/// Convenient result alias returning [`SheetsError`] failures.
pub type SheetsResult<T> = Result<T, SheetsError>;

/// Failures that can occur while talking to Google Sheets.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// Required environment variable is missing.
    #[error("missing Google Sheets environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    /// The service-account key file could not be read.
    #[error("failed to read Google credentials from `{}`", path.display())]
    CredentialsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The service-account key file is not valid JSON.
    #[error("invalid Google credentials in `{}`", path.display())]
    CredentialsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The private key could not be used to sign the token assertion.
    #[error("failed to sign Google token assertion")]
    SignAssertion {
        #[source]
        source: jsonwebtoken::errors::Error,
    },
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build Google Sheets client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// The configured API base URL cannot be parsed.
    #[error("invalid Google Sheets API URL `{url}`")]
    InvalidUrl { url: String },
    /// The token endpoint could not be reached.
    #[error("failed to request Google access token")]
    TokenRequest {
        #[source]
        source: reqwest::Error,
    },
    /// The token endpoint refused the assertion.
    #[error("Google token endpoint answered {status}")]
    TokenStatus { status: StatusCode },
    /// A request to the Sheets API could not be sent.
    #[error("failed to send Google Sheets request for `{range}`")]
    RequestSend {
        range: String,
        #[source]
        source: reqwest::Error,
    },
    /// The Sheets API returned an unexpected status code.
    #[error("unexpected Google Sheets response status {status} for `{range}`")]
    RequestStatus { range: String, status: StatusCode },
    /// Response payload could not be decoded.
    #[error("failed to decode Google Sheets response for `{range}`")]
    DecodeResponse {
        range: String,
        #[source]
        source: reqwest::Error,
    },
}

impl From<SheetsError> for StorageError {
    fn from(err: SheetsError) -> Self {
        match err {
            SheetsError::MissingEnvVar { .. }
            | SheetsError::CredentialsRead { .. }
            | SheetsError::CredentialsParse { .. }
            | SheetsError::SignAssertion { .. }
            | SheetsError::TokenStatus { .. } => StorageError::credentials(err.to_string(), err),
            _ => StorageError::unavailable(err.to_string(), err),
        }
    }
}

//! Error types for the installer

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Main error type for the installer server
#[derive(Error, Debug)]
pub enum InstallerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Missing values")]
    MissingValues,
}

/// Install endpoint contract: 400 for missing input, a bare 500 for
/// everything else. Bodies never carry detail.
impl IntoResponse for InstallerError {
    fn into_response(self) -> Response {
        match self {
            InstallerError::MissingValues => {
                (StatusCode::BAD_REQUEST, "Missing values").into_response()
            }
            other => {
                tracing::error!(error = %other, "Install request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Error").into_response()
            }
        }
    }
}

/// Why a call against the backend API did not succeed
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// The configured endpoint could not be turned into a request URL
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// The backend answered with a non-success status
    #[error("Rejected with {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The request never produced a response
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    /// The backend answered but the body was not what we expected
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for ProvisionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProvisionError::MalformedResponse(err.to_string())
        } else {
            ProvisionError::Unreachable(err.to_string())
        }
    }
}

impl From<url::ParseError> for ProvisionError {
    fn from(err: url::ParseError) -> Self {
        ProvisionError::InvalidEndpoint(err.to_string())
    }
}

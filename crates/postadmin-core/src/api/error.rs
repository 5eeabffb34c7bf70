use reqwest::StatusCode;
use thiserror::Error;

use super::request::RawResponse;

/// The request never produced a response.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Connection failed: {0}")]
    Connection(String),
}

#[derive(Error, Debug)]
pub enum RequestError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The session has already been cleared and a redirect to login
    /// scheduled. Retrying with the same token is pointless.
    #[error("Unauthorized - session expired")]
    Unauthorized(RawResponse),

    #[error("Request failed: {}", .0.summary())]
    Status(RawResponse),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl RequestError {
    /// The raw response behind a rejected call, if one was received.
    pub fn response(&self) -> Option<&RawResponse> {
        match self {
            RequestError::Unauthorized(r) | RequestError::Status(r) => Some(r),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.response().map(|r| r.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, RequestError::Unauthorized(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, RequestError::Transport(_))
    }
}

//! Error types for the Block Storage API client.

use thiserror::Error;

/// Errors raised by [`super::BlockStorageApi`] implementations.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum BlockApiError {
    /// The addressed resource does not exist.
    #[error("{resource} {id} not found")]
    NotFound {
        /// Resource kind (`volume` or `snapshot`).
        resource: String,
        /// Requested identifier.
        id: String,
    },
    /// The API answered with a non-success status.
    #[error("block storage API returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body or provider message.
        message: String,
    },
    /// The request could not be sent or the response not received.
    #[error("block storage request failed: {message}")]
    Transport {
        /// Error message from the HTTP client.
        message: String,
    },
    /// The response body did not match the expected shape.
    #[error("failed to decode block storage response: {message}")]
    Decode {
        /// Error message from the decoder.
        message: String,
    },
}

impl From<reqwest::Error> for BlockApiError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport {
            message: value.to_string(),
        }
    }
}

impl From<serde_json::Error> for BlockApiError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode {
            message: value.to_string(),
        }
    }
}

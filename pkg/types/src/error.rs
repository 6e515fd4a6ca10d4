//! Error taxonomy shared by the aggregation core and the HTTP layer.

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced to API callers. The transport maps each variant to a
/// status code via [`ApiError::code`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// No identity attached to the request
    #[error("Unauthorized")]
    Unauthorized,

    /// Identity present but the policy hides the requested object
    #[error("Forbidden")]
    Forbidden,

    /// Missing or malformed request parameter
    #[error("Bad Request: {0}")]
    Validation(String),

    /// Requested object does not exist
    #[error("Not Found: {0}")]
    NotFound(String),

    /// Resource store failure, or several failures folded by [`ApiError::from_list`]
    #[error("Internal Server Error: {0}")]
    Internal(String),

    /// Payload encoding failure
    #[error("Internal Server Error: {0}")]
    Serialization(String),
}

/// Wire shape of an error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn internal(msg: impl std::fmt::Display) -> Self {
        ApiError::Internal(msg.to_string())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    /// HTTP status code for this error.
    pub fn code(&self) -> u16 {
        match self {
            ApiError::Unauthorized => 401,
            ApiError::Forbidden => 403,
            ApiError::Validation(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::Internal(_) | ApiError::Serialization(_) => 500,
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code(),
            message: self.to_string(),
        }
    }

    /// Fold several failures into one internal error, numbering each
    /// message from 1 on its own line.
    pub fn from_list(errors: &[ApiError]) -> Self {
        let message = errors
            .iter()
            .enumerate()
            .map(|(i, e)| format!("Error {}: {}", i + 1, e.to_string().replace('\n', "")))
            .collect::<Vec<_>>()
            .join("\n");
        ApiError::Internal(message)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Serialization(err.to_string())
    }
}

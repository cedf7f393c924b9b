use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus { status: StatusCode, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Bearer token is not a valid header value")]
    InvalidToken,
}

/// Maximum length for error response bodies in log messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Error body written by the server: `{"message": ..., "details": ...}`
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

impl ErrorBody {
    /// The most specific non-empty text the server sent
    fn into_message(self) -> String {
        self.details
            .filter(|d| !d.trim().is_empty())
            .or(self.message.filter(|m| !m.trim().is_empty()))
            .unwrap_or_default()
    }
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Build an error from a non-success response.
    ///
    /// Only a message parsed from the server's JSON error body is kept; a raw
    /// body (HTML error pages and the like) goes to the debug log instead.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => parsed.into_message(),
            Err(_) => {
                debug!(%status, body = %Self::truncate_body(body), "Non-JSON error body");
                String::new()
            }
        };
        match status.as_u16() {
            400 | 422 => ApiError::BadRequest(message),
            401 => ApiError::Unauthorized(message),
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            500..=599 => ApiError::ServerError(message),
            _ => ApiError::UnexpectedStatus { status, message },
        }
    }

    /// Message the server attached to a status error, if any
    pub fn server_message(&self) -> Option<&str> {
        let message = match self {
            ApiError::Unauthorized(m)
            | ApiError::Forbidden(m)
            | ApiError::NotFound(m)
            | ApiError::BadRequest(m)
            | ApiError::ServerError(m)
            | ApiError::UnexpectedStatus { message: m, .. } => m.as_str(),
            _ => return None,
        };
        (!message.is_empty()).then_some(message)
    }
}

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::api::ApiError;

pub(crate) const INCORRECT_CREDENTIALS: &str = "Email or password is incorrect.";
pub(crate) const GENERIC_FAILURE: &str = "An error has occurred.";
pub(crate) const NO_ACTIVE_SESSION: &str = "No active session.";
pub(crate) const NOT_SIGNED_IN: &str = "Not signed in.";
pub(crate) const INVALID_RESPONSE: &str = "Invalid response from server.";
const CONNECT_FAILED: &str = "Unable to connect to server. Check your internet connection.";
const TIMED_OUT: &str = "Connection timed out. Please try again.";

/// Broad category of an auth failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum AuthErrorKind {
    /// Wrong credentials or no usable session
    InvalidCredentials,
    /// The server could not be reached
    Transport,
    /// Anything else: unexpected status or malformed response
    Unknown,
}

impl fmt::Display for AuthErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthErrorKind::InvalidCredentials => "invalid credentials",
            AuthErrorKind::Transport => "transport",
            AuthErrorKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Failure returned by every session operation.
///
/// Displays as a short message suitable for showing to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AuthError {
    kind: AuthErrorKind,
    message: String,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::InvalidCredentials, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::Transport, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::Unknown, message)
    }

    pub fn kind(&self) -> AuthErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Map a transport-level error for operations without special cases.
    ///
    /// Network failures become `Transport`; status errors become `Unknown`
    /// carrying the server's message when it sent one.
    pub(crate) fn from_api(err: &ApiError) -> Self {
        match err {
            ApiError::Network(e) if e.is_timeout() => Self::transport(TIMED_OUT),
            ApiError::Network(e) if e.is_decode() || e.is_body() => Self::unknown(INVALID_RESPONSE),
            ApiError::Network(_) => Self::transport(CONNECT_FAILED),
            ApiError::InvalidResponse(_) => Self::unknown(INVALID_RESPONSE),
            other => Self::unknown(other.server_message().unwrap_or(GENERIC_FAILURE)),
        }
    }
}

//! REST API client module for the lunchmore server.
//!
//! This module provides the `ApiClient` for the identity endpoints and the
//! organization member endpoints. Identity calls rely on the server's session
//! cookie, kept in the client's cookie jar; member calls carry the bearer
//! token from the current session.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;

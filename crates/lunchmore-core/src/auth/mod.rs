//! Authentication module: the gateway between consumers and the server.
//!
//! This module provides:
//! - `AuthGateway`: Login, signup, refresh, logout and invite acceptance
//! - `AuthError`: User-facing failure with a coarse kind
//! - `CredentialFile`: Saved server session cookie, so refresh works across runs
//!
//! The gateway never edits the session directly; every success becomes a
//! transition dispatched to the session store.

pub mod credentials;
pub mod error;
pub mod gateway;

pub use credentials::CredentialFile;
pub use error::{AuthError, AuthErrorKind};
pub use gateway::AuthGateway;

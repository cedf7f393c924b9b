//! Lunchmore session core.
//!
//! Owns the signed-in identity and bearer token for the lunchmore client and
//! mediates every credentialed call to the server:
//! - `session`: snapshot type, transition rules, and the store that owns them
//! - `auth`: gateway performing login/signup/refresh/logout/join
//! - `provider`: builds the single session for a process and runs startup refresh
//! - `members`: member listing and invitations using the session's token

pub mod api;
pub mod auth;
pub mod config;
pub mod members;
pub mod models;
pub mod provider;
pub mod session;

pub use auth::{AuthError, AuthErrorKind};
pub use config::Config;
pub use members::MembersClient;
pub use models::{InviteInfo, JoinForm, Member, SignupForm};
pub use provider::{SessionHandle, SessionProvider};
pub use session::{Session, SessionPatch, Transition, TransitionKind};

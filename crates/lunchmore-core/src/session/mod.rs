//! Session state and its transition rules.
//!
//! This module provides:
//! - `Session`: Immutable snapshot of the current actor and bearer token
//! - `Transition`: Named update applied through the pure `transition` function
//! - `SessionStore`: The single cell that owns the current snapshot
//!
//! Nothing here performs I/O. Network outcomes reach the store only as
//! transitions dispatched by the auth gateway.

pub mod model;
pub mod store;
pub mod transition;

pub use model::{Session, SessionPatch};
pub use store::SessionStore;
pub use transition::{replay, transition, Transition, TransitionKind};

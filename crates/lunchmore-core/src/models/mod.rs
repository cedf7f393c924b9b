//! Request and response types exchanged with the lunchmore API.
//!
//! Session identity lives in `crate::session`; the types here are the
//! credential forms consumers hand to the gateway and the organization data
//! returned to the member views.

pub mod forms;
pub mod organization;

pub use forms::{JoinForm, SignupForm};
pub use organization::{InviteInfo, Member};

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Session, SessionPatch};

/// Name of a session transition.
///
/// Names outside the known set are kept as `Unrecognized` rather than rejected;
/// applying one leaves the session untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransitionKind {
    Signup,
    Login,
    Refresh,
    Join,
    Logout,
    Unrecognized(String),
}

impl TransitionKind {
    pub fn name(&self) -> &str {
        match self {
            TransitionKind::Signup => "SIGNUP",
            TransitionKind::Login => "LOGIN",
            TransitionKind::Refresh => "REFRESH",
            TransitionKind::Join => "JOIN",
            TransitionKind::Logout => "LOGOUT",
            TransitionKind::Unrecognized(name) => name,
        }
    }
}

impl From<&str> for TransitionKind {
    fn from(name: &str) -> Self {
        match name {
            "SIGNUP" => TransitionKind::Signup,
            "LOGIN" => TransitionKind::Login,
            "REFRESH" => TransitionKind::Refresh,
            "JOIN" => TransitionKind::Join,
            "LOGOUT" => TransitionKind::Logout,
            other => TransitionKind::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for TransitionKind {
    fn from(name: String) -> Self {
        TransitionKind::from(name.as_str())
    }
}

impl From<TransitionKind> for String {
    fn from(kind: TransitionKind) -> Self {
        kind.name().to_string()
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named request to replace the session snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    #[serde(rename = "type")]
    pub kind: TransitionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<SessionPatch>,
}

impl Transition {
    pub fn new(kind: impl Into<TransitionKind>, payload: Option<SessionPatch>) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    pub fn signup(patch: SessionPatch) -> Self {
        Self::new(TransitionKind::Signup, Some(patch))
    }

    pub fn login(patch: SessionPatch) -> Self {
        Self::new(TransitionKind::Login, Some(patch))
    }

    pub fn refresh(patch: SessionPatch) -> Self {
        Self::new(TransitionKind::Refresh, Some(patch))
    }

    pub fn join(patch: SessionPatch) -> Self {
        Self::new(TransitionKind::Join, Some(patch))
    }

    pub fn logout() -> Self {
        Self::new(TransitionKind::Logout, None)
    }
}

/// Compute the snapshot that follows `current` under `action`.
///
/// Identity-bearing transitions overlay their payload, `LOGOUT` resets to the
/// zero session, anything else returns `current` unchanged. Never fails.
pub fn transition(current: &Session, action: &Transition) -> Session {
    match action.kind {
        TransitionKind::Signup
        | TransitionKind::Login
        | TransitionKind::Refresh
        | TransitionKind::Join => match action.payload {
            Some(ref patch) => current.merged(patch),
            None => current.clone(),
        },
        TransitionKind::Logout => Session::default(),
        TransitionKind::Unrecognized(_) => current.clone(),
    }
}

/// Apply a recorded sequence of transitions in order.
pub fn replay<'a, I>(initial: Session, transitions: I) -> Session
where
    I: IntoIterator<Item = &'a Transition>,
{
    transitions
        .into_iter()
        .fold(initial, |session, action| transition(&session, action))
}

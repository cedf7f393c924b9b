use std::fmt;

use serde::Serialize;

/// Everything needed to create an organization and its first user.
#[derive(Clone, Default, Serialize)]
pub struct SignupForm {
    pub org_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// The new member's details when accepting an invite.
#[derive(Clone, Default, Serialize)]
pub struct JoinForm {
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// Body of `POST /invite/accept`: the invite code plus the join form.
#[derive(Serialize)]
pub(crate) struct JoinRequest<'a> {
    pub code: &'a str,
    #[serde(flatten)]
    pub form: &'a JoinForm,
}

#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub(crate) struct InviteRequest<'a> {
    pub email: &'a str,
}

// Passwords stay out of logs and panic messages

impl fmt::Debug for SignupForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupForm")
            .field("org_name", &self.org_name)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for JoinForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinForm")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("password", &"<redacted>")
            .finish()
    }
}

//! Organization members and invitations.
//!
//! These calls are consumers of the session: they read the bearer token from
//! the current snapshot and never change it.

use tracing::debug;

use crate::api::ApiClient;
use crate::auth::error::NOT_SIGNED_IN;
use crate::auth::AuthError;
use crate::models::{InviteInfo, Member};
use crate::session::SessionStore;

#[derive(Clone)]
pub struct MembersClient {
    api: ApiClient,
    store: SessionStore,
}

impl MembersClient {
    pub(crate) fn new(api: ApiClient, store: SessionStore) -> Self {
        Self { api, store }
    }

    /// Bearer token from the current snapshot; fails without touching the network
    fn token(&self) -> Result<String, AuthError> {
        self.store
            .snapshot()
            .bearer()
            .map(str::to_string)
            .ok_or_else(|| AuthError::invalid_credentials(NOT_SIGNED_IN))
    }

    /// Organization name for an invite code. Needs no session.
    pub async fn invite_info(&self, code: &str) -> Result<InviteInfo, AuthError> {
        self.api
            .invite_info(code)
            .await
            .map_err(|e| AuthError::from_api(&e))
    }

    /// Members of the signed-in user's organization
    pub async fn list(&self) -> Result<Vec<Member>, AuthError> {
        let token = self.token()?;
        let members = self
            .api
            .members(&token)
            .await
            .map_err(|e| AuthError::from_api(&e))?;
        debug!(count = members.len(), "Fetched members");
        Ok(members)
    }

    /// Email an invitation to join the signed-in user's organization
    pub async fn invite(&self, email: &str) -> Result<(), AuthError> {
        let token = self.token()?;
        self.api
            .send_invite(&token, email)
            .await
            .map_err(|e| AuthError::from_api(&e))
    }
}

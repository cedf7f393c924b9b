//! Network side of the session: every credentialed call goes through here.
//!
//! Each operation issues exactly one request. On success the response becomes
//! a transition dispatched to the [`SessionStore`]; on failure nothing is
//! dispatched and the caller gets an [`AuthError`] describing what went wrong.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::models::{JoinForm, SignupForm};
use crate::session::{Session, SessionPatch, SessionStore, Transition, TransitionKind};

use super::error::{GENERIC_FAILURE, INCORRECT_CREDENTIALS, INVALID_RESPONSE, NO_ACTIVE_SESSION};
use super::{AuthError, CredentialFile};

pub struct AuthGateway {
    api: ApiClient,
    store: SessionStore,
    credentials: CredentialFile,
}

impl AuthGateway {
    pub(crate) fn new(api: ApiClient, store: SessionStore, credentials: CredentialFile) -> Self {
        Self {
            api,
            store,
            credentials,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn session(&self) -> Arc<Session> {
        self.store.snapshot()
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Create an organization and sign in as its first member
    pub async fn signup(&self, form: &SignupForm) -> Result<(), AuthError> {
        let patch = self.api.signup(form).await.map_err(|e| {
            debug!(error = %e, "Signup failed");
            AuthError::from_api(&e)
        })?;
        self.commit(TransitionKind::Signup, patch)
    }

    /// Sign in with email and password.
    ///
    /// Not-found and unauthorized responses both mean the credentials were
    /// wrong; every other failure status gets the generic message.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let patch = self.api.login(email, password).await.map_err(|e| {
            debug!(error = %e, "Login failed");
            match e {
                ApiError::NotFound(_) | ApiError::Unauthorized(_) => {
                    AuthError::invalid_credentials(INCORRECT_CREDENTIALS)
                }
                ApiError::Network(_) | ApiError::InvalidResponse(_) => AuthError::from_api(&e),
                _ => AuthError::unknown(GENERIC_FAILURE),
            }
        })?;
        self.commit(TransitionKind::Login, patch)
    }

    /// Recover the session from the server's session cookie.
    ///
    /// On failure the current session is left exactly as it was.
    pub async fn refresh(&self) -> Result<(), AuthError> {
        let patch = self.api.refresh().await.map_err(|e| {
            debug!(error = %e, "Refresh failed");
            match e {
                ApiError::Unauthorized(_) | ApiError::Forbidden(_) => {
                    AuthError::invalid_credentials(NO_ACTIVE_SESSION)
                }
                _ => AuthError::from_api(&e),
            }
        })?;
        self.commit(TransitionKind::Refresh, patch)
    }

    /// Tell the server to end the session, then clear local state.
    ///
    /// Local state is only cleared once the server acknowledged: if the call
    /// fails the session and the saved cookie are kept so a retry is possible.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.api.logout().await.map_err(|e| {
            debug!(error = %e, "Logout failed, keeping local session");
            AuthError::from_api(&e)
        })?;

        self.store.dispatch(&Transition::logout());
        if let Err(e) = self.credentials.clear() {
            warn!(error = %e, "Failed to remove saved session cookie");
        }
        info!("Logged out");
        Ok(())
    }

    /// Accept an invite code and sign in as the new member
    pub async fn join(&self, code: &str, form: &JoinForm) -> Result<(), AuthError> {
        let patch = self.api.accept_invite(code, form).await.map_err(|e| {
            debug!(error = %e, "Accepting invite failed");
            AuthError::from_api(&e)
        })?;
        self.commit(TransitionKind::Join, patch)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Dispatch an identity patch and persist the session cookie.
    ///
    /// A patch without a token would leave an "authenticated" session with no
    /// credential, so it is rejected before reaching the store.
    fn commit(&self, kind: TransitionKind, patch: SessionPatch) -> Result<(), AuthError> {
        if !patch.has_token() {
            warn!(transition = %kind, "Identity response carried no token");
            return Err(AuthError::unknown(INVALID_RESPONSE));
        }

        self.store.dispatch(&Transition::new(kind, Some(patch)));
        self.persist_cookie();
        Ok(())
    }

    fn persist_cookie(&self) {
        match self.api.cookie_header() {
            Some(cookie) => {
                if let Err(e) = self.credentials.save(&cookie) {
                    warn!(error = %e, "Failed to save session cookie");
                }
            }
            None => debug!("No session cookie to save"),
        }
    }
}

//! One session per process.
//!
//! `SessionProvider` wires a store, an API client and the saved credential
//! into a gateway, and `start` runs the startup refresh. Consumers receive the
//! resulting `SessionHandle` and pass it along explicitly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Result};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::auth::{AuthError, AuthGateway, CredentialFile};
use crate::config::Config;
use crate::members::MembersClient;
use crate::models::{JoinForm, SignupForm};
use crate::session::{Session, SessionStore};

/// Set once the process-wide provider has been built
static GLOBAL_STARTED: AtomicBool = AtomicBool::new(false);

pub struct SessionProvider {
    handle: SessionHandle,
}

impl SessionProvider {
    /// Build a provider for `config`, restoring any saved session cookie.
    ///
    /// Skips the once-per-process guard; applications go through
    /// [`SessionProvider::global`]. Kept public for integration tests.
    #[doc(hidden)]
    pub fn new(config: &Config) -> Result<Self> {
        let api = ApiClient::new(config)?;
        let credentials = CredentialFile::new(config.cache_dir()?);

        match credentials.load() {
            Ok(Some(cookie)) => {
                api.restore_cookies(&cookie);
                debug!("Restored saved session cookie");
            }
            Ok(None) => debug!("No saved session cookie"),
            Err(e) => warn!(error = %e, "Failed to load saved session cookie"),
        }

        let gateway = AuthGateway::new(api, SessionStore::new(), credentials);
        Ok(Self {
            handle: SessionHandle {
                gateway: Arc::new(gateway),
            },
        })
    }

    /// Build the process-wide provider. Fails if one was already built.
    pub fn global(config: &Config) -> Result<Self> {
        if GLOBAL_STARTED.swap(true, Ordering::SeqCst) {
            bail!("session provider already started");
        }
        Self::new(config).inspect_err(|_| GLOBAL_STARTED.store(false, Ordering::SeqCst))
    }

    /// Run the startup refresh once and hand out the session handle.
    ///
    /// A failed refresh just means there was no session to recover, so it is
    /// not reported to the caller.
    pub async fn start(self) -> SessionHandle {
        match self.handle.refresh().await {
            Ok(()) => info!("Recovered previous session"),
            Err(e) => debug!(error = %e, kind = %e.kind(), "No session recovered at startup"),
        }
        self.handle
    }
}

/// Shared access to the one session: its current snapshot and the operations
/// that change it. Clone is cheap.
#[derive(Clone)]
pub struct SessionHandle {
    gateway: Arc<AuthGateway>,
}

impl SessionHandle {
    /// Current session snapshot
    pub fn session(&self) -> Arc<Session> {
        self.gateway.session()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }

    /// Receive every snapshot published from now on
    pub fn subscribe(&self) -> watch::Receiver<Arc<Session>> {
        self.gateway.store().subscribe()
    }

    pub async fn signup(&self, form: &SignupForm) -> Result<(), AuthError> {
        self.gateway.signup(form).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        self.gateway.login(email, password).await
    }

    pub async fn refresh(&self) -> Result<(), AuthError> {
        self.gateway.refresh().await
    }

    pub async fn logout(&self) -> Result<(), AuthError> {
        self.gateway.logout().await
    }

    pub async fn join(&self, code: &str, form: &JoinForm) -> Result<(), AuthError> {
        self.gateway.join(code, form).await
    }

    /// Member and invite calls authorized by this session
    pub fn members(&self) -> MembersClient {
        MembersClient::new(
            self.gateway.api().clone(),
            self.gateway.store().clone(),
        )
    }
}

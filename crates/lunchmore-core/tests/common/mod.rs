//! Shared fixtures for integration tests against a wiremock server.

#![allow(dead_code)]

use lunchmore_core::{Config, SessionHandle, SessionProvider};
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::MockServer;

/// A mock API server plus a private cache directory
pub struct TestEnv {
    pub server: MockServer,
    pub cache: TempDir,
}

impl TestEnv {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
            cache: tempfile::tempdir().expect("temp dir"),
        }
    }

    pub fn config(&self) -> Config {
        Config::default()
            .with_api_url(self.server.uri())
            .with_cache_dir(self.cache.path())
    }

    /// Start a session against the mock server. With no refresh mock mounted
    /// the startup refresh gets a 404 and the session starts signed out.
    pub async fn handle(&self) -> SessionHandle {
        SessionProvider::new(&self.config())
            .expect("provider")
            .start()
            .await
    }
}

/// Identity body in the shape the server returns it
pub fn identity(id: u64, email: &str, token: &str) -> Value {
    json!({
        "id": id,
        "email": email,
        "org_id": 42,
        "first_name": "Ada",
        "last_name": "Byron",
        "token": token,
    })
}

/// Error body in the shape the server returns it
pub fn error_body(message: &str, details: &str) -> Value {
    json!({ "message": message, "details": details })
}

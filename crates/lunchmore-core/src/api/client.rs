//! API client for communicating with the lunchmore REST API.
//!
//! This module provides the `ApiClient` struct for the identity endpoints
//! (signup, login, refresh, logout, invite acceptance) and the member
//! endpoints that require a bearer token.

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{header, Client, Response, Url};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::debug;

use crate::config::Config;
use crate::models::forms::{InviteRequest, JoinRequest, LoginRequest};
use crate::models::organization::MembersResponse;
use crate::models::{InviteInfo, JoinForm, Member, SignupForm};
use crate::session::SessionPatch;

use super::ApiError;

/// Body of the identity endpoints.
///
/// Signup, login and invite acceptance return the full user record; refresh
/// may return just the freshly minted token as a bare JSON string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IdentityResponse {
    Token(String),
    Identity(SessionPatch),
}

impl From<IdentityResponse> for SessionPatch {
    fn from(response: IdentityResponse) -> Self {
        match response {
            IdentityResponse::Token(token) => SessionPatch::token_only(token),
            IdentityResponse::Identity(patch) => patch,
        }
    }
}

/// API client for the lunchmore server.
/// Clone is cheap - the connection pool and cookie jar are shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    cookie_url: Url,
    jar: Arc<Jar>,
}

impl ApiClient {
    /// Create a new API client for the configured server
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = config.api_url.trim_end_matches('/').to_string();
        let cookie_url = Url::parse(&base_url)
            .with_context(|| format!("Invalid API URL: {}", config.api_url))?;

        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .timeout(config.request_timeout())
            .cookie_provider(Arc::clone(&jar))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url,
            cookie_url,
            jar,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Cookie header the jar would send to the API, e.g. the server session cookie
    pub fn cookie_header(&self) -> Option<String> {
        self.jar
            .cookies(&self.cookie_url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }

    /// Put previously saved cookies (`name=value; name2=value2`) back in the jar
    pub fn restore_cookies(&self, header: &str) {
        for pair in header.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            self.jar.add_cookie_str(pair, &self.cookie_url);
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_headers(token: &str) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ApiError::InvalidToken)?,
        );
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn parse_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, ApiError> {
        let response = Self::check_response(response).await?;
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse {}: {}", what, e)))
    }

    async fn identity(response: Response, what: &str) -> Result<SessionPatch, ApiError> {
        let body: IdentityResponse = Self::parse_json(response, what).await?;
        Ok(body.into())
    }

    // ===== Identity Endpoints =====

    /// Create an organization and its first user
    pub async fn signup(&self, form: &SignupForm) -> Result<SessionPatch, ApiError> {
        let url = self.url("/signup");
        debug!(url = %url, "POST signup");
        let response = self.client.post(&url).json(form).send().await?;
        Self::identity(response, "signup response").await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<SessionPatch, ApiError> {
        let url = self.url("/users/login");
        debug!(url = %url, "POST login");
        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        Self::identity(response, "login response").await
    }

    /// Exchange the session cookie held in the jar for a fresh token
    pub async fn refresh(&self) -> Result<SessionPatch, ApiError> {
        let url = self.url("/users/refresh");
        debug!(url = %url, has_cookie = self.cookie_header().is_some(), "GET refresh");
        let response = self.client.get(&url).send().await?;
        Self::identity(response, "refresh response").await
    }

    /// Ask the server to invalidate the session cookie. The response has no body.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let url = self.url("/users/logout");
        debug!(url = %url, "GET logout");
        let response = self.client.get(&url).send().await?;
        Self::check_response(response).await?;
        Ok(())
    }

    pub async fn accept_invite(&self, code: &str, form: &JoinForm) -> Result<SessionPatch, ApiError> {
        let url = self.url("/invite/accept");
        debug!(url = %url, "POST accept invite");
        let response = self
            .client
            .post(&url)
            .json(&JoinRequest { code, form })
            .send()
            .await?;
        Self::identity(response, "accept invite response").await
    }

    // ===== Organization Endpoints =====

    /// Look up the organization an invite code belongs to
    pub async fn invite_info(&self, code: &str) -> Result<InviteInfo, ApiError> {
        let url = self.url("/invite");
        debug!(url = %url, "GET invite info");
        let response = self
            .client
            .get(&url)
            .query(&[("code", code)])
            .send()
            .await?;
        Self::parse_json(response, "invite info").await
    }

    pub async fn members(&self, token: &str) -> Result<Vec<Member>, ApiError> {
        let url = self.url("/organization/members");
        debug!(url = %url, "GET members");
        let response = self
            .client
            .get(&url)
            .headers(Self::auth_headers(token)?)
            .send()
            .await?;
        let parsed: MembersResponse = Self::parse_json(response, "members response").await?;
        Ok(parsed.into_members())
    }

    /// Send an invitation email. The created invitation in the response is not needed.
    pub async fn send_invite(&self, token: &str, email: &str) -> Result<(), ApiError> {
        let url = self.url("/invite");
        debug!(url = %url, "POST invite");
        let response = self
            .client
            .post(&url)
            .headers(Self::auth_headers(token)?)
            .json(&InviteRequest { email })
            .send()
            .await?;
        Self::check_response(response).await?;
        Ok(())
    }
}

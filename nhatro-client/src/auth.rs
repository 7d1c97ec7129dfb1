//! Authentication lifecycle
//!
//! [`AuthStore`] talks to the auth endpoints and keeps the
//! [`SessionStore`] in step with the server. Login and registration are
//! public calls: they send no token, and a 401 there means the credentials
//! were rejected rather than that a session expired.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::UserProfile;
use tokio_util::sync::CancellationToken;

use crate::client::http::{HttpClient, HttpRequest, NetworkHttpClient};
use crate::session::SessionStore;
use crate::transport::Transport;
use crate::{ClientError, ClientResult, ErrorKind};

pub const LOGIN_PATH: &str = "auth/login";
pub const REGISTER_PATH: &str = "auth/register";
pub const LOGOUT_PATH: &str = "auth/logout";
pub const ME_PATH: &str = "auth/me";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Account registration form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub password_confirmation: String,
    #[serde(rename = "HoTen")]
    pub full_name: String,
    #[serde(rename = "SoDienThoai", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "Email", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Payload of a login or registration reply
#[derive(Debug, Deserialize)]
struct Credentials {
    #[serde(alias = "token")]
    access_token: String,
    user: Value,
}

pub struct AuthStore<H: HttpClient = NetworkHttpClient> {
    transport: Transport<H>,
    session: SessionStore,
}

impl<H: HttpClient> Clone for AuthStore<H> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            session: self.session.clone(),
        }
    }
}

impl<H: HttpClient> std::fmt::Debug for AuthStore<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStore")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Clears the loading flag when the bootstrap ends, however it ends
struct LoadingGuard<'a>(&'a SessionStore);

impl<'a> LoadingGuard<'a> {
    fn start(session: &'a SessionStore) -> Self {
        session.set_loading(true);
        Self(session)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.set_loading(false);
    }
}

impl<H: HttpClient> AuthStore<H> {
    /// `transport` should read its token from `session`.
    pub fn new(transport: Transport<H>, session: SessionStore) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Log in and persist the new session.
    ///
    /// Any previous session is replaced. On failure nothing is persisted.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<UserProfile> {
        let request = HttpRequest::post(LOGIN_PATH)
            .json(&LoginRequest { username, password })?
            .public();
        let user = self.authenticate(request).await?;
        tracing::info!(username = %user.username, role = %user.role_code, "Logged in");
        Ok(user)
    }

    /// Register an account; same persistence rules as [`login`](Self::login).
    pub async fn register(&self, form: &RegisterRequest) -> ClientResult<UserProfile> {
        let request = HttpRequest::post(REGISTER_PATH).json(form)?.public();
        let user = self.authenticate(request).await?;
        tracing::info!(username = %user.username, "Registered new account");
        Ok(user)
    }

    async fn authenticate(&self, request: HttpRequest) -> ClientResult<UserProfile> {
        let body: Value = self.transport.send_as(request, None).await?;
        let payload = match body {
            Value::Object(mut map) if map.contains_key("data") => map.remove("data").unwrap_or_default(),
            other => other,
        };
        let credentials: Credentials = serde_json::from_value(payload)
            .map_err(|e| ClientError::InvalidResponse(format!("Malformed auth reply: {}", e)))?;
        if credentials.access_token.trim().is_empty() {
            return Err(ClientError::InvalidResponse("Auth reply carries an empty token".into()));
        }
        let user = UserProfile::from_server(credentials.user)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        self.session.establish(credentials.access_token, user.clone())?;
        Ok(user)
    }

    /// Log out. Local state is always cleared; a failed remote call is only logged.
    pub async fn logout(&self) {
        if self.session.token().is_some() {
            if let Err(e) = self
                .transport
                .send_unit(HttpRequest::post(LOGOUT_PATH), None)
                .await
            {
                tracing::warn!(error = %e, "Remote logout failed, clearing local session anyway");
            }
        }
        self.clear_local();
        tracing::info!("Logged out");
    }

    fn clear_local(&self) {
        if let Err(e) = self.session.clear() {
            tracing::warn!(error = %e, "Failed to remove persisted session");
        }
    }

    /// Re-fetch the profile of the current session.
    ///
    /// The cached profile is only replaced while the session that started
    /// the refresh is still current; a refresh overtaken by a logout or a
    /// new login resolves to [`ClientError::Cancelled`].
    pub async fn refresh_current_user(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<UserProfile> {
        let token = self
            .session
            .token()
            .ok_or_else(|| ClientError::Unauthenticated("No active session".into()))?;

        let body: Value = self
            .transport
            .send_as(HttpRequest::get(ME_PATH), cancel)
            .await?;
        let user = UserProfile::from_server(body)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        if !self.session.update_user_if_current(&token, user.clone())? {
            tracing::debug!("Session changed during profile refresh, discarding result");
            return Err(ClientError::Cancelled);
        }
        Ok(user)
    }

    /// Validate a restored session at startup.
    ///
    /// Returns `None` when there is no session or the server rejected it.
    /// Other failures leave the cached session in place. A rejection that
    /// arrives after the session was replaced resolves to
    /// [`ClientError::Cancelled`] and leaves the newer session alone.
    pub async fn bootstrap(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> ClientResult<Option<UserProfile>> {
        let Some(token) = self.session.token() else {
            return Ok(None);
        };
        let _loading = LoadingGuard::start(&self.session);
        match self.refresh_current_user(cancel).await {
            Ok(user) => Ok(Some(user)),
            Err(e) if e.kind() == ErrorKind::Unauthenticated => {
                if self.handle_failure(&e, Some(token.as_str())) {
                    Ok(None)
                } else {
                    tracing::debug!("Session changed before its rejection arrived, ignoring");
                    Err(ClientError::Cancelled)
                }
            }
            Err(e) => {
                if !e.is_cancelled() {
                    tracing::warn!(error = %e, "Session bootstrap failed, keeping cached session");
                }
                Err(e)
            }
        }
    }

    /// Forced logout on a rejected token. Returns whether the session was dropped.
    ///
    /// `token` is the token the failing request carried. The session is only
    /// dropped while it still holds that token, so a late rejection of an
    /// old session cannot log out a newer one.
    pub fn handle_failure(&self, error: &ClientError, token: Option<&str>) -> bool {
        let Some(token) = token else {
            return false;
        };
        if error.kind() != ErrorKind::Unauthenticated {
            return false;
        }
        match self.session.clear_if_current(token) {
            Ok(false) => false,
            Ok(true) => {
                tracing::warn!(error = %error, "Session rejected by server, logging out");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session rejected by server, failed to remove persisted session");
                true
            }
        }
    }
}

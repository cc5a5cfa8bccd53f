//! Session manager: login, logout, silent refresh, authenticated requests.
//!
//! ARCHITECTURE
//! ============
//! The access token and user info live in a `SessionStore` under two keys and
//! are always written and cleared together. The refresh credential is an
//! HTTP-only cookie owned by the transport's cookie jar; this module never
//! reads it. Token expiry is discovered reactively: a 401 from an
//! authenticated request triggers exactly one refresh and one retry.
//!
//! FAILURE POLICY
//! ==============
//! Anything that makes the session untrustworthy (rejected login, failed
//! refresh, refresh with no known user) clears the store and broadcasts an
//! auth-change. Nothing here retries beyond the single refresh-and-retry.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::events::{AuthEvents, Subscription};
use super::store::{ACCESS_TOKEN_KEY, SessionStore, StoreError, USER_INFO_KEY};
use crate::config::ClientConfig;
use crate::net::transport::{HttpRequest, HttpResponse, Transport, TransportError};
use crate::net::types::{LoginRequest, LoginResponse, RefreshResponse, Role, UserProfile, api_error_message};

// =============================================================================
// TYPES
// =============================================================================

/// Identity persisted next to the access token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub email: String,
    pub full_name: String,
    /// Back-filled from `/auth/profile` after login; absent if that failed.
    pub user_id: Option<String>,
    pub role: Option<Role>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub user_info: UserInfo,
}

/// Client-side redirect sink.
pub trait Navigator: Send + Sync {
    fn navigate(&self, to: &str);
}

impl<F> Navigator for F
where
    F: Fn(&str) + Send + Sync,
{
    fn navigate(&self, to: &str) {
        self(to);
    }
}

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The identity backend rejected the credentials.
    #[error("login failed: status {status}")]
    Authentication { status: u16, message: Option<String> },

    /// An authenticated call was attempted with no access token stored.
    #[error("authentication required")]
    AuthenticationRequired,

    /// The access token expired and could not be refreshed. Terminal.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The backend answered with a status this operation cannot use.
    #[error("unexpected response status {status}")]
    UnexpectedStatus { status: u16 },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

// =============================================================================
// SESSION MANAGER
// =============================================================================

pub struct SessionManager {
    transport: Arc<dyn Transport>,
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    events: AuthEvents,
    identity_url: String,
    login_path: String,
}

impl SessionManager {
    #[must_use]
    pub fn new(
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            transport,
            store,
            navigator,
            events: AuthEvents::new(),
            identity_url: config.identity_api_url.clone(),
            login_path: config.login_path.clone(),
        }
    }

    #[must_use]
    pub fn events(&self) -> &AuthEvents {
        &self.events
    }

    /// Shorthand for `events().subscribe(listener)`.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.events.subscribe(listener)
    }

    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.identity_url)
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Optimistic, offline check: true iff an access token is stored.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some_and(|t| !t.is_empty())
    }

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.store.get(ACCESS_TOKEN_KEY)
    }

    #[must_use]
    pub fn user_info(&self) -> Option<UserInfo> {
        let raw = self.store.get(USER_INFO_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::warn!(error = %e, "stored user info unreadable");
                None
            }
        }
    }

    #[must_use]
    pub fn user_id(&self) -> Option<String> {
        self.user_info().and_then(|info| info.user_id)
    }

    /// Both halves of the session, or `None` if either is missing.
    #[must_use]
    pub fn current_session(&self) -> Option<Session> {
        let access_token = self.access_token()?;
        let user_info = self.user_info()?;
        Some(Session { access_token, user_info })
    }

    /// Pick up a session changed outside this process, e.g. another client
    /// sharing the session file logged in or out. Broadcasts an auth-change
    /// when it did, so mounted guards re-check. Returns whether it changed.
    pub fn sync_from_store(&self) -> bool {
        if !self.store.reload() {
            return false;
        }
        tracing::info!(authenticated = self.is_authenticated(), "session changed outside this client");
        self.events.notify();
        true
    }

    // -------------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------------

    fn persist(&self, session: &Session) -> Result<(), StoreError> {
        let info = serde_json::to_string(&session.user_info).map_err(|e| StoreError::Serialize(e.to_string()))?;
        self.store
            .set_all(&[(ACCESS_TOKEN_KEY, session.access_token.as_str()), (USER_INFO_KEY, info.as_str())])
    }

    fn clear(&self) {
        if let Err(e) = self.store.remove_all(&[ACCESS_TOKEN_KEY, USER_INFO_KEY]) {
            tracing::warn!(error = %e, "failed to clear persisted session");
        }
    }

    // -------------------------------------------------------------------------
    // Login / logout
    // -------------------------------------------------------------------------

    /// Log in with email and password.
    ///
    /// The session is persisted as soon as the token arrives, then enriched
    /// with `userId`/`role` from `/auth/profile` on a best-effort basis. One
    /// auth-change is broadcast once the stored state settles.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Authentication`] on a non-2xx response. Every
    /// failure clears any previously stored session first.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        match self.login_inner(email, password).await {
            Ok(session) => {
                tracing::info!(email = %session.user_info.email, "logged in");
                self.events.notify();
                Ok(session)
            }
            Err(e) => {
                tracing::warn!(error = %e, "login failed");
                self.clear();
                self.events.notify();
                Err(e)
            }
        }
    }

    async fn login_inner(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let request = HttpRequest::post(self.endpoint("/auth/login"))
            .with_credentials()
            .json(&LoginRequest { email, password })?;
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(AuthError::Authentication {
                status: response.status,
                message: api_error_message(&response.body),
            });
        }

        let login: LoginResponse = response.json()?;
        let mut session = Session {
            access_token: login.access_token,
            user_info: UserInfo { email: login.email, full_name: login.full_name, user_id: None, role: None },
        };
        self.persist(&session)?;

        match self.profile_with_token(&session.access_token).await {
            Ok(profile) => {
                session.user_info.user_id = Some(profile.user_id);
                session.user_info.role = Some(profile.role);
                if let Err(e) = self.persist(&session) {
                    tracing::warn!(error = %e, "failed to store profile after login");
                }
            }
            Err(e) => tracing::warn!(error = %e, "profile fetch after login failed; continuing"),
        }
        Ok(session)
    }

    /// Single bearer call with no refresh cycle; the token was just minted.
    async fn profile_with_token(&self, token: &str) -> Result<UserProfile, AuthError> {
        let request = HttpRequest::get(self.endpoint("/auth/profile"))
            .bearer(token)
            .with_credentials();
        let response = self.transport.send(request).await?;
        decode_profile(&response)
    }

    /// Clear the local session and broadcast before returning, then ask the
    /// backend to invalidate the refresh cookie in a spawned task.
    ///
    /// The returned handle may be awaited or ignored. Server-side failures are
    /// logged and never touch local state. Must be called within a tokio
    /// runtime.
    pub fn logout(&self) -> tokio::task::JoinHandle<()> {
        self.clear();
        tracing::info!("logged out");
        self.events.notify();

        let transport = Arc::clone(&self.transport);
        let request = HttpRequest::post(self.endpoint("/auth/logout")).with_credentials();
        tokio::spawn(async move {
            match transport.send(request).await {
                Ok(response) if response.is_success() => {}
                Ok(response) => tracing::warn!(status = response.status, "server logout rejected"),
                Err(e) => tracing::warn!(error = %e, "server logout failed; local logout stands"),
            }
        })
    }

    // -------------------------------------------------------------------------
    // Refresh
    // -------------------------------------------------------------------------

    /// Mint a new access token from the refresh cookie.
    ///
    /// Returns `false` (with the session cleared and an auth-change broadcast)
    /// on any failure, including a successful refresh when no user info is
    /// stored.
    pub async fn refresh_access_token(&self) -> bool {
        let request = HttpRequest::post(self.endpoint("/auth/refresh")).with_credentials();
        let access_token = match self.transport.send(request).await {
            Ok(response) if response.is_success() => match response.json::<RefreshResponse>() {
                Ok(body) => body.access_token,
                Err(e) => return self.refresh_failed(&e.to_string()),
            },
            Ok(response) => return self.refresh_failed(&format!("status {}", response.status)),
            Err(e) => return self.refresh_failed(&e.to_string()),
        };

        let Some(user_info) = self.user_info() else {
            return self.refresh_failed("no stored user info");
        };
        if let Err(e) = self.persist(&Session { access_token, user_info }) {
            return self.refresh_failed(&e.to_string());
        }
        tracing::debug!("access token refreshed");
        true
    }

    fn refresh_failed(&self, reason: &str) -> bool {
        tracing::warn!(reason, "token refresh failed; clearing session");
        self.clear();
        self.events.notify();
        false
    }

    /// Probe whether the refresh cookie is still honoured, without touching
    /// the stored session.
    pub async fn has_valid_refresh_token(&self) -> bool {
        let request = HttpRequest::post(self.endpoint("/auth/refresh")).with_credentials();
        matches!(self.transport.send(request).await, Ok(response) if response.is_success())
    }

    // -------------------------------------------------------------------------
    // Authenticated requests
    // -------------------------------------------------------------------------

    /// Issue `request` with the stored bearer token.
    ///
    /// A 401 triggers one refresh; on success the request is re-issued once
    /// and that response is returned whatever its status. Every other status
    /// is returned untouched.
    ///
    /// # Errors
    ///
    /// - [`AuthError::AuthenticationRequired`] if no token is stored (no
    ///   request is sent).
    /// - [`AuthError::AuthenticationFailed`] if the refresh fails; the session
    ///   is cleared and the navigator is sent to the login path.
    /// - [`AuthError::Transport`] if no response was obtained.
    pub async fn authenticated_request(&self, request: HttpRequest) -> Result<HttpResponse, AuthError> {
        let response = self.attempt(&request).await?;
        if !response.is_unauthorized() {
            return Ok(response);
        }
        self.on_unauthorized().await?;
        self.retry_once(&request).await
    }

    async fn attempt(&self, request: &HttpRequest) -> Result<HttpResponse, AuthError> {
        let token = self.access_token().ok_or(AuthError::AuthenticationRequired)?;
        let authorized = request.clone().bearer(token).with_credentials();
        Ok(self.transport.send(authorized).await?)
    }

    async fn on_unauthorized(&self) -> Result<(), AuthError> {
        if self.refresh_access_token().await {
            return Ok(());
        }
        self.clear();
        tracing::warn!(to = %self.login_path, "session expired; redirecting to login");
        self.navigator.navigate(&self.login_path);
        Err(AuthError::AuthenticationFailed)
    }

    async fn retry_once(&self, request: &HttpRequest) -> Result<HttpResponse, AuthError> {
        self.attempt(request).await
    }

    /// Fetch the full profile of the logged-in user.
    ///
    /// # Errors
    ///
    /// Propagates [`SessionManager::authenticated_request`] errors, and
    /// returns [`AuthError::UnexpectedStatus`] on a non-2xx response.
    pub async fn fetch_profile(&self) -> Result<UserProfile, AuthError> {
        let response = self
            .authenticated_request(HttpRequest::get(self.endpoint("/auth/profile")))
            .await?;
        decode_profile(&response)
    }
}

fn decode_profile(response: &HttpResponse) -> Result<UserProfile, AuthError> {
    if !response.is_success() {
        return Err(AuthError::UnexpectedStatus { status: response.status });
    }
    Ok(response.json()?)
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("identity_url", &self.identity_url)
            .field("login_path", &self.login_path)
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

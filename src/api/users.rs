//! User account endpoints of the identity API.

#[cfg(test)]
#[path = "users_test.rs"]
mod users_test;

use std::sync::Arc;

use super::{ApiError, ensure_success, segment};
use crate::auth::SessionManager;
use crate::config::ClientConfig;
use crate::net::transport::HttpRequest;
use crate::net::types::{ChangePasswordRequest, UpdateUserRequest};

pub struct UsersApi {
    session: Arc<SessionManager>,
    identity_url: String,
}

impl UsersApi {
    #[must_use]
    pub fn new(config: &ClientConfig, session: Arc<SessionManager>) -> Self {
        Self { session, identity_url: config.identity_api_url.clone() }
    }

    fn user_url(&self, user_id: &str) -> String {
        format!("{}/users/{}", self.identity_url, segment(user_id))
    }

    /// Update first and last name.
    ///
    /// # Errors
    ///
    /// Auth, transport, and non-2xx failures.
    pub async fn update_user(&self, user_id: &str, update: &UpdateUserRequest) -> Result<(), ApiError> {
        let request = HttpRequest::patch(self.user_url(user_id)).json(update)?;
        ensure_success(self.session.authenticated_request(request).await?)?;
        tracing::info!(user_id, "profile updated");
        Ok(())
    }

    /// # Errors
    ///
    /// Auth, transport, and non-2xx failures; a wrong current password comes
    /// back as [`ApiError::Status`] with the backend's message.
    pub async fn change_password(&self, user_id: &str, current_password: &str, new_password: &str) -> Result<(), ApiError> {
        let body = ChangePasswordRequest { current_password, new_password };
        let request = HttpRequest::patch(format!("{}/password", self.user_url(user_id))).json(&body)?;
        ensure_success(self.session.authenticated_request(request).await?)?;
        tracing::info!(user_id, "password changed");
        Ok(())
    }
}

//! Thin wrappers over the blog and identity REST endpoints.
//!
//! Every wrapper converts backend failures into [`ApiError`] at this boundary;
//! callers never see a raw `reqwest` error or an unchecked status code.

pub mod articles;
pub mod settings;
pub mod subscribers;
pub mod tags;
pub mod users;
pub mod views;

pub use articles::{AdminArticles, ArticleSource, PublicArticles, slugify};
pub use tags::{TagsApi, filter_tags};
pub use settings::SettingsApi;
pub use subscribers::SubscribersApi;
pub use users::UsersApi;
pub use views::{VISITOR_ID_KEY, ViewsApi, visitor_id};

use std::borrow::Cow;

use crate::auth::AuthError;
use crate::net::transport::{HttpResponse, TransportError};
use crate::net::types::api_error_message;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The backend answered with a non-2xx status.
    #[error("request failed with status {status}")]
    Status { status: u16, message: Option<String> },
}

impl ApiError {
    /// Text suitable for an inline error message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message: Some(message), .. } => message.clone(),
            Self::Auth(AuthError::AuthenticationFailed) => "Your session has expired. Please log in again.".to_owned(),
            Self::Transport(TransportError::Timeout) => "The server took too long to respond.".to_owned(),
            Self::Transport(TransportError::Network(_)) => "Could not reach the server.".to_owned(),
            other => other.to_string(),
        }
    }
}

/// Pass 2xx responses through; turn anything else into [`ApiError::Status`].
pub(crate) fn ensure_success(response: HttpResponse) -> Result<HttpResponse, ApiError> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status { status: response.status, message: api_error_message(&response.body) })
    }
}

/// Percent-encode one path segment.
pub(crate) fn segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

//! Newsletter sign-up.

#[cfg(test)]
#[path = "subscribers_test.rs"]
mod subscribers_test;

use std::sync::Arc;

use super::{ApiError, ensure_success};
use crate::config::ClientConfig;
use crate::net::transport::{HttpRequest, Transport};
use crate::net::types::SubscribeRequest;

pub struct SubscribersApi {
    transport: Arc<dyn Transport>,
    blog_url: String,
}

impl SubscribersApi {
    #[must_use]
    pub fn new(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { transport, blog_url: config.blog_api_url.clone() }
    }

    /// Subscribe `email` to new-article notifications. Anonymous.
    ///
    /// # Errors
    ///
    /// Transport and non-2xx failures, including the backend rejecting the
    /// address.
    pub async fn subscribe(&self, email: &str) -> Result<(), ApiError> {
        let email = email.trim();
        let request = HttpRequest::post(format!("{}/subscribers", self.blog_url)).json(&SubscribeRequest { email })?;
        ensure_success(self.transport.send(request).await?)?;
        tracing::info!("subscribed to blog");
        Ok(())
    }
}

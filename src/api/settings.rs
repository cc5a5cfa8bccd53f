//! Blog-wide branding and SEO settings.

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;

use std::sync::Arc;

use super::{ApiError, ensure_success};
use crate::config::ClientConfig;
use crate::net::transport::{HttpRequest, Transport};
use crate::net::types::BlogSettings;

pub struct SettingsApi {
    transport: Arc<dyn Transport>,
    blog_url: String,
}

impl SettingsApi {
    #[must_use]
    pub fn new(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { transport, blog_url: config.blog_api_url.clone() }
    }

    /// Public endpoint; no credentials.
    ///
    /// # Errors
    ///
    /// Transport and non-2xx failures.
    pub async fn get_blog_settings(&self) -> Result<BlogSettings, ApiError> {
        let request = HttpRequest::get(format!("{}/settings", self.blog_url));
        Ok(ensure_success(self.transport.send(request).await?)?.json()?)
    }

    /// Settings for page chrome: any failure is logged and yields the
    /// defaults, so a header can always render.
    pub async fn blog_settings_or_default(&self) -> BlogSettings {
        match self.get_blog_settings().await {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(error = %e, "blog settings unavailable; using defaults");
                BlogSettings::default()
            }
        }
    }
}

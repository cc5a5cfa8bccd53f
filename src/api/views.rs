//! Article view counting.
//!
//! A view is attributed to an anonymous visitor id, generated once and kept
//! in the same store as the session so it survives restarts.

#[cfg(test)]
#[path = "views_test.rs"]
mod views_test;

use std::sync::Arc;

use super::{ApiError, ensure_success, segment};
use crate::auth::SessionStore;
use crate::config::ClientConfig;
use crate::net::transport::{HttpRequest, Transport};
use crate::net::types::ViewRequest;

/// Storage key for the anonymous visitor id.
pub const VISITOR_ID_KEY: &str = "bloggy_visitor_id";

/// The persisted visitor id, minting and storing a v4 UUID on first use.
///
/// A store that rejects the write still gets a usable id for this run.
#[must_use]
pub fn visitor_id(store: &dyn SessionStore) -> String {
    if let Some(id) = store.get(VISITOR_ID_KEY).filter(|id| !id.is_empty()) {
        return id;
    }
    let id = uuid::Uuid::new_v4().to_string();
    if let Err(e) = store.set_all(&[(VISITOR_ID_KEY, id.as_str())]) {
        tracing::warn!(error = %e, "visitor id not persisted");
    }
    id
}

pub struct ViewsApi {
    transport: Arc<dyn Transport>,
    blog_url: String,
}

impl ViewsApi {
    #[must_use]
    pub fn new(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { transport, blog_url: config.blog_api_url.clone() }
    }

    /// Count one view of `article_id` by `visitor_id`. Anonymous.
    ///
    /// # Errors
    ///
    /// Transport and non-2xx failures; a backend error body becomes the
    /// status error's message.
    pub async fn record_article_view(&self, article_id: &str, visitor_id: &str) -> Result<(), ApiError> {
        let url = format!("{}/views/article/{}", self.blog_url, segment(article_id));
        let request = HttpRequest::post(url).json(&ViewRequest { visitor_id })?;
        ensure_success(self.transport.send(request).await?)?;
        tracing::debug!(article_id, "article view recorded");
        Ok(())
    }
}

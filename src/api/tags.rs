//! Tag listing for the editor's tag picker and the public tag filter.

#[cfg(test)]
#[path = "tags_test.rs"]
mod tags_test;

use std::sync::Arc;

use super::{ApiError, ensure_success};
use crate::config::ClientConfig;
use crate::net::transport::{HttpRequest, Transport};
use crate::net::types::Tag;

pub struct TagsApi {
    transport: Arc<dyn Transport>,
    blog_url: String,
}

impl TagsApi {
    #[must_use]
    pub fn new(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { transport, blog_url: config.blog_api_url.clone() }
    }

    /// Every tag. Public endpoint.
    ///
    /// # Errors
    ///
    /// Transport and non-2xx failures.
    pub async fn list_tags(&self) -> Result<Vec<Tag>, ApiError> {
        let request = HttpRequest::get(format!("{}/tags", self.blog_url));
        Ok(ensure_success(self.transport.send(request).await?)?.json()?)
    }

    /// Tags whose name or slug contains `term`, case-insensitively.
    ///
    /// # Errors
    ///
    /// Same as [`TagsApi::list_tags`].
    pub async fn search_tags(&self, term: &str) -> Result<Vec<Tag>, ApiError> {
        Ok(filter_tags(self.list_tags().await?, term))
    }
}

/// Keep tags whose name or slug contains `term` (case-insensitive). A blank
/// term keeps everything.
#[must_use]
pub fn filter_tags(tags: Vec<Tag>, term: &str) -> Vec<Tag> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return tags;
    }
    tags.into_iter()
        .filter(|tag| tag.name.to_lowercase().contains(&term) || tag.slug.to_lowercase().contains(&term))
        .collect()
}

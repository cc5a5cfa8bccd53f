//! Article endpoints of the blog API.
//!
//! `PublicArticles` serves anonymous readers (`/articles/published`, status
//! forced to Published server-side). `AdminArticles` goes through the session
//! manager so every call carries the bearer token and gets one refresh on 401.
//! Both implement [`ArticleSource`], the seam the list synchronizer pages over.

#[cfg(test)]
#[path = "articles_test.rs"]
mod articles_test;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use super::{ApiError, ensure_success, segment};
use crate::articles::filter::ArticleQuery;
use crate::auth::SessionManager;
use crate::config::ClientConfig;
use crate::net::transport::{HttpRequest, HttpResponse, Transport};
use crate::net::types::{
    Article, ArticleDraft, ArticlePage, ArticleStatus, CreatedArticle, OriginalArticleInfo, StatusUpdate,
};

/// Image used when an article is saved without one.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://picsum.photos/540/400";

/// One page of articles for a query. Implemented by the public and admin
/// endpoints and by test doubles.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// # Errors
    ///
    /// Any transport, auth, or non-2xx failure for this page.
    async fn fetch_page(&self, query: &ArticleQuery) -> Result<ArticlePage, ApiError>;
}

// =============================================================================
// PUBLIC
// =============================================================================

pub struct PublicArticles {
    transport: Arc<dyn Transport>,
    blog_url: String,
}

impl PublicArticles {
    #[must_use]
    pub fn new(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { transport, blog_url: config.blog_api_url.clone() }
    }

    /// A published article by slug; `None` if the backend answers 404.
    ///
    /// # Errors
    ///
    /// Transport failures and any other non-2xx status.
    pub async fn get_published_by_slug(&self, slug: &str) -> Result<Option<Article>, ApiError> {
        let url = format!("{}/articles/published/{}", self.blog_url, segment(slug));
        let response = self.transport.send(HttpRequest::get(url)).await?;
        if response.status == 404 {
            return Ok(None);
        }
        Ok(Some(ensure_success(response)?.json()?))
    }
}

#[async_trait]
impl ArticleSource for PublicArticles {
    async fn fetch_page(&self, query: &ArticleQuery) -> Result<ArticlePage, ApiError> {
        let request = HttpRequest::get(format!("{}/articles/published", self.blog_url)).query(query.query_pairs());
        let response = ensure_success(self.transport.send(request).await?)?;
        Ok(response.json()?)
    }
}

// =============================================================================
// ADMIN
// =============================================================================

pub struct AdminArticles {
    session: Arc<SessionManager>,
    blog_url: String,
}

/// Body of `POST /articles` and `PUT /articles/{id}`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ArticlePayload<'a> {
    title: &'a str,
    subtitle: &'a str,
    summary: &'a str,
    content: &'a str,
    slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_to_read: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    original_article_info: Option<&'a OriginalArticleInfo>,
    thumbnail_url: &'a str,
    cover_image_url: &'a str,
    tag_ids: &'a [String],
}

impl<'a> ArticlePayload<'a> {
    fn new(draft: &'a ArticleDraft, slug_source: &str) -> Self {
        Self {
            title: &draft.title,
            subtitle: &draft.subtitle,
            summary: &draft.summary,
            content: &draft.content,
            slug: slugify(slug_source),
            time_to_read: draft.time_to_read,
            original_article_info: draft.original_article_info.as_ref(),
            thumbnail_url: image_or_placeholder(&draft.thumbnail_url),
            cover_image_url: image_or_placeholder(&draft.cover_image_url),
            tag_ids: &draft.tag_ids,
        }
    }
}

fn image_or_placeholder(url: &str) -> &str {
    if url.trim().is_empty() { PLACEHOLDER_IMAGE_URL } else { url }
}

impl AdminArticles {
    #[must_use]
    pub fn new(config: &ClientConfig, session: Arc<SessionManager>) -> Self {
        Self { session, blog_url: config.blog_api_url.clone() }
    }

    fn article_url(&self, article_id: &str) -> String {
        format!("{}/articles/{}", self.blog_url, segment(article_id))
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let response = self.session.authenticated_request(request).await?;
        ensure_success(response)
    }

    /// Any article by id, regardless of status.
    ///
    /// # Errors
    ///
    /// Auth, transport, and non-2xx failures.
    pub async fn get_article(&self, article_id: &str) -> Result<Article, ApiError> {
        Ok(self.send(HttpRequest::get(self.article_url(article_id))).await?.json()?)
    }

    /// Create an article and return its slug. The slug is derived from the
    /// title.
    ///
    /// # Errors
    ///
    /// Auth, transport, and non-2xx failures.
    pub async fn create_article(&self, draft: &ArticleDraft) -> Result<String, ApiError> {
        let payload = ArticlePayload { time_to_read: None, ..ArticlePayload::new(draft, &draft.title) };
        let request = HttpRequest::post(format!("{}/articles", self.blog_url)).json(&payload)?;
        let created: CreatedArticle = self.send(request).await?.json()?;
        tracing::info!(slug = %created.slug, "article created");
        Ok(created.slug)
    }

    /// Replace an article's editable fields. The slug is the draft's explicit
    /// slug, or the title when absent, normalized either way.
    ///
    /// # Errors
    ///
    /// Auth, transport, and non-2xx failures.
    pub async fn update_article(&self, article_id: &str, draft: &ArticleDraft) -> Result<(), ApiError> {
        let slug_source = draft.slug.as_deref().unwrap_or(&draft.title);
        let payload = ArticlePayload::new(draft, slug_source);
        self.send(HttpRequest::put(self.article_url(article_id)).json(&payload)?).await?;
        tracing::info!(article_id, "article updated");
        Ok(())
    }

    /// # Errors
    ///
    /// Auth, transport, and non-2xx failures.
    pub async fn update_article_status(&self, article_id: &str, status: ArticleStatus) -> Result<(), ApiError> {
        let url = format!("{}/status", self.article_url(article_id));
        self.send(HttpRequest::patch(url).json(&StatusUpdate { status })?).await?;
        tracing::info!(article_id, status = status.as_str(), "article status changed");
        Ok(())
    }

    /// # Errors
    ///
    /// Auth, transport, and non-2xx failures.
    pub async fn delete_article(&self, article_id: &str) -> Result<(), ApiError> {
        self.send(HttpRequest::delete(self.article_url(article_id))).await?;
        tracing::info!(article_id, "article deleted");
        Ok(())
    }
}

#[async_trait]
impl ArticleSource for AdminArticles {
    async fn fetch_page(&self, query: &ArticleQuery) -> Result<ArticlePage, ApiError> {
        let request = HttpRequest::get(format!("{}/articles", self.blog_url)).query(query.query_pairs());
        Ok(self.send(request).await?.json()?)
    }
}

// =============================================================================
// SLUG
// =============================================================================

/// URL slug for a title: lowercase ASCII letters, digits and single hyphens.
///
/// Characters outside `[a-z0-9]`, whitespace and `-` are dropped, whitespace
/// runs become one hyphen, hyphen runs collapse, and the result is trimmed.
#[must_use]
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_hyphen = false;
    for c in lowered.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_hyphen = true;
        }
    }
    slug
}

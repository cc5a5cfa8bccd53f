//! Wire DTOs for the identity and blog APIs.
//!
//! DESIGN
//! ======
//! Field names follow the backend's camelCase JSON. Optional presentation
//! fields default when absent so a sparse list payload still decodes.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

// =============================================================================
// IDENTITY
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of a successful `POST /auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub email: String,
    pub full_name: String,
    pub access_token: String,
}

/// Body of a successful `POST /auth/refresh`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Account role reported by `/auth/profile`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Author,
    /// Any role this client does not know about.
    #[serde(other)]
    Unknown,
}

/// Full profile returned by `GET /auth/profile`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    pub email: String,
    #[serde(default)]
    pub is_email_confirmed: bool,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub full_name: String,
    pub role: Role,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub last_login_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest<'a> {
    pub current_password: &'a str,
    pub new_password: &'a str,
}

// =============================================================================
// BLOG
// =============================================================================

/// Publication state of an article.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ArticleStatus {
    Draft,
    Published,
    Archived,
}

impl ArticleStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Published => "Published",
            Self::Archived => "Archived",
        }
    }
}

/// Sort key accepted by the list endpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArticleSortBy {
    #[default]
    #[serde(rename = "CreatedAtNewest")]
    Latest,
    #[serde(rename = "CreatedAtOldest")]
    Oldest,
    #[serde(rename = "LikesMost")]
    Popular,
}

impl ArticleSortBy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Latest => "CreatedAtNewest",
            Self::Oldest => "CreatedAtOldest",
            Self::Popular => "LikesMost",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub tag_id: String,
    pub name: String,
    pub slug: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub article_id: String,
    #[serde(default)]
    pub author_id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub content: String,
    pub slug: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub cover_image_url: String,
    #[serde(default)]
    pub time_to_read_in_minute: u32,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub tag_ids: Vec<String>,
    pub status: ArticleStatus,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub archived_at: Option<String>,
    #[serde(default)]
    pub original_article_info: Option<OriginalArticleInfo>,
}

/// Where a republished article first appeared.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginalArticleInfo {
    pub platform: String,
    pub url: String,
    pub published_on: String,
}

impl Article {
    /// Human-readable reading time, e.g. `"5 min read"`.
    #[must_use]
    pub fn reading_time(&self) -> String {
        format!("{} min read", self.time_to_read_in_minute)
    }
}

/// One page of a list endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePage {
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
    #[serde(default)]
    pub results: Vec<Article>,
}

/// Editable article fields for create and update.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDraft {
    pub title: String,
    pub subtitle: String,
    pub summary: String,
    pub content: String,
    /// Explicit slug; derived from the title when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_read: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_article_info: Option<OriginalArticleInfo>,
    pub thumbnail_url: String,
    pub cover_image_url: String,
    pub tag_ids: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CreatedArticle {
    pub slug: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    pub status: ArticleStatus,
}

// =============================================================================
// SETTINGS / SUBSCRIBERS / VIEWS
// =============================================================================

/// Social network a blog profile link points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SocialNetwork {
    Medium,
    Twitter,
    Linkedin,
    Youtube,
    Github,
    StackOverflow,
    Devto,
    Instagram,
    Facebook,
    Reddit,
    Discord,
    Dribbble,
    Behance,
    Unsplash,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub order: u32,
    pub name: SocialNetwork,
    pub url: String,
}

/// Blog-wide branding and SEO settings from `GET /settings`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogSettings {
    pub blog_title: String,
    pub blog_subtitle: String,
    pub blog_page_title: String,
    pub blog_description: String,
    pub seo_meta_title: String,
    pub seo_meta_description: String,
    pub blog_url: String,
    pub blog_logo_url: String,
    pub socials: Vec<SocialLink>,
    pub updated_at: String,
}

impl BlogSettings {
    /// Social links in display order.
    #[must_use]
    pub fn sorted_socials(&self) -> Vec<&SocialLink> {
        let mut socials: Vec<&SocialLink> = self.socials.iter().collect();
        socials.sort_by_key(|s| s.order);
        socials
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubscribeRequest<'a> {
    pub email: &'a str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRequest<'a> {
    pub visitor_id: &'a str,
}

// =============================================================================
// ERROR BODIES
// =============================================================================

/// Pull a friendly message out of a backend error body.
///
/// Accepts `{ "messages": [..] }` (joined with spaces), then `message`, then
/// `error`. Anything else yields `None`.
#[must_use]
pub fn api_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;
    if let Some(messages) = object.get("messages").and_then(serde_json::Value::as_array) {
        let texts: Option<Vec<&str>> = messages.iter().map(serde_json::Value::as_str).collect();
        if let Some(texts) = texts.filter(|t| !t.is_empty()) {
            return Some(texts.join(" "));
        }
    }
    ["message", "error"]
        .iter()
        .find_map(|key| object.get(*key).and_then(serde_json::Value::as_str))
        .map(str::to_owned)
}

//! Filter and query model shared by the list endpoints.

#[cfg(test)]
#[path = "filter_test.rs"]
mod filter_test;

use std::collections::BTreeSet;

use crate::net::types::{ArticleSortBy, ArticleStatus};

/// Rows per page in the admin article table (the live manage route's size).
pub const ADMIN_PAGE_SIZE: u32 = 14;
/// Cards per page in the public article browser.
pub const PUBLIC_PAGE_SIZE: u32 = 14;

/// The user-chosen part of a list query. Two equal filters are the same
/// epoch; any difference starts a new one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ArticleFilter {
    /// Free-text search; empty means no keyword filter.
    pub keyword: String,
    /// Empty means every status the endpoint allows.
    pub statuses: BTreeSet<ArticleStatus>,
    pub tag_ids: BTreeSet<String>,
    pub sort: ArticleSortBy,
}

impl ArticleFilter {
    /// Filter from the admin "only drafts" / "only archived" toggles.
    ///
    /// Exactly one toggle narrows to that status; none or both show all.
    #[must_use]
    pub fn from_toggles(only_drafts: bool, only_archived: bool) -> Self {
        let statuses = match (only_drafts, only_archived) {
            (true, false) => BTreeSet::from([ArticleStatus::Draft]),
            (false, true) => BTreeSet::from([ArticleStatus::Archived]),
            _ => BTreeSet::new(),
        };
        Self { statuses, ..Self::default() }
    }

    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag_id: impl Into<String>) -> Self {
        self.tag_ids.insert(tag_id.into());
        self
    }

    #[must_use]
    pub fn sorted_by(mut self, sort: ArticleSortBy) -> Self {
        self.sort = sort;
        self
    }
}

/// One page request for a filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArticleQuery {
    pub filter: ArticleFilter,
    /// 1-based.
    pub page: u32,
    pub page_size: u32,
}

impl ArticleQuery {
    #[must_use]
    pub fn first(filter: ArticleFilter, page_size: u32) -> Self {
        Self { filter, page: 1, page_size }
    }

    /// Query-string pairs in wire order. Array dimensions repeat their key.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let keyword = self.filter.keyword.trim();
        if !keyword.is_empty() {
            pairs.push(("Keyword".to_owned(), keyword.to_owned()));
        }
        for status in &self.filter.statuses {
            pairs.push(("Statuses".to_owned(), status.as_str().to_owned()));
        }
        for tag_id in &self.filter.tag_ids {
            pairs.push(("TagIds".to_owned(), tag_id.clone()));
        }
        pairs.push(("SortBy".to_owned(), self.filter.sort.as_str().to_owned()));
        pairs.push(("Page".to_owned(), self.page.to_string()));
        pairs.push(("PageSize".to_owned(), self.page_size.to_string()));
        pairs
    }
}

//! Pagination state machine for filtered, incrementally loaded article lists.
//!
//! DESIGN
//! ======
//! The state is a plain value with synchronous transitions; nothing here does
//! I/O. Every transition that needs a page returns a [`PageTicket`] naming the
//! filter epoch and the page. The driver fetches it and hands the result back
//! to [`ArticleListState::apply`], which discards it unless the ticket is
//! still the one the state is waiting for.
//!
//! PHASES
//! ======
//! ```text
//!   Idle ──set_filter──▶ Loading ──page──▶ Ready ──sentinel──▶ LoadingMore
//!                           │                ▲                    │
//!                           │                └──────page──────────┤
//!                           ├──last page──▶ Exhausted ◀──last page┘
//!                           └──error──▶ Failed ──retry──▶ Loading | LoadingMore
//! ```
//! `set_filter`/`reload` from any phase clear the items and start a new epoch
//! at page 1.
//!
//! TRADE-OFFS
//! ==========
//! In-flight requests are never cancelled. A superseded response still costs
//! the network round trip, but discarding by epoch keeps the state free of
//! abort bookkeeping.

#[cfg(test)]
#[path = "list_test.rs"]
mod list_test;

use std::collections::HashSet;

use super::filter::{ArticleFilter, ArticleQuery};
use crate::api::ApiError;
use crate::net::types::{Article, ArticlePage};

// =============================================================================
// TYPES
// =============================================================================

/// A page fetch that failed. Already loaded items are kept.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to load page {page}: {error}")]
pub struct FetchFailure {
    pub page: u32,
    pub error: ApiError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListPhase {
    /// No filter applied yet.
    Idle,
    /// Fetching page 1 of the current epoch.
    Loading,
    /// At least one page loaded and more remain.
    Ready,
    /// Fetching a continuation page.
    LoadingMore,
    /// Every page loaded; no further fetches for this epoch.
    Exhausted,
    Failed(FetchFailure),
}

/// A page the state is waiting for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTicket {
    epoch: u64,
    query: ArticleQuery,
}

impl PageTicket {
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub fn query(&self) -> &ArticleQuery {
        &self.query
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The result (page or failure) was recorded.
    Applied,
    /// The ticket was superseded or the list disposed; nothing changed.
    Stale,
}

/// What a list screen should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    Idle,
    /// First page in flight; show a loader, not an empty list.
    Loading,
    /// The filter matched nothing.
    NoResults,
    Items {
        items: Vec<Article>,
        loading_more: bool,
        /// Render (and observe) the end-of-list sentinel.
        show_sentinel: bool,
    },
    /// Keep showing `items` next to a retryable error.
    Failed { items: Vec<Article>, message: String },
}

// =============================================================================
// STATE
// =============================================================================

#[derive(Debug, Clone)]
pub struct ArticleListState {
    page_size: u32,
    filter: ArticleFilter,
    epoch: u64,
    /// Last page requested in this epoch; 1 right after a filter change.
    page: u32,
    loaded_pages: u32,
    items: Vec<Article>,
    seen: HashSet<String>,
    total_count: Option<u64>,
    phase: ListPhase,
    disposed: bool,
}

impl ArticleListState {
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size,
            filter: ArticleFilter::default(),
            epoch: 0,
            page: 0,
            loaded_pages: 0,
            items: Vec::new(),
            seen: HashSet::new(),
            total_count: None,
            phase: ListPhase::Idle,
            disposed: false,
        }
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// Switch to `filter`: clear items, start a new epoch, request page 1.
    ///
    /// Returns `None` if the list is disposed, or if `filter` equals the
    /// current filter and the list is already live.
    pub fn set_filter(&mut self, filter: ArticleFilter) -> Option<PageTicket> {
        if self.disposed || (self.phase != ListPhase::Idle && filter == self.filter) {
            return None;
        }
        self.filter = filter;
        Some(self.restart())
    }

    /// Start a new epoch for the current filter.
    pub fn reload(&mut self) -> Option<PageTicket> {
        if self.disposed {
            return None;
        }
        Some(self.restart())
    }

    fn restart(&mut self) -> PageTicket {
        self.epoch += 1;
        self.page = 1;
        self.loaded_pages = 0;
        self.items.clear();
        self.seen.clear();
        self.total_count = None;
        self.phase = ListPhase::Loading;
        self.ticket(1)
    }

    /// The end-of-list sentinel became visible.
    ///
    /// Requests the next page only from [`ListPhase::Ready`], so repeated
    /// visibility events while a page is in flight issue nothing.
    pub fn sentinel_visible(&mut self) -> Option<PageTicket> {
        if self.disposed || self.phase != ListPhase::Ready {
            return None;
        }
        self.page = self.loaded_pages + 1;
        self.phase = ListPhase::LoadingMore;
        Some(self.ticket(self.page))
    }

    /// Re-request the page that failed, in the same epoch.
    pub fn retry(&mut self) -> Option<PageTicket> {
        if self.disposed {
            return None;
        }
        let ListPhase::Failed(failure) = &self.phase else {
            return None;
        };
        let page = failure.page;
        self.page = page;
        self.phase = if page == 1 { ListPhase::Loading } else { ListPhase::LoadingMore };
        Some(self.ticket(page))
    }

    /// Stop accepting results. Permanent.
    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    /// Record the outcome of `ticket`.
    ///
    /// A ticket from an older epoch, for a page other than the one awaited, or
    /// arriving after [`ArticleListState::dispose`] is discarded without
    /// touching any field.
    pub fn apply(&mut self, ticket: &PageTicket, result: Result<ArticlePage, ApiError>) -> ApplyOutcome {
        let awaiting = matches!(self.phase, ListPhase::Loading | ListPhase::LoadingMore);
        if self.disposed || !awaiting || ticket.epoch != self.epoch || ticket.query.page != self.page {
            return ApplyOutcome::Stale;
        }

        match result {
            Ok(page) => self.merge(page),
            Err(error) => {
                self.phase = ListPhase::Failed(FetchFailure { page: ticket.query.page, error });
            }
        }
        ApplyOutcome::Applied
    }

    fn merge(&mut self, page: ArticlePage) {
        let received = page.results.len();
        for article in page.results {
            if self.seen.insert(article.article_id.clone()) {
                self.items.push(article);
            }
        }
        self.loaded_pages = self.page;
        self.total_count = Some(page.total_count);

        let total = usize::try_from(page.total_count).unwrap_or(usize::MAX);
        // An empty page ends the list even if the reported total claims more.
        let exhausted = received == 0 || self.items.len() >= total;
        self.phase = if exhausted { ListPhase::Exhausted } else { ListPhase::Ready };
    }

    fn ticket(&self, page: u32) -> PageTicket {
        PageTicket {
            epoch: self.epoch,
            query: ArticleQuery { filter: self.filter.clone(), page, page_size: self.page_size },
        }
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn view(&self) -> ListView {
        match &self.phase {
            ListPhase::Idle => ListView::Idle,
            ListPhase::Loading => ListView::Loading,
            ListPhase::Exhausted if self.items.is_empty() => ListView::NoResults,
            ListPhase::Ready | ListPhase::LoadingMore | ListPhase::Exhausted => ListView::Items {
                items: self.items.clone(),
                loading_more: self.phase == ListPhase::LoadingMore,
                show_sentinel: self.phase == ListPhase::Ready,
            },
            ListPhase::Failed(failure) => ListView::Failed {
                items: self.items.clone(),
                message: failure.error.user_message(),
            },
        }
    }

    #[must_use]
    pub fn items(&self) -> &[Article] {
        &self.items
    }

    #[must_use]
    pub fn filter(&self) -> &ArticleFilter {
        &self.filter
    }

    #[must_use]
    pub fn phase(&self) -> &ListPhase {
        &self.phase
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Last page requested in the current epoch.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Total reported by the latest page, if any arrived this epoch.
    #[must_use]
    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    #[must_use]
    pub fn is_last_page_reached(&self) -> bool {
        self.phase == ListPhase::Exhausted
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

//! Async driver binding [`ArticleListState`] to an [`ArticleSource`].
//!
//! The state sits behind a `std::sync::Mutex` that is only held for a
//! transition, never across the fetch. Concurrent callers can therefore
//! interleave freely; the epoch check in `apply` decides whose result lands.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::filter::ArticleFilter;
use super::list::{ApplyOutcome, ArticleListState, ListPhase, ListView, PageTicket};
use crate::api::ArticleSource;
use crate::net::types::Article;

pub struct ArticleList<S: ?Sized> {
    source: Arc<S>,
    state: Arc<Mutex<ArticleListState>>,
}

impl<S: ?Sized> Clone for ArticleList<S> {
    fn clone(&self) -> Self {
        Self { source: Arc::clone(&self.source), state: Arc::clone(&self.state) }
    }
}

impl<S: ArticleSource + ?Sized> ArticleList<S> {
    #[must_use]
    pub fn new(source: Arc<S>, page_size: u32) -> Self {
        Self { source, state: Arc::new(Mutex::new(ArticleListState::new(page_size))) }
    }

    fn lock(&self) -> MutexGuard<'_, ArticleListState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `filter` and load its first page. `None` if nothing was fetched
    /// (same filter, or disposed).
    pub async fn change_filter(&self, filter: ArticleFilter) -> Option<ApplyOutcome> {
        let ticket = self.lock().set_filter(filter)?;
        Some(self.run(ticket).await)
    }

    /// Load the next page if the list is ready for one.
    pub async fn sentinel_visible(&self) -> Option<ApplyOutcome> {
        let ticket = self.lock().sentinel_visible()?;
        Some(self.run(ticket).await)
    }

    /// Re-fetch the page that failed.
    pub async fn retry(&self) -> Option<ApplyOutcome> {
        let ticket = self.lock().retry()?;
        Some(self.run(ticket).await)
    }

    /// Reload the current filter from page 1.
    pub async fn reload(&self) -> Option<ApplyOutcome> {
        let ticket = self.lock().reload()?;
        Some(self.run(ticket).await)
    }

    /// Stop all further state changes, including from requests in flight.
    pub fn dispose(&self) {
        self.lock().dispose();
    }

    async fn run(&self, ticket: PageTicket) -> ApplyOutcome {
        let query = ticket.query();
        tracing::debug!(epoch = ticket.epoch(), page = query.page, "fetching article page");
        let result = self.source.fetch_page(query).await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, page = query.page, "article page fetch failed");
        }

        let outcome = self.lock().apply(&ticket, result);
        if outcome == ApplyOutcome::Stale {
            tracing::debug!(epoch = ticket.epoch(), page = query.page, "discarded stale article page");
        }
        outcome
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn view(&self) -> ListView {
        self.lock().view()
    }

    /// Copy of the full state.
    #[must_use]
    pub fn snapshot(&self) -> ArticleListState {
        self.lock().clone()
    }

    #[must_use]
    pub fn items(&self) -> Vec<Article> {
        self.lock().items().to_vec()
    }

    #[must_use]
    pub fn phase(&self) -> ListPhase {
        self.lock().phase().clone()
    }

    #[must_use]
    pub fn is_last_page_reached(&self) -> bool {
        self.lock().is_last_page_reached()
    }
}

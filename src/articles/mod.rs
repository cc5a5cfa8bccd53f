//! Incremental, filtered article lists.
//!
//! `filter` describes what to fetch, `list` is the pure pagination state
//! machine, and `sync` drives it against an `ArticleSource`.

pub mod filter;
pub mod list;
pub mod sync;

pub use filter::{ADMIN_PAGE_SIZE, ArticleFilter, ArticleQuery, PUBLIC_PAGE_SIZE};
pub use list::{ApplyOutcome, ArticleListState, FetchFailure, ListPhase, ListView, PageTicket};
pub use sync::ArticleList;
